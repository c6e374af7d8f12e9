//! Centralized limits and thresholds for the metadata walker.
//!
//! The walker queries an external type checker whose type graphs are
//! unbounded by nature: recursive generic aliases keep expanding, and large
//! code bases link hundreds of record types together. These constants bound
//! how much of such a graph a single walk may touch.
//!
//! # Categories
//!
//! - **Recursion Depths**: nesting of recursive `walk` entries
//! - **Operation Counts**: total nodes visited per top-level call
//! - **Naming Thresholds**: when a generic argument is still "nameable"
//!
//! The walker reads these through `WalkLimits` so a configuration file can
//! override them; the constants are the defaults and the single source of
//! truth for tests.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth of recursive walk entries.
///
/// The entry that brings the depth to this value returns an `Any` node
/// tagged as depth-exceeded instead of recursing further. A chain of 19
/// nested types walks completely; the 20th nested entry degrades.
///
/// # TypeScript example
///
/// ```typescript
/// // Each instantiation produces a brand new type, so no cycle is ever seen:
/// type Grow<T> = { inner: Grow<T[]> };
/// declare function handler(body: Grow<string>): void;
/// ```
pub const MAX_WALK_DEPTH: u32 = 20;

// =============================================================================
// Operation Count Limits
// =============================================================================

/// Maximum number of walk entries charged to one top-level call.
///
/// Every top-level call (one parameter, one return type) gets a fresh budget,
/// and every named object gets its own nested budget while its properties are
/// extracted. Once the budget is spent, remaining siblings in the call degrade
/// to `Any` nodes tagged as breadth-exceeded.
///
/// # TypeScript example
///
/// ```typescript
/// // Hundreds of anonymous, interlinked shapes reachable from one parameter:
/// declare function handler(body: { a0: { ... }, a1: { ... }, /* ... */ a599: { ... } }): void;
/// ```
pub const MAX_WALK_BREADTH: u32 = 500;

// =============================================================================
// Naming Thresholds
// =============================================================================

/// Largest all-literal union that still renders as a type-argument token.
///
/// `Page<"a" | "b">` registers as `PageAB`; a union with more members than
/// this cannot be named stably and the instantiation is inlined instead.
pub const SMALL_LITERAL_UNION_TOKEN_LIMIT: usize = 4;

/// Default prefix marking phantom (branding) properties.
pub const DEFAULT_BRAND_PREFIX: &str = "__";

/// Default name of the compatibility tag property carrying `{ kind, value }`.
pub const DEFAULT_COMPAT_TAG_PROPERTY: &str = "~tag";

#[cfg(test)]
#[path = "../tests/limits_tests.rs"]
mod tests;
