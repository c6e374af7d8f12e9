//! Bounded, cycle-safe type walker.
//!
//! Converts the type graph behind a [`TypeOracle`](tsmeta_oracle::TypeOracle)
//! into [`Metadata`](tsmeta_ir::Metadata) nodes:
//!
//! - Named objects, aliases and generic instantiations are registered once and
//!   referenced by name, so recursive types terminate
//! - Branded intersections (`string & { __minLength: 3 }`) collapse to their
//!   base type carrying validation constraints
//! - Depth and breadth budgets cap the work per top-level call; exhausted
//!   parts degrade to `Any` with a warning diagnostic instead of failing
//!
//! ```ignore
//! let mut walker = TypeWalker::new(&table, &NoDocTags, WalkerConfig::default());
//! let node = walker.walk(user);
//! let (registry, diagnostics) = walker.into_parts();
//! ```

mod alias;
mod budget;
pub use budget::{BudgetProfile, BudgetResult, WalkBudget};

pub mod config;
pub use config::{MergePolicy, WalkLimits, WalkerConfig};

mod constraints;
mod diagnostics;
pub use diagnostics::DiagnosticCollector;

mod discriminant;
mod intersection;
mod naming;
mod native;
mod object;
mod template;
mod union;

mod walker;
pub use walker::TypeWalker;
