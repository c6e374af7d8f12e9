//! Depth and breadth budgets for one walker session.
//!
//! # Design
//!
//! `WalkBudget` bounds two things per top-level `walk` call:
//! 1. **Depth**: nesting of recursive walk entries, so an infinitely
//!    expanding generic instantiation cannot overflow the stack
//! 2. **Breadth**: total walk entries charged to the call, so hundreds of
//!    interlinked shapes cannot take unbounded time and memory
//!
//! Cycle detection is not part of the budget. The walker keeps its own
//! visiting set keyed by `TypeId`, because objects, unions and intersections
//! mark themselves at different points of their algorithms.
//!
//! # Profiles
//!
//! [`BudgetProfile`] names the limit pairs a configuration may pick instead of
//! raw numbers:
//!
//! ```ignore
//! let budget = WalkBudget::with_profile(BudgetProfile::Standard);
//! ```
//!
//! # Safety
//!
//! - **Debug leak detection**: in debug builds, dropping a budget with active
//!   entries panics, catching a forgotten `leave()`.
//! - **Debug underflow detection**: `leave()` at depth 0 panics in debug builds.
//! - **Overflow protection**: counters use saturating arithmetic.

use serde::{Deserialize, Serialize};
use tsmeta_common::limits::{MAX_WALK_BREADTH, MAX_WALK_DEPTH};

// ---------------------------------------------------------------------------
// BudgetProfile
// ---------------------------------------------------------------------------

/// Named `(max_depth, max_breadth)` presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetProfile {
    /// The limits the walker was tuned with.
    ///
    /// depth = 20, breadth = 500
    #[default]
    Standard,

    /// Quick summaries of very large programs (editor hovers, previews).
    ///
    /// depth = 8, breadth = 100
    Shallow,

    /// Offline generation over code bases with deep generic models.
    ///
    /// depth = 40, breadth = 5,000
    Exhaustive,
}

impl BudgetProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Standard => MAX_WALK_DEPTH,
            Self::Shallow => 8,
            Self::Exhaustive => 40,
        }
    }

    pub const fn max_breadth(self) -> u32 {
        match self {
            Self::Standard => MAX_WALK_BREADTH,
            Self::Shallow => 100,
            Self::Exhaustive => 5_000,
        }
    }
}

// ---------------------------------------------------------------------------
// BudgetResult
// ---------------------------------------------------------------------------

/// Result of entering one walk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetResult {
    Entered,
    DepthExceeded,
    BreadthExceeded,
}

impl BudgetResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

// ---------------------------------------------------------------------------
// WalkBudget
// ---------------------------------------------------------------------------

/// Depth and breadth accounting for the recursive walk.
///
/// # Usage
///
/// ```ignore
/// let outcome = budget.enter();
/// let node = match outcome {
///     BudgetResult::Entered => dispatch(ty),
///     BudgetResult::DepthExceeded => Metadata::degraded(Degradation::DepthExceeded),
///     BudgetResult::BreadthExceeded => Metadata::degraded(Degradation::BreadthExceeded),
/// };
/// budget.leave();
/// node
/// ```
///
/// `enter` always takes a level, even when it reports an exceeded limit, so
/// every `enter` is paired with exactly one `leave`.
pub struct WalkBudget {
    depth: u32,
    walked: u32,
    max_depth: u32,
    max_breadth: u32,
    depth_reported: bool,
    breadth_reported: bool,
}

impl WalkBudget {
    pub fn new(max_depth: u32, max_breadth: u32) -> Self {
        Self {
            depth: 0,
            walked: 0,
            max_depth,
            max_breadth,
            depth_reported: false,
            breadth_reported: false,
        }
    }

    pub fn with_profile(profile: BudgetProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_breadth())
    }

    // -----------------------------------------------------------------------
    // Core enter / leave API
    // -----------------------------------------------------------------------

    /// Take one walk level.
    ///
    /// The entry that starts a top-level call resets the breadth counter and
    /// is not charged itself; every nested entry is.
    pub fn enter(&mut self) -> BudgetResult {
        if self.depth == 0 {
            self.walked = 0;
            self.depth_reported = false;
            self.breadth_reported = false;
        }
        self.depth = self.depth.saturating_add(1);

        if self.depth >= self.max_depth {
            return BudgetResult::DepthExceeded;
        }
        if self.depth > 1 {
            self.walked = self.walked.saturating_add(1);
            if self.walked > self.max_breadth {
                return BudgetResult::BreadthExceeded;
            }
        }
        BudgetResult::Entered
    }

    /// Release the level taken by the matching [`enter`](Self::enter).
    pub fn leave(&mut self) {
        debug_assert!(
            self.depth > 0,
            "WalkBudget::leave() called at depth 0 without a matching enter()."
        );
        self.depth = self.depth.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Nested breadth budgets
    // -----------------------------------------------------------------------

    /// Start a fresh breadth budget, returning the counter to restore later.
    ///
    /// Named objects extract their properties under their own budget so a
    /// wide sibling cannot starve them.
    pub fn begin_nested(&mut self) -> u32 {
        std::mem::take(&mut self.walked)
    }

    pub fn end_nested(&mut self, saved: u32) {
        self.walked = saved;
    }

    // -----------------------------------------------------------------------
    // Query API
    // -----------------------------------------------------------------------

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn walked(&self) -> u32 {
        self.walked
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn max_breadth(&self) -> u32 {
        self.max_breadth
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Returns `true` the first time `outcome` is seen in the current
    /// top-level call, so each exhaustion is reported once per call.
    pub fn first_report(&mut self, outcome: BudgetResult) -> bool {
        let flag = match outcome {
            BudgetResult::DepthExceeded => &mut self.depth_reported,
            BudgetResult::BreadthExceeded => &mut self.breadth_reported,
            BudgetResult::Entered => return false,
        };
        !std::mem::replace(flag, true)
    }
}

// ---------------------------------------------------------------------------
// Debug-mode leak detection
// ---------------------------------------------------------------------------

#[cfg(debug_assertions)]
impl Drop for WalkBudget {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth != 0 {
            panic!(
                "WalkBudget dropped at depth {}. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.depth,
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/budget_tests.rs"]
mod tests;
