//! Common types shared by the tsmeta crates.
//!
//! - Walk budgets and naming thresholds (`limits`)
//! - Diagnostic records produced when type information is unrecoverable

// Centralized limits and thresholds
pub mod limits;

// Advisory / warning records surfaced to callers
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticCode, format_message};

// Concrete scalar values shared by the oracle and the IR
pub mod literal;
pub use literal::LiteralValue;
