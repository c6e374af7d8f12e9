use rustc_hash::FxHashSet;
use tsmeta_common::{Diagnostic, DiagnosticCode};

/// Diagnostics of one analysis run, deduplicated by key in first-seen order.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    seen: FxHashSet<String>,
    items: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `code` unless a diagnostic with the same key was recorded.
    ///
    /// Returns `true` when the diagnostic was new.
    pub fn report_once(&mut self, key: &str, code: DiagnosticCode, args: &[&str]) -> bool {
        let key = format!("{}:{key}", code.as_u32());
        if !self.seen.insert(key) {
            return false;
        }
        self.items.push(Diagnostic::new(code, args));
        true
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
