//! Diagnostic queue for collecting diagnostics during a translation.
//!
//! Diagnostics are kept in emission order. Emission order is program
//! order because plainly-evaluated expressions run exactly once, in
//! lexical order.

use crate::{Diagnostic, ErrorGuaranteed};

/// Queue of emitted diagnostics.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an error and get proof that it was recorded.
    pub fn emit_error(&mut self, diagnostic: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diagnostic.is_error());
        self.error_count += 1;
        self.diagnostics.push(diagnostic);
        ErrorGuaranteed::new()
    }

    /// Record a non-error diagnostic (warning or note).
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            let _ = self.emit_error(diagnostic);
        } else {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Proof that errors were emitted, if any were.
    pub fn guarantee(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the queue empty.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }
}
