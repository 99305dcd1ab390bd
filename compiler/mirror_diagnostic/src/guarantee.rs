//! Type-level proof that an error was emitted.

use std::fmt;

/// Proof that at least one error diagnostic was emitted.
///
/// Only [`DiagnosticQueue::emit_error`](crate::DiagnosticQueue::emit_error)
/// and [`ErrorGuaranteed::from_error_count`] construct it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Recover a guarantee from an error count, if any errors exist.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

#[cfg(test)]
mod tests;
