//! Source location spans.
//!
//! Evaluation sites carry a span so diagnostics can point at the failing
//! expression, and injected declarations are attributed to the position
//! just past it.

use std::fmt;

/// Byte range `start..end` in the translation unit's source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// For declarations built without source, and for tests.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Zero-length span immediately after this one.
    ///
    /// The locus of an injected declaration.
    #[inline]
    #[must_use]
    pub const fn after(self) -> Span {
        Span {
            start: self.end,
            end: self.end,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
