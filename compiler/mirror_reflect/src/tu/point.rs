//! Program points.
//!
//! Lexical order is a total order over [`ProgramPoint`]s. Declarations
//! produced by compile-time evaluation additionally get an
//! [`InjectedPoint`], which is reachable only from evaluation contexts that
//! contain it explicitly.

use std::fmt;

/// A position in lexical program order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct ProgramPoint(u32);

impl ProgramPoint {
    /// Before every declaration.
    pub const START: ProgramPoint = ProgramPoint(0);

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub(crate) const fn next(self) -> ProgramPoint {
        ProgramPoint(self.0.saturating_add(1))
    }

    /// Whether something declared at `self` is lexically visible from `from`.
    #[inline]
    pub fn precedes(self, from: ProgramPoint) -> bool {
        self < from
    }
}

impl fmt::Debug for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// The point of an injected declaration, reachable from itself only.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct InjectedPoint(u32);

impl InjectedPoint {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "one injected point per injected declaration"
    )]
    pub(crate) fn from_len(len: usize) -> Self {
        InjectedPoint(len as u32)
    }
}
