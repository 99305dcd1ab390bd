//! Interned string identifier.

use std::fmt;

/// Interned string identifier.
///
/// A dense index into the owning [`StringInterner`](crate::StringInterner).
/// Two names are equal exactly when they were interned from equal strings
/// by the same interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Pre-interned placeholder identifier `_`.
    ///
    /// The placeholder may name several members of one class.
    pub const PLACEHOLDER: Name = Name(1);

    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the interner's string table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the empty name of an unnamed entity.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    #[inline]
    pub const fn is_placeholder(self) -> bool {
        self.0 == Self::PLACEHOLDER.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
