//! Unified type index handle.
//!
//! `Idx` is the canonical type representation: a 32-bit index into the
//! [`Pool`](crate::Pool). Fundamental types are pre-interned at fixed
//! indices so they can be named without a pool.

use std::fmt;

/// A 32-bit index into the type pool.
///
/// Types are compared by index equality (O(1)), never structurally.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Fundamental Types (indices 0-17) ===
    // Pre-interned at pool creation, in this order.

    pub const VOID: Self = Self(0);
    pub const BOOL: Self = Self(1);
    pub const CHAR: Self = Self(2);
    pub const SCHAR: Self = Self(3);
    pub const UCHAR: Self = Self(4);
    pub const SHORT: Self = Self(5);
    pub const USHORT: Self = Self(6);
    pub const INT: Self = Self(7);
    pub const UINT: Self = Self(8);
    pub const LONG: Self = Self(9);
    pub const ULONG: Self = Self(10);
    pub const LLONG: Self = Self(11);
    pub const ULLONG: Self = Self(12);
    pub const FLOAT: Self = Self(13);
    pub const DOUBLE: Self = Self(14);
    pub const LDOUBLE: Self = Self(15);
    /// `decltype(nullptr)`.
    pub const NULLPTR: Self = Self(16);
    /// The reflection handle type itself (`std::meta::info`).
    pub const INFO: Self = Self(17);

    /// `size_t` on the LP64 data model.
    pub const SIZE_T: Self = Self::ULONG;

    /// Number of pre-interned fundamental types.
    pub const PRIMITIVE_COUNT: u32 = 18;

    /// First index for dynamically interned types.
    pub const FIRST_DYNAMIC: u32 = Self::PRIMITIVE_COUNT;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a pre-interned fundamental type.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    /// Spelling of a fundamental type, `None` for dynamic types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("void"),
            1 => Some("bool"),
            2 => Some("char"),
            3 => Some("signed char"),
            4 => Some("unsigned char"),
            5 => Some("short"),
            6 => Some("unsigned short"),
            7 => Some("int"),
            8 => Some("unsigned int"),
            9 => Some("long"),
            10 => Some("unsigned long"),
            11 => Some("long long"),
            12 => Some("unsigned long long"),
            13 => Some("float"),
            14 => Some("double"),
            15 => Some("long double"),
            16 => Some("std::nullptr_t"),
            17 => Some("std::meta::info"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}
