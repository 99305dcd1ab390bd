//! Dense arena indices.

use mirror_types::DeclRef;

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[allow(
                clippy::cast_possible_truncation,
                reason = "arena lengths are bounded by u32 handle payloads"
            )]
            pub(crate) fn from_len(len: usize) -> Self {
                Self(len as u32)
            }
        }
    };
}

arena_index!(
    /// A declaration in the translation unit.
    DeclId
);
arena_index!(
    /// An interned constant value.
    ValueId
);
arena_index!(
    /// An object with static storage duration, or a subobject of one.
    ObjectId
);
arena_index!(
    /// An interned data member description.
    DescId
);

impl DeclId {
    /// The global namespace, created with every translation unit.
    pub const GLOBAL: DeclId = DeclId(0);
}

impl From<DeclId> for DeclRef {
    fn from(id: DeclId) -> Self {
        DeclRef(id.0)
    }
}

impl From<DeclRef> for DeclId {
    fn from(decl: DeclRef) -> Self {
        DeclId(decl.0)
    }
}
