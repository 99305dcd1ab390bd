//! Type system for the mirror reflection engine.
//!
//! All types are interned in a [`Pool`] and referenced by a 32-bit [`Idx`].
//! Equal types always intern to the same index, so type identity is index
//! equality. Typedef-names are not types: an alias is a declaration whose
//! target is an `Idx`, which is why `dealias` can be expressed as a lookup.
//!
//! Class and enumeration types refer to their declaration through an opaque
//! [`DeclRef`]; everything that needs the member list (class layout,
//! triviality) lives in the crate that owns declarations.

mod classify;
mod data;
mod format;
mod idx;
mod layout;
mod pool;

pub use data::{DeclRef, Quals, TypeData};
pub use format::RecordNames;
pub use idx::Idx;
pub use layout::{Layout, LayoutClass, TargetLayout};
pub use pool::Pool;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{DeclRef, Idx};
    mirror_ir::static_assert_size!(Idx, 4);
    mirror_ir::static_assert_size!(DeclRef, 4);
}
