//! Mirror IR - shared leaf types for the reflection engine.
//!
//! This crate holds the data every other mirror crate agrees on:
//! - Names for interned identifiers
//! - Spans for source locations
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers become `Name(u32)` so equality is O(1)
//! - **Copy handles**: everything here is a small `Copy` value

/// Compile-time assertion that a type has a specific size.
///
/// Used to pin the size of scalar handles that must stay pointer-sized.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;

pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Name, Span};
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(Span, 8);
}
