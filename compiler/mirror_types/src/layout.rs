//! Object representation sizes for the target data model.
//!
//! The pool knows the layout of every type that is not a class: class
//! layout depends on members, so [`Pool::layout_class`] hands those back
//! to the caller as [`LayoutClass::Record`].

use crate::{DeclRef, Idx, Pool, TypeData};

/// Size and alignment of an object type, in bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Layout {
    pub size: u64,
    pub align: u64,
}

impl Layout {
    pub const fn new(size: u64, align: u64) -> Self {
        Layout { size, align }
    }

    /// Same size and alignment.
    pub const fn scalar(size: u64) -> Self {
        Layout { size, align: size }
    }

    /// Layout of `len` consecutive elements of this layout.
    pub fn repeat(self, len: u64) -> Option<Self> {
        Some(Layout {
            size: self.size.checked_mul(len)?,
            align: self.align,
        })
    }
}

/// Sizes of the fundamental types on the evaluation target.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TargetLayout {
    pub pointer: Layout,
    pub short: Layout,
    pub int: Layout,
    pub long: Layout,
    pub long_long: Layout,
    pub float: Layout,
    pub double: Layout,
    pub long_double: Layout,
}

impl TargetLayout {
    /// LP64 (x86-64 System V, AArch64 Linux).
    pub const LP64: Self = TargetLayout {
        pointer: Layout::scalar(8),
        short: Layout::scalar(2),
        int: Layout::scalar(4),
        long: Layout::scalar(8),
        long_long: Layout::scalar(8),
        float: Layout::scalar(4),
        double: Layout::scalar(8),
        long_double: Layout::scalar(16),
    };

    /// ILP32 (i386 System V).
    pub const ILP32: Self = TargetLayout {
        pointer: Layout::scalar(4),
        short: Layout::scalar(2),
        int: Layout::scalar(4),
        long: Layout::scalar(4),
        long_long: Layout::new(8, 4),
        float: Layout::scalar(4),
        double: Layout::new(8, 4),
        long_double: Layout::new(12, 4),
    };

    /// Width of a byte in bits.
    pub const CHAR_BIT: u64 = 8;
}

impl Default for TargetLayout {
    fn default() -> Self {
        Self::LP64
    }
}

/// How the size of a type is determined.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LayoutClass {
    /// Size is known from the target alone.
    Scalar(Layout),
    /// A reference: `sizeof` reports its referee.
    Reference(Idx),
    /// Class type; the owner of its declaration computes the layout.
    Record(DeclRef),
    /// Enumeration; sized by its underlying type.
    Enum(DeclRef),
    /// Array of a type that is not itself a scalar.
    Array { elem: Idx, len: u64 },
    /// `void`, functions and arrays of unknown bound have no size.
    Unsized,
}

impl Pool {
    /// Classify a type for layout computation.
    pub fn layout_class(&self, ty: Idx, target: &TargetLayout) -> LayoutClass {
        let ty = self.unqualified(ty);
        let scalar = LayoutClass::Scalar;
        match *self.data(ty) {
            TypeData::Void | TypeData::Function { .. } => LayoutClass::Unsized,
            TypeData::Bool | TypeData::Char | TypeData::SChar | TypeData::UChar => {
                scalar(Layout::scalar(1))
            }
            TypeData::Short | TypeData::UShort => scalar(target.short),
            TypeData::Int | TypeData::UInt => scalar(target.int),
            TypeData::Long | TypeData::ULong => scalar(target.long),
            TypeData::LongLong | TypeData::ULongLong => scalar(target.long_long),
            TypeData::Float => scalar(target.float),
            TypeData::Double => scalar(target.double),
            TypeData::LongDouble => scalar(target.long_double),
            TypeData::NullPtr | TypeData::Info | TypeData::Pointer(_) => scalar(target.pointer),
            TypeData::MemberPointer { pointee, .. } => {
                if self.is_function(pointee) {
                    // Itanium: function pointer plus this-adjustment.
                    scalar(Layout::new(target.pointer.size * 2, target.pointer.align))
                } else {
                    scalar(target.pointer)
                }
            }
            TypeData::LValueRef(inner) | TypeData::RValueRef(inner) => LayoutClass::Reference(inner),
            TypeData::Array { len: None, .. } => LayoutClass::Unsized,
            TypeData::Array { elem, len: Some(len) } => {
                match self.layout_class(elem, target) {
                    LayoutClass::Scalar(layout) => match layout.repeat(len) {
                        Some(layout) => LayoutClass::Scalar(layout),
                        None => LayoutClass::Unsized,
                    },
                    LayoutClass::Unsized => LayoutClass::Unsized,
                    _ => LayoutClass::Array { elem, len },
                }
            }
            TypeData::Qualified { inner, .. } => self.layout_class(inner, target),
            TypeData::Record(decl) => LayoutClass::Record(decl),
            TypeData::Enum(decl) => LayoutClass::Enum(decl),
        }
    }
}
