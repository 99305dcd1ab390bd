//! Type representation stored in the pool.

use bitflags::bitflags;

use crate::Idx;

/// Opaque reference to the declaration of a class or enumeration type.
///
/// The pool never looks inside; the declaration arena that hands these out
/// owns their meaning.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct DeclRef(pub u32);

bitflags! {
    /// Top-level cv-qualifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Quals: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
    }
}

impl Quals {
    /// Spelling used by type formatting (`const`, `volatile`, `const volatile`).
    pub fn spelling(self) -> &'static str {
        match (self.contains(Quals::CONST), self.contains(Quals::VOLATILE)) {
            (true, true) => "const volatile",
            (true, false) => "const",
            (false, true) => "volatile",
            (false, false) => "",
        }
    }
}

/// Type representation stored in the pool.
///
/// Compound types hold `Idx` children, so structurally equal types intern
/// to the same index. Qualified types are normalized at construction:
/// qualifiers never wrap references or functions, and qualifiers on an
/// array apply to its element type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    // Fundamental types (pre-interned at fixed indices)
    Void,
    Bool,
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    NullPtr,
    Info,

    // Compound types
    Pointer(Idx),
    LValueRef(Idx),
    RValueRef(Idx),
    /// Array type; `len` is `None` for an array of unknown bound.
    Array {
        elem: Idx,
        len: Option<u64>,
    },
    Qualified {
        inner: Idx,
        quals: Quals,
    },
    Function {
        params: Box<[Idx]>,
        ret: Idx,
        variadic: bool,
    },
    /// Pointer to member of `class` with type `pointee`.
    MemberPointer {
        class: Idx,
        pointee: Idx,
    },

    // Declared types
    Record(DeclRef),
    Enum(DeclRef),
}

impl TypeData {
    /// The fundamental types in `Idx` order.
    pub(crate) const PRIMITIVES: [TypeData; Idx::PRIMITIVE_COUNT as usize] = [
        TypeData::Void,
        TypeData::Bool,
        TypeData::Char,
        TypeData::SChar,
        TypeData::UChar,
        TypeData::Short,
        TypeData::UShort,
        TypeData::Int,
        TypeData::UInt,
        TypeData::Long,
        TypeData::ULong,
        TypeData::LongLong,
        TypeData::ULongLong,
        TypeData::Float,
        TypeData::Double,
        TypeData::LongDouble,
        TypeData::NullPtr,
        TypeData::Info,
    ];
}
