//! Primary and composite type categories, plus the structural
//! transformations that need nothing but the pool.
//!
//! Every predicate looks through top-level qualifiers.

use crate::{DeclRef, Idx, Pool, Quals, TypeData};

impl Pool {
    fn bare(&self, ty: Idx) -> &TypeData {
        self.data(self.unqualified(ty))
    }

    // === Primary Categories ===

    pub fn is_void(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::Void)
    }

    pub fn is_null_pointer(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::NullPtr)
    }

    pub fn is_integral(&self, ty: Idx) -> bool {
        matches!(
            self.bare(ty),
            TypeData::Bool
                | TypeData::Char
                | TypeData::SChar
                | TypeData::UChar
                | TypeData::Short
                | TypeData::UShort
                | TypeData::Int
                | TypeData::UInt
                | TypeData::Long
                | TypeData::ULong
                | TypeData::LongLong
                | TypeData::ULongLong
        )
    }

    pub fn is_floating_point(&self, ty: Idx) -> bool {
        matches!(
            self.bare(ty),
            TypeData::Float | TypeData::Double | TypeData::LongDouble
        )
    }

    pub fn is_array(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::Array { .. })
    }

    pub fn is_pointer(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::Pointer(_))
    }

    pub fn is_lvalue_reference(&self, ty: Idx) -> bool {
        matches!(self.data(ty), TypeData::LValueRef(_))
    }

    pub fn is_rvalue_reference(&self, ty: Idx) -> bool {
        matches!(self.data(ty), TypeData::RValueRef(_))
    }

    pub fn is_member_object_pointer(&self, ty: Idx) -> bool {
        match *self.bare(ty) {
            TypeData::MemberPointer { pointee, .. } => !self.is_function(pointee),
            _ => false,
        }
    }

    pub fn is_member_function_pointer(&self, ty: Idx) -> bool {
        match *self.bare(ty) {
            TypeData::MemberPointer { pointee, .. } => self.is_function(pointee),
            _ => false,
        }
    }

    pub fn is_enum(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::Enum(_))
    }

    /// Class or union type. The pool cannot tell the two apart.
    pub fn is_record(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::Record(_))
    }

    pub fn is_function(&self, ty: Idx) -> bool {
        matches!(self.data(ty), TypeData::Function { .. })
    }

    pub fn is_reflection(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::Info)
    }

    // === Composite Categories ===

    pub fn is_reference(&self, ty: Idx) -> bool {
        self.is_lvalue_reference(ty) || self.is_rvalue_reference(ty)
    }

    pub fn is_arithmetic(&self, ty: Idx) -> bool {
        self.is_integral(ty) || self.is_floating_point(ty)
    }

    pub fn is_fundamental(&self, ty: Idx) -> bool {
        self.unqualified(ty).is_primitive()
    }

    pub fn is_member_pointer(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::MemberPointer { .. })
    }

    pub fn is_scalar(&self, ty: Idx) -> bool {
        self.is_arithmetic(ty)
            || self.is_enum(ty)
            || self.is_pointer(ty)
            || self.is_member_pointer(ty)
            || self.is_null_pointer(ty)
            || self.is_reflection(ty)
    }

    pub fn is_object(&self, ty: Idx) -> bool {
        !(self.is_function(ty) || self.is_reference(ty) || self.is_void(ty))
    }

    pub fn is_compound(&self, ty: Idx) -> bool {
        !self.is_fundamental(ty)
    }

    pub fn is_signed(&self, ty: Idx) -> bool {
        matches!(
            self.bare(ty),
            TypeData::Char
                | TypeData::SChar
                | TypeData::Short
                | TypeData::Int
                | TypeData::Long
                | TypeData::LongLong
                | TypeData::Float
                | TypeData::Double
                | TypeData::LongDouble
        )
    }

    pub fn is_unsigned(&self, ty: Idx) -> bool {
        matches!(
            self.bare(ty),
            TypeData::Bool
                | TypeData::UChar
                | TypeData::UShort
                | TypeData::UInt
                | TypeData::ULong
                | TypeData::ULongLong
        )
    }

    pub fn is_const(&self, ty: Idx) -> bool {
        self.quals(ty).contains(Quals::CONST)
    }

    pub fn is_volatile(&self, ty: Idx) -> bool {
        self.quals(ty).contains(Quals::VOLATILE)
    }

    /// Array of unknown bound.
    pub fn is_unbounded_array(&self, ty: Idx) -> bool {
        matches!(self.bare(ty), TypeData::Array { len: None, .. })
    }

    /// Declaration of a class type, looking through qualifiers.
    pub fn class_of(&self, ty: Idx) -> Option<DeclRef> {
        self.record_decl(ty)
    }

    // === Transformations ===

    pub fn remove_const(&mut self, ty: Idx) -> Idx {
        self.remove_quals(ty, Quals::CONST)
    }

    pub fn remove_volatile(&mut self, ty: Idx) -> Idx {
        self.remove_quals(ty, Quals::VOLATILE)
    }

    pub fn remove_cv(&mut self, ty: Idx) -> Idx {
        self.remove_quals(ty, Quals::all())
    }

    fn remove_quals(&mut self, ty: Idx, remove: Quals) -> Idx {
        match self.data(ty).clone() {
            TypeData::Qualified { inner, quals } => self.qualified(inner, quals - remove),
            TypeData::Array { elem, len } => {
                let elem = self.remove_quals(elem, remove);
                self.array(elem, len)
            }
            _ => ty,
        }
    }

    pub fn remove_reference(&self, ty: Idx) -> Idx {
        self.referee(ty)
    }

    /// `remove_cvref`: strip a reference, then its referee's qualifiers.
    pub fn remove_cvref(&mut self, ty: Idx) -> Idx {
        let referee = self.referee(ty);
        self.remove_cv(referee)
    }

    /// `add_lvalue_reference`; `void` has no reference type and is returned as-is.
    pub fn add_lvalue_reference(&mut self, ty: Idx) -> Idx {
        if self.is_void(ty) {
            return ty;
        }
        self.lvalue_ref(ty)
    }

    pub fn add_rvalue_reference(&mut self, ty: Idx) -> Idx {
        if self.is_void(ty) {
            return ty;
        }
        self.rvalue_ref(ty)
    }

    pub fn add_pointer(&mut self, ty: Idx) -> Idx {
        let referee = self.referee(ty);
        self.pointer(referee)
    }

    pub fn remove_pointer(&self, ty: Idx) -> Idx {
        match *self.bare(ty) {
            TypeData::Pointer(pointee) => pointee,
            _ => ty,
        }
    }

    pub fn remove_extent(&self, ty: Idx) -> Idx {
        match *self.data(ty) {
            TypeData::Array { elem, .. } => elem,
            _ => ty,
        }
    }

    pub fn remove_all_extents(&self, ty: Idx) -> Idx {
        let mut ty = ty;
        while let TypeData::Array { elem, .. } = *self.data(ty) {
            ty = elem;
        }
        ty
    }

    /// Number of array dimensions.
    pub fn rank(&self, ty: Idx) -> u64 {
        let mut rank = 0;
        let mut ty = ty;
        while let TypeData::Array { elem, .. } = *self.data(ty) {
            rank += 1;
            ty = elem;
        }
        rank
    }

    /// Bound of the `dim`-th array dimension; 0 when absent or unknown.
    pub fn extent(&self, ty: Idx, dim: u64) -> u64 {
        let mut ty = ty;
        let mut dim = dim;
        while let TypeData::Array { elem, len } = *self.data(ty) {
            if dim == 0 {
                return len.unwrap_or(0);
            }
            dim -= 1;
            ty = elem;
        }
        0
    }

    /// Array-to-pointer and function-to-pointer conversion, else `remove_cvref`.
    pub fn decay(&mut self, ty: Idx) -> Idx {
        let referee = self.referee(ty);
        match *self.data(referee) {
            TypeData::Array { elem, .. } => self.pointer(elem),
            TypeData::Function { .. } => self.pointer(referee),
            _ => self.remove_cv(referee),
        }
    }

    /// The signed counterpart of an integral type.
    ///
    /// `None` for `bool` and non-integral types. Enumerations go through
    /// their underlying type first.
    pub fn make_signed(&mut self, ty: Idx) -> Option<Idx> {
        let quals = self.quals(ty);
        let signed = match *self.bare(ty) {
            TypeData::Char | TypeData::SChar | TypeData::UChar => Idx::SCHAR,
            TypeData::Short | TypeData::UShort => Idx::SHORT,
            TypeData::Int | TypeData::UInt => Idx::INT,
            TypeData::Long | TypeData::ULong => Idx::LONG,
            TypeData::LongLong | TypeData::ULongLong => Idx::LLONG,
            _ => return None,
        };
        Some(self.qualified(signed, quals))
    }

    /// The unsigned counterpart of an integral type.
    pub fn make_unsigned(&mut self, ty: Idx) -> Option<Idx> {
        let quals = self.quals(ty);
        let unsigned = match *self.bare(ty) {
            TypeData::Char | TypeData::SChar | TypeData::UChar => Idx::UCHAR,
            TypeData::Short | TypeData::UShort => Idx::USHORT,
            TypeData::Int | TypeData::UInt => Idx::UINT,
            TypeData::Long | TypeData::ULong => Idx::ULONG,
            TypeData::LongLong | TypeData::ULongLong => Idx::ULLONG,
            _ => return None,
        };
        Some(self.qualified(unsigned, quals))
    }

    /// `(bits, signed)` of an integral type, used for narrowing checks.
    pub fn integer_shape(&self, ty: Idx) -> Option<(u32, bool)> {
        let shape = match *self.bare(ty) {
            TypeData::Bool => (1, false),
            TypeData::Char | TypeData::SChar => (8, true),
            TypeData::UChar => (8, false),
            TypeData::Short => (16, true),
            TypeData::UShort => (16, false),
            TypeData::Int => (32, true),
            TypeData::UInt => (32, false),
            TypeData::Long | TypeData::LongLong => (64, true),
            TypeData::ULong | TypeData::ULongLong => (64, false),
            _ => return None,
        };
        Some(shape)
    }
}
