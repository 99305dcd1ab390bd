//! Type-trait mirrors: categories, properties, relations and transforms.
//!
//! Category traits only look at the type pool. Class properties
//! (triviality, emptiness, polymorphism, abstractness, aggregates) need a
//! complete class and fail to be constant otherwise.

use mirror_types::{Idx, Quals};
use rustc_hash::FxHashSet;

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::Handle;
use crate::tu::{Access, DeclId, DeclKind, FunctionRole, SpecialMember};
use crate::Reflector;

/// Unary type traits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTrait {
    // Primary categories
    IsVoid,
    IsNullPointer,
    IsIntegral,
    IsFloatingPoint,
    IsArray,
    IsPointer,
    IsLvalueReference,
    IsRvalueReference,
    IsMemberObjectPointer,
    IsMemberFunctionPointer,
    IsEnum,
    IsUnion,
    IsClass,
    IsFunction,
    IsReflection,

    // Composite categories
    IsReference,
    IsArithmetic,
    IsFundamental,
    IsObject,
    IsScalar,
    IsCompound,
    IsMemberPointer,

    // Properties
    IsConst,
    IsVolatile,
    IsSigned,
    IsUnsigned,
    IsBoundedArray,
    IsUnboundedArray,
    IsScopedEnum,

    // Class properties
    IsTriviallyCopyable,
    IsTriviallyDefaultConstructible,
    IsTriviallyDestructible,
    IsEmpty,
    IsPolymorphic,
    IsAbstract,
    IsAggregate,
}

impl TypeTrait {
    /// Whether answering needs the class definition.
    fn needs_definition(self) -> bool {
        matches!(
            self,
            TypeTrait::IsTriviallyCopyable
                | TypeTrait::IsTriviallyDefaultConstructible
                | TypeTrait::IsTriviallyDestructible
                | TypeTrait::IsEmpty
                | TypeTrait::IsPolymorphic
                | TypeTrait::IsAbstract
                | TypeTrait::IsAggregate
        )
    }
}

/// Binary type relations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRelation {
    IsSame,
    /// `is_base_of(base, derived)`.
    IsBaseOf,
}

/// Type transformations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTransform {
    RemoveConst,
    RemoveVolatile,
    RemoveCv,
    AddConst,
    AddVolatile,
    AddCv,
    RemoveReference,
    AddLvalueReference,
    AddRvalueReference,
    RemoveCvref,
    AddPointer,
    RemovePointer,
    RemoveExtent,
    RemoveAllExtents,
    MakeSigned,
    MakeUnsigned,
    Decay,
}

impl Reflector {
    /// Evaluate a unary trait on a type handle.
    pub fn type_trait(&mut self, which: TypeTrait, handle: Handle) -> MetaResult<bool> {
        const OP: &str = "type_trait";
        self.tick(OP)?;
        let ty = self.expect_type(handle, OP)?;
        if which.needs_definition() {
            if let Some(class) = self.unit.class_of_type(self.unit.pool().remove_all_extents(ty)) {
                self.require_complete_type(self.unit.class_type(class), OP)?;
            }
        }
        let pool = self.unit.pool();
        Ok(match which {
            TypeTrait::IsVoid => pool.is_void(ty),
            TypeTrait::IsNullPointer => pool.is_null_pointer(ty),
            TypeTrait::IsIntegral => pool.is_integral(ty),
            TypeTrait::IsFloatingPoint => pool.is_floating_point(ty),
            TypeTrait::IsArray => pool.is_array(ty),
            TypeTrait::IsPointer => pool.is_pointer(ty),
            TypeTrait::IsLvalueReference => pool.is_lvalue_reference(ty),
            TypeTrait::IsRvalueReference => pool.is_rvalue_reference(ty),
            TypeTrait::IsMemberObjectPointer => pool.is_member_object_pointer(ty),
            TypeTrait::IsMemberFunctionPointer => pool.is_member_function_pointer(ty),
            TypeTrait::IsEnum => pool.is_enum(ty),
            TypeTrait::IsUnion => self.class_is(ty, |c| c.is_union()),
            TypeTrait::IsClass => self.class_is(ty, |c| !c.is_union()),
            TypeTrait::IsFunction => pool.is_function(ty),
            TypeTrait::IsReflection => pool.is_reflection(ty),
            TypeTrait::IsReference => pool.is_reference(ty),
            TypeTrait::IsArithmetic => pool.is_arithmetic(ty),
            TypeTrait::IsFundamental => pool.is_fundamental(ty),
            TypeTrait::IsObject => pool.is_object(ty),
            TypeTrait::IsScalar => pool.is_scalar(ty),
            TypeTrait::IsCompound => pool.is_compound(ty),
            TypeTrait::IsMemberPointer => pool.is_member_pointer(ty),
            TypeTrait::IsConst => pool.is_const(ty),
            TypeTrait::IsVolatile => pool.is_volatile(ty),
            TypeTrait::IsSigned => pool.is_signed(ty),
            TypeTrait::IsUnsigned => pool.is_unsigned(ty),
            TypeTrait::IsBoundedArray => pool.is_array(ty) && !pool.is_unbounded_array(ty),
            TypeTrait::IsUnboundedArray => pool.is_unbounded_array(ty),
            TypeTrait::IsScopedEnum => pool
                .enum_decl(ty)
                .and_then(|en| self.unit.enum_decl(en.into()))
                .is_some_and(|en| en.scoped),
            TypeTrait::IsTriviallyCopyable => self.trivially_copyable(ty),
            TypeTrait::IsTriviallyDefaultConstructible => {
                self.trivially_default_constructible(ty)
            }
            TypeTrait::IsTriviallyDestructible => self.trivially_destructible(ty),
            TypeTrait::IsEmpty => self.is_empty_class(ty)?,
            TypeTrait::IsPolymorphic => self
                .unit
                .class_of_type(ty)
                .is_some_and(|c| self.is_polymorphic_class(c)),
            TypeTrait::IsAbstract => self
                .unit
                .class_of_type(ty)
                .is_some_and(|c| !self.pure_virtuals(c).is_empty()),
            TypeTrait::IsAggregate => self.is_aggregate(ty),
        })
    }

    /// Evaluate a binary relation between two type handles.
    pub fn type_relation(&mut self, which: TypeRelation, a: Handle, b: Handle) -> MetaResult<bool> {
        const OP: &str = "type_relation";
        self.tick(OP)?;
        let lhs = self.expect_type(a, OP)?;
        let rhs = self.expect_type(b, OP)?;
        match which {
            TypeRelation::IsSame => Ok(lhs == rhs),
            TypeRelation::IsBaseOf => {
                let (Some(base), Some(derived)) = (
                    self.unit.class_of_type(lhs),
                    self.unit.class_of_type(rhs),
                ) else {
                    return Ok(false);
                };
                let base_key = self.unit.class_decl(base).map(|c| c.is_union());
                let derived_key = self.unit.class_decl(derived).map(|c| c.is_union());
                if base_key == Some(true) || derived_key == Some(true) {
                    return Ok(false);
                }
                let base_ty = self.unit.pool().unqualified(lhs);
                let derived_ty = self.unit.pool().unqualified(rhs);
                if base_ty == derived_ty {
                    return Ok(true);
                }
                self.require_complete_type(derived_ty, OP)?;
                Ok(self.derives_from(derived, base))
            }
        }
    }

    /// Apply a transformation to a type handle.
    pub fn type_transform(&mut self, which: TypeTransform, handle: Handle) -> MetaResult<Handle> {
        const OP: &str = "type_transform";
        self.tick(OP)?;
        let ty = self.expect_type(handle, OP)?;
        let pool = self.unit.pool_mut();
        let out = match which {
            TypeTransform::RemoveConst => pool.remove_const(ty),
            TypeTransform::RemoveVolatile => pool.remove_volatile(ty),
            TypeTransform::RemoveCv => pool.remove_cv(ty),
            TypeTransform::AddConst => pool.qualified(ty, Quals::CONST),
            TypeTransform::AddVolatile => pool.qualified(ty, Quals::VOLATILE),
            TypeTransform::AddCv => pool.qualified(ty, Quals::CONST | Quals::VOLATILE),
            TypeTransform::RemoveReference => pool.remove_reference(ty),
            TypeTransform::AddLvalueReference => pool.add_lvalue_reference(ty),
            TypeTransform::AddRvalueReference => pool.add_rvalue_reference(ty),
            TypeTransform::RemoveCvref => pool.remove_cvref(ty),
            TypeTransform::AddPointer => pool.add_pointer(ty),
            TypeTransform::RemovePointer => pool.remove_pointer(ty),
            TypeTransform::RemoveExtent => pool.remove_extent(ty),
            TypeTransform::RemoveAllExtents => pool.remove_all_extents(ty),
            TypeTransform::MakeSigned | TypeTransform::MakeUnsigned => {
                return self.change_signedness(ty, which == TypeTransform::MakeSigned)
            }
            TypeTransform::Decay => pool.decay(ty),
        };
        Ok(self.reflect_type(out))
    }

    /// `make_signed`/`make_unsigned`; enumerations map through their
    /// underlying type.
    fn change_signedness(&mut self, ty: Idx, signed: bool) -> MetaResult<Handle> {
        const OP: &str = "type_transform";
        let quals = self.unit.pool().quals(ty);
        let source = match self.unit.pool().enum_decl(ty) {
            Some(en) => {
                self.require_complete_type(ty, OP)?;
                let underlying = self.unit.enum_decl(en.into()).map_or(Idx::INT, |e| e.underlying);
                self.unit.pool_mut().qualified(underlying, quals)
            }
            None => ty,
        };
        let pool = self.unit.pool_mut();
        let changed = if signed {
            pool.make_signed(source)
        } else {
            pool.make_unsigned(source)
        };
        changed.map(|out| self.reflect_type(out)).ok_or_else(|| {
            MetaError::not_constant(
                OP,
                Precondition::WrongKind {
                    expected: "non-bool integral or enumeration type",
                    found: "other type",
                },
            )
        })
    }

    /// Array rank of a type.
    pub fn rank(&mut self, handle: Handle) -> MetaResult<u64> {
        self.tick("rank")?;
        let ty = self.expect_type(handle, "rank")?;
        Ok(self.unit.pool().rank(ty))
    }

    /// Bound of dimension `dim`, or 0.
    pub fn extent(&mut self, handle: Handle, dim: u64) -> MetaResult<u64> {
        self.tick("extent")?;
        let ty = self.expect_type(handle, "extent")?;
        Ok(self.unit.pool().extent(ty, dim))
    }

    // === Class Properties ===

    fn class_is(&self, ty: Idx, pred: impl FnOnce(&crate::tu::ClassDecl) -> bool) -> bool {
        self.unit
            .class_of_type(ty)
            .and_then(|id| self.unit.class_decl(id))
            .is_some_and(pred)
    }

    /// Non-static data members, in declaration order.
    pub(crate) fn fields_of(&self, class: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.unit
            .class_decl(class)
            .map(|c| c.members.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&m| matches!(self.unit.decl(m).kind, DeclKind::Field(_)))
    }

    fn field_types(&self, class: DeclId) -> Vec<Idx> {
        self.fields_of(class)
            .filter_map(|m| match &self.unit.decl(m).kind {
                DeclKind::Field(f) => Some(f.ty),
                _ => None,
            })
            .collect()
    }

    /// Classes named by base-specifiers.
    pub(crate) fn base_classes(&self, class: DeclId) -> Vec<(DeclId, bool, Access)> {
        self.unit
            .class_decl(class)
            .map(|c| c.bases.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&b| {
                let decl = self.unit.decl(b);
                match &decl.kind {
                    DeclKind::Base(base) => self
                        .unit
                        .class_of_type(base.ty)
                        .map(|c| (c, base.is_virtual, decl.access)),
                    _ => None,
                }
            })
            .collect()
    }

    fn member_functions(&self, class: DeclId) -> impl Iterator<Item = &crate::tu::FunctionDecl> + '_ {
        self.unit
            .class_decl(class)
            .map(|c| c.members.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&m| match &self.unit.decl(m).kind {
                DeclKind::Function(f) => Some(f),
                _ => None,
            })
    }

    fn has_user_special(&self, class: DeclId, which: &[SpecialMember]) -> bool {
        self.member_functions(class).any(|f| {
            f.special.is_some_and(|s| which.contains(&s))
                && ((f.user_provided && !f.is_defaulted) || f.is_deleted)
        })
    }

    fn has_virtual_function(&self, class: DeclId) -> bool {
        self.member_functions(class).any(|f| f.is_virtual)
    }

    pub(crate) fn trivially_destructible(&self, ty: Idx) -> bool {
        let pool = self.unit.pool();
        if pool.is_reference(ty) || pool.is_scalar(ty) {
            return true;
        }
        let elem = pool.remove_all_extents(ty);
        let Some(class) = self.unit.class_of_type(elem) else {
            return pool.is_object(elem) && !pool.is_void(elem);
        };
        !self.has_user_special(class, &[SpecialMember::Destructor])
            && self.member_functions(class).all(|f| {
                !(f.role == FunctionRole::Destructor && f.is_virtual)
            })
            && self.base_classes(class).iter().all(|&(b, _, _)| {
                self.trivially_destructible(self.unit.class_type(b))
            })
            && self
                .field_types(class)
                .into_iter()
                .all(|t| self.trivially_destructible(t))
    }

    pub(crate) fn trivially_default_constructible(&self, ty: Idx) -> bool {
        let pool = self.unit.pool();
        if pool.is_reference(ty) {
            return false;
        }
        if pool.is_scalar(ty) {
            return true;
        }
        let elem = pool.remove_all_extents(ty);
        let Some(class) = self.unit.class_of_type(elem) else {
            return pool.is_object(elem) && !pool.is_void(elem) && !pool.is_unbounded_array(ty);
        };
        let has_default_init = self.fields_of(class).any(|m| {
            matches!(&self.unit.decl(m).kind, DeclKind::Field(f) if f.has_default_init)
        });
        !self.has_user_special(class, &[SpecialMember::DefaultConstructor])
            && !self.has_virtual_function(class)
            && !has_default_init
            && self.base_classes(class).iter().all(|&(b, is_virtual, _)| {
                !is_virtual && self.trivially_default_constructible(self.unit.class_type(b))
            })
            && self
                .field_types(class)
                .into_iter()
                .all(|t| self.trivially_default_constructible(t))
            && self.trivially_destructible(elem)
    }

    pub(crate) fn trivially_copyable(&self, ty: Idx) -> bool {
        let pool = self.unit.pool();
        if pool.is_scalar(ty) {
            return true;
        }
        if pool.is_reference(ty) || pool.is_void(ty) || pool.is_function(ty) {
            return false;
        }
        let elem = pool.remove_all_extents(ty);
        let Some(class) = self.unit.class_of_type(elem) else {
            return false;
        };
        let copy_ops = [
            SpecialMember::CopyConstructor,
            SpecialMember::MoveConstructor,
            SpecialMember::CopyAssignment,
            SpecialMember::MoveAssignment,
        ];
        !self.has_user_special(class, &copy_ops)
            && !self.has_virtual_function(class)
            && self.trivially_destructible(elem)
            && self.base_classes(class).iter().all(|&(b, is_virtual, _)| {
                !is_virtual && self.trivially_copyable(self.unit.class_type(b))
            })
            && self.field_types(class).into_iter().all(|t| {
                self.unit.pool().is_reference(t) || self.trivially_copyable(t)
            })
    }

    fn is_empty_class(&mut self, ty: Idx) -> MetaResult<bool> {
        let Some(class) = self.unit.class_of_type(ty) else {
            return Ok(false);
        };
        if self.unit.class_decl(class).is_some_and(|c| c.is_union()) {
            return Ok(false);
        }
        let target = self.config.target;
        match self.unit.record_layout(class, &target) {
            Ok(layout) => Ok(layout.is_empty),
            Err(_) => Err(MetaError::not_constant(
                "type_trait",
                Precondition::IncompleteType(self.unit.qualified_name(class)),
            )),
        }
    }

    fn is_polymorphic_class(&self, class: DeclId) -> bool {
        self.has_virtual_function(class)
            || self
                .base_classes(class)
                .iter()
                .any(|&(b, _, _)| self.is_polymorphic_class(b))
    }

    /// Names of pure virtual functions not overridden in `class`.
    fn pure_virtuals(&self, class: DeclId) -> FxHashSet<mirror_ir::Name> {
        let mut pure: FxHashSet<mirror_ir::Name> = self
            .base_classes(class)
            .iter()
            .flat_map(|&(b, _, _)| self.pure_virtuals(b))
            .collect();
        let Some(decl) = self.unit.class_decl(class) else {
            return pure;
        };
        for &m in &decl.members {
            let member = self.unit.decl(m);
            if let DeclKind::Function(f) = &member.kind {
                if f.is_pure {
                    pure.insert(member.name);
                } else if f.is_virtual {
                    pure.remove(&member.name);
                }
            }
        }
        pure
    }

    fn is_aggregate(&self, ty: Idx) -> bool {
        let pool = self.unit.pool();
        if pool.is_array(ty) {
            return true;
        }
        let Some(class) = self.unit.class_of_type(ty) else {
            return false;
        };
        let user_ctor = self
            .member_functions(class)
            .any(|f| f.role == FunctionRole::Constructor && !f.is_defaulted);
        let non_public_field = self
            .fields_of(class)
            .any(|m| self.unit.decl(m).access != Access::Public);
        let bad_base = self
            .base_classes(class)
            .iter()
            .any(|&(_, is_virtual, access)| is_virtual || access != Access::Public);
        !user_ctor && !non_public_field && !bad_base && !self.has_virtual_function(class)
    }

    /// Whether `derived` has `base` as a direct or indirect base.
    fn derives_from(&self, derived: DeclId, base: DeclId) -> bool {
        self.base_classes(derived)
            .iter()
            .any(|&(b, _, _)| b == base || self.derives_from(b, base))
    }
}
