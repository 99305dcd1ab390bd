//! Splices: binding a handle back into a grammar position.
//!
//! The parser tells us where the splice appears and which prefix it
//! carries; the handle tells us what it denotes. Explicit `typename` and
//! `template` prefixes are authoritative. Without one, a type-only
//! position reads the handle as a type, and a non-dependent handle naming
//! a primary class or alias template reads as a placeholder for a deduced
//! type. Everything else in expression position is an expression.
//!
//! Misuse is ill-formed regardless of evaluation, so every failure here is
//! [`IllFormed`].

use mirror_types::Idx;

use crate::errors::{IllFormed, MetaError, MetaResult};
use crate::handle::{Construct, Handle};
use crate::tu::{DeclId, DeclKind, FunctionDecl, FunctionRole, TemplateKind};
use crate::Reflector;

/// Grammar position of a splice.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SpliceSite {
    Expression,
    /// A position where only a type can appear.
    TypeOnly,
    /// `namespace [:r:] { ... }`.
    NamespaceOpening,
    /// `using namespace [:r:];`
    UsingDirective,
    /// `using enum [:r:];`
    UsingEnum,
    /// The type or constraint of a template parameter declaration.
    TemplateParameter,
    /// `.[:r:] = value` in a designated initializer.
    Designator,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum SplicePrefix {
    #[default]
    None,
    Typename,
    Template,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueCategory {
    LValue,
    PRValue,
}

/// What a splice turned into.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Spliced {
    Expression {
        entity: Handle,
        category: ValueCategory,
        ty: Idx,
    },
    Type(Idx),
    /// A class or alias template used as a placeholder for a deduced type.
    DeducedClassType(DeclId),
    TemplateName(DeclId),
    Namespace(DeclId),
}

/// Result of `&[:r:]`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SplicedAddress {
    PointerToMemberData { member: DeclId, ty: Idx },
    PointerToMemberFunction { function: DeclId, ty: Idx },
    FunctionPointer { function: DeclId, ty: Idx },
    ObjectPointer { ty: Idx },
    /// The address of a function template; the target type picks the
    /// specialization.
    UnresolvedOverloadAddress(DeclId),
}

fn mismatch(expected: &'static str, found: Construct) -> MetaError {
    IllFormed::SpliceKindMismatch {
        expected,
        found: found.kind_name(),
    }
    .into()
}

impl Reflector {
    /// Splice `handle` at `site`.
    ///
    /// `dependent` is true when the splice operand depends on a template
    /// parameter at the point it was parsed.
    pub fn splice(
        &mut self,
        handle: Handle,
        site: SpliceSite,
        prefix: SplicePrefix,
        dependent: bool,
    ) -> MetaResult<Spliced> {
        const OP: &str = "splice";
        self.tick(OP)?;
        let construct = self.decode(handle, OP)?;
        match site {
            SpliceSite::Designator => return Err(IllFormed::DesignatorSplice.into()),
            SpliceSite::NamespaceOpening => {
                return Err(IllFormed::NamespaceDefinitionSplice.into())
            }
            SpliceSite::UsingDirective if dependent => {
                return Err(IllFormed::DependentUsingDirective.into())
            }
            SpliceSite::UsingEnum if dependent => return Err(IllFormed::DependentUsingEnum.into()),
            _ => {}
        }
        if construct == Construct::Null {
            return Err(IllFormed::NullSplice.into());
        }

        match site {
            SpliceSite::UsingDirective => match construct {
                Construct::Namespace(id) => Ok(Spliced::Namespace(id)),
                Construct::NamespaceAlias(id) => Ok(Spliced::Namespace(self.namespace_target(id))),
                other => Err(mismatch("namespace", other)),
            },
            SpliceSite::UsingEnum => {
                let ty = self.splice_type(construct)?;
                if self.unit.pool().is_enum(ty) {
                    Ok(Spliced::Type(ty))
                } else {
                    Err(mismatch("enumeration type", construct))
                }
            }
            SpliceSite::TemplateParameter => {
                if self.names_concept(construct) {
                    return Err(IllFormed::ConceptTemplateParameter.into());
                }
                self.splice_type(construct).map(Spliced::Type)
            }
            SpliceSite::TypeOnly => match prefix {
                SplicePrefix::Template => self.splice_template(construct),
                SplicePrefix::None | SplicePrefix::Typename => {
                    if let Some(id) = self.deducible_template(construct, dependent) {
                        return Ok(Spliced::DeducedClassType(id));
                    }
                    self.splice_type(construct).map(Spliced::Type)
                }
            },
            SpliceSite::Expression => match prefix {
                SplicePrefix::Typename => self.splice_type(construct).map(Spliced::Type),
                SplicePrefix::Template => self.splice_template(construct),
                SplicePrefix::None => {
                    if let Some(id) = self.deducible_template(construct, dependent) {
                        return Ok(Spliced::DeducedClassType(id));
                    }
                    self.splice_expression(handle, construct)
                }
            },
            SpliceSite::Designator | SpliceSite::NamespaceOpening => {
                Err(MetaError::Internal("splice site handled above".into()))
            }
        }
    }

    fn splice_type(&self, construct: Construct) -> MetaResult<Idx> {
        match construct {
            Construct::Type(ty) => Ok(ty),
            Construct::TypeAlias(id) => match &self.unit.decl(id).kind {
                DeclKind::TypeAlias(alias) => Ok(alias.target),
                _ => Err(mismatch("type", construct)),
            },
            other => Err(mismatch("type", other)),
        }
    }

    fn splice_template(&self, construct: Construct) -> MetaResult<Spliced> {
        match construct {
            Construct::Template(id) => Ok(Spliced::TemplateName(id)),
            other => Err(mismatch("template", other)),
        }
    }

    fn names_concept(&self, construct: Construct) -> bool {
        matches!(construct, Construct::Template(id)
            if self.unit.template(id).is_some_and(|t| t.kind == TemplateKind::Concept))
    }

    /// A non-dependent class or alias template, read as a type.
    fn deducible_template(&self, construct: Construct, dependent: bool) -> Option<DeclId> {
        let Construct::Template(id) = construct else {
            return None;
        };
        let kind = self.unit.template(id)?.kind;
        (!dependent && matches!(kind, TemplateKind::Class | TemplateKind::Alias)).then_some(id)
    }

    fn splice_expression(&self, handle: Handle, construct: Construct) -> MetaResult<Spliced> {
        let pool = self.unit.pool();
        let (category, ty) = match construct {
            Construct::Value(id) => (ValueCategory::PRValue, self.unit.values().get(id).ty),
            Construct::Object(id) => (ValueCategory::LValue, self.unit.objects().get(id).ty),
            Construct::Enumerator(id) => match self.unit.decl(id).kind {
                DeclKind::Enumerator { enumeration, .. } => {
                    (ValueCategory::PRValue, self.unit.class_type(enumeration))
                }
                _ => return Err(mismatch("expression", construct)),
            },
            Construct::Variable(id)
            | Construct::StructuredBinding(id)
            | Construct::DataMember(id)
            | Construct::Function(id) => {
                let ty = match &self.unit.decl(id).kind {
                    DeclKind::Variable(var) => pool.remove_reference(var.ty),
                    DeclKind::StructuredBinding { ty, .. } => *ty,
                    DeclKind::Field(field) => pool.remove_reference(field.ty),
                    DeclKind::Function(func) => {
                        reject_special_member(func)?;
                        func.ty
                    }
                    _ => return Err(mismatch("expression", construct)),
                };
                (ValueCategory::LValue, ty)
            }
            other => return Err(mismatch("expression", other)),
        };
        Ok(Spliced::Expression {
            entity: handle,
            category,
            ty,
        })
    }

    /// `&[:r:]`.
    pub fn address_of_splice(&mut self, handle: Handle) -> MetaResult<SplicedAddress> {
        const OP: &str = "address_of_splice";
        self.tick(OP)?;
        let construct = self.decode(handle, OP)?;
        let parent_type = |this: &Self, id: DeclId| {
            this.unit
                .decl(id)
                .parent
                .map_or(Idx::VOID, |parent| this.unit.class_type(parent))
        };
        match construct {
            Construct::Null => Err(IllFormed::NullSplice.into()),
            Construct::DataMember(id) => {
                let DeclKind::Field(field) = &self.unit.decl(id).kind else {
                    return Err(mismatch("data member", construct));
                };
                let (field_ty, bit_field) = (field.ty, field.is_bit_field());
                if bit_field {
                    return Err(IllFormed::BitFieldAddress(self.unit.qualified_name(id)).into());
                }
                if self.unit.pool().is_reference(field_ty) {
                    return Err(IllFormed::SpliceKindMismatch {
                        expected: "non-reference data member",
                        found: "reference member",
                    }
                    .into());
                }
                let class = parent_type(self, id);
                let ty = self.unit.pool_mut().member_pointer(class, field_ty);
                Ok(SplicedAddress::PointerToMemberData { member: id, ty })
            }
            Construct::Function(id) => {
                let DeclKind::Function(func) = &self.unit.decl(id).kind else {
                    return Err(mismatch("function", construct));
                };
                reject_special_member(func)?;
                let (role, func_ty) = (func.role, func.ty);
                if role == FunctionRole::ImplicitObject {
                    let class = parent_type(self, id);
                    let ty = self.unit.pool_mut().member_pointer(class, func_ty);
                    Ok(SplicedAddress::PointerToMemberFunction { function: id, ty })
                } else {
                    let ty = self.unit.pool_mut().pointer(func_ty);
                    Ok(SplicedAddress::FunctionPointer { function: id, ty })
                }
            }
            Construct::Template(id)
                if self.unit.template(id).is_some_and(|t| t.kind == TemplateKind::Function) =>
            {
                Ok(SplicedAddress::UnresolvedOverloadAddress(id))
            }
            Construct::Variable(_) | Construct::StructuredBinding(_) | Construct::Object(_) => {
                let Spliced::Expression { ty, .. } = self.splice_expression(handle, construct)?
                else {
                    return Err(mismatch("object", construct));
                };
                let ty = self.unit.pool_mut().pointer(ty);
                Ok(SplicedAddress::ObjectPointer { ty })
            }
            Construct::Value(_) | Construct::Enumerator(_) => Err(IllFormed::SpliceKindMismatch {
                expected: "lvalue",
                found: "prvalue",
            }
            .into()),
            other => Err(mismatch("addressable entity", other)),
        }
    }
}

fn reject_special_member(func: &FunctionDecl) -> MetaResult<()> {
    match func.role {
        FunctionRole::Constructor => Err(IllFormed::SpecialMemberSplice("constructor").into()),
        FunctionRole::Destructor => Err(IllFormed::SpecialMemberSplice("destructor").into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests;
