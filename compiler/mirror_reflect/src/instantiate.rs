//! On-demand instantiation of class-template specializations.
//!
//! Completeness-sensitive queries call [`Reflector::ensure_complete`]
//! before looking at a class. A specialization is instantiated only when
//! its template's definition is reachable from the current context; an
//! invalid member type formed while instantiating is a hard error, not a
//! substitution failure.

use mirror_types::{Idx, TypeData};

use crate::errors::{IllFormed, MetaError, MetaResult, Precondition};
use crate::stack::ensure_sufficient_stack;
use crate::tu::{
    Access, Completion, Decl, DeclId, DeclKind, FieldDecl, FieldPattern, Origin, PatternError,
    ProgramPoint, Specialization, TemplateBody,
};
use crate::Reflector;

impl Reflector {
    /// Instantiate `class` if it is an incomplete specialization whose
    /// template definition is reachable. Does nothing otherwise.
    pub(crate) fn ensure_complete(&mut self, class: DeclId) -> MetaResult<()> {
        let Some(decl) = self.unit.class_decl(class) else {
            return Ok(());
        };
        if decl.state != Completion::Incomplete {
            return Ok(());
        }
        let Some(spec) = decl.specialization.clone() else {
            return Ok(());
        };
        let Some(template) = self.unit.template(spec.template) else {
            return Ok(());
        };
        let Some(definition) = template.definition else {
            return Ok(());
        };
        if !definition.precedes(self.context().point()) {
            return Ok(());
        }
        let TemplateBody::Class { key, fields } = template.body.clone() else {
            return Ok(());
        };

        self.check_depth("instantiate")?;
        self.instantiation_depth += 1;
        let result = ensure_sufficient_stack(|| {
            self.instantiate_class(class, &spec, definition, key.default_access(), &fields)
        });
        self.instantiation_depth -= 1;
        result
    }

    #[tracing::instrument(level = "debug", skip_all, fields(class = class.raw()))]
    fn instantiate_class(
        &mut self,
        class: DeclId,
        spec: &Specialization,
        definition: ProgramPoint,
        access: Access,
        fields: &[FieldPattern],
    ) -> MetaResult<()> {
        let failed = |this: &Self, reason: &'static str| -> MetaError {
            IllFormed::InstantiationFailed {
                specialization: this.unit.qualified_name(class),
                reason,
            }
            .into()
        };

        let mut members = Vec::with_capacity(fields.len());
        for field in fields {
            let ty = match field.ty.realize(&mut self.unit.pool, &self.unit.values, &spec.args) {
                Ok(ty) => ty,
                Err(PatternError::InvalidType(reason)) => return Err(failed(self, reason)),
                Err(PatternError::BadArgument(_)) => {
                    return Err(failed(self, "template argument of the wrong kind"))
                }
            };
            if !self.unit.pool.is_object(ty) && !self.unit.pool.is_reference(ty) {
                return Err(failed(self, "data member of non-object type"));
            }
            if !self.is_complete_member_type(ty)? {
                return Err(failed(self, "data member of incomplete type"));
            }
            members.push(self.unit.push(Decl {
                name: field.name,
                kind: DeclKind::Field(FieldDecl {
                    bit_width: field.bit_width,
                    ..FieldDecl::new(ty)
                }),
                parent: Some(class),
                point: definition,
                access,
                span: mirror_ir::Span::DUMMY,
                origin: Origin::Instantiated(spec.template),
            }));
        }

        let name = self.unit.decl(class).name;
        let injected_name = self.unit.push(Decl {
            name,
            kind: DeclKind::InjectedClassName { class },
            parent: Some(class),
            point: definition,
            access: Access::Public,
            span: mirror_ir::Span::DUMMY,
            origin: Origin::Instantiated(spec.template),
        });
        if let Some(decl) = self.unit.class_mut(class) {
            decl.members.push(injected_name);
            decl.members.extend(members);
            decl.state = Completion::Complete {
                at: definition,
                injected: None,
            };
        }
        tracing::debug!(
            specialization = %self.unit.qualified_name(class),
            members = fields.len(),
            "instantiated"
        );
        Ok(())
    }

    /// Whether a member of type `ty` can be laid out, instantiating class
    /// types as needed.
    fn is_complete_member_type(&mut self, ty: Idx) -> MetaResult<bool> {
        let pool = &self.unit.pool;
        let unsized_type = matches!(
            pool.data(pool.unqualified(ty)),
            TypeData::Array { len: None, .. } | TypeData::Void | TypeData::Function { .. }
        );
        if unsized_type {
            return Ok(false);
        }
        self.is_complete_type_idx(ty)
    }

    /// Completeness of `ty` in the current context, instantiating if
    /// possible. References and non-class scalars are always complete.
    pub(crate) fn is_complete_type_idx(&mut self, ty: Idx) -> MetaResult<bool> {
        let pool = &self.unit.pool;
        if pool.is_reference(ty) {
            return Ok(true);
        }
        if pool.is_void(ty) || pool.is_function(ty) || pool.is_unbounded_array(ty) {
            return Ok(false);
        }
        let elem = pool.remove_all_extents(ty);
        if let Some(class) = self.unit.class_of_type(elem) {
            self.ensure_complete(class)?;
            return Ok(self.unit.is_complete_in(class, &self.context()));
        }
        if let Some(en) = self.unit.pool.enum_decl(elem) {
            return Ok(self.unit.is_complete_in(en.into(), &self.context()));
        }
        Ok(true)
    }

    /// Require `ty` to be complete, for `operation`.
    pub(crate) fn require_complete_type(
        &mut self,
        ty: Idx,
        operation: &'static str,
    ) -> MetaResult<()> {
        if self.is_complete_type_idx(ty)? {
            Ok(())
        } else {
            Err(MetaError::not_constant(
                operation,
                Precondition::IncompleteType(self.unit.format_type(ty)),
            ))
        }
    }

    /// The class a handle denotes, complete in the current context.
    pub(crate) fn complete_class(
        &mut self,
        handle: crate::Handle,
        operation: &'static str,
    ) -> MetaResult<DeclId> {
        let class = self.expect_class(handle, operation)?;
        let ty = self.unit.class_type(class);
        self.require_complete_type(ty, operation)?;
        Ok(class)
    }
}

#[cfg(test)]
mod tests;
