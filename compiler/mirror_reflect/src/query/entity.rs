//! Entity navigation and declaration predicates.

use mirror_types::Idx;

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::reflector::wrong_kind;
use crate::tu::{
    Access, ConstValue, DeclId, DeclKind, FunctionRole, ObjectOrigin, SpecialMember, TemplateArg,
    TemplateKind,
};
use crate::Reflector;

impl Reflector {
    // === Navigation ===

    /// Type of a typed entity, value, object, member or description.
    pub fn type_of(&mut self, handle: Handle) -> MetaResult<Handle> {
        const OP: &str = "type_of";
        self.tick(OP)?;
        let ty = match self.decode_non_null(handle, OP)? {
            Construct::Value(id) => self.unit.values().get(id).ty,
            Construct::Object(id) => self.unit.objects().get(id).ty,
            Construct::MemberDescription(id) => self.unit.descs().get(id).ty,
            construct => {
                let id = construct.decl().ok_or_else(|| self.no_type(handle, OP))?;
                match &self.unit.decl(id).kind {
                    DeclKind::Variable(var) => var.ty,
                    DeclKind::StructuredBinding { ty, .. } => *ty,
                    DeclKind::Function(func) => func.ty,
                    DeclKind::Field(field) => field.ty,
                    DeclKind::Base(base) => base.ty,
                    DeclKind::Enumerator { enumeration, .. } => {
                        self.unit.class_type(*enumeration)
                    }
                    _ => return Err(self.no_type(handle, OP)),
                }
            }
        };
        Ok(self.reflect_type(ty))
    }

    fn no_type(&self, handle: Handle, operation: &'static str) -> MetaError {
        MetaError::not_constant(operation, Precondition::NoType(self.describe(handle)))
    }

    /// The enclosing namespace or class. A base-specifier's parent is the
    /// derived class.
    pub fn parent_of(&mut self, handle: Handle) -> MetaResult<Handle> {
        const OP: &str = "parent_of";
        self.tick(OP)?;
        let construct = self.decode_non_null(handle, OP)?;
        let parent = self
            .declaration_of(construct)
            .and_then(|id| self.unit.decl(id).parent)
            .and_then(|parent| self.handle_for_decl(parent));
        parent.ok_or_else(|| {
            MetaError::not_constant(OP, Precondition::NoParent(self.describe(handle)))
        })
    }

    /// Strip typedef-names and namespace aliases. Idempotent; other
    /// handles are returned unchanged.
    pub fn dealias(&mut self, handle: Handle) -> MetaResult<Handle> {
        self.tick("dealias")?;
        Ok(match self.decode(handle, "dealias")? {
            Construct::TypeAlias(_) => self.reflect_type(self.expect_type(handle, "dealias")?),
            Construct::NamespaceAlias(id) => {
                Handle::new(Construct::Namespace(self.namespace_target(id)))
            }
            _ => handle,
        })
    }

    /// The template a specialization was formed from.
    pub fn template_of(&mut self, handle: Handle) -> MetaResult<Handle> {
        const OP: &str = "template_of";
        self.tick(OP)?;
        let template = self.specialization_parts(handle, OP)?.0;
        Ok(Handle::new(Construct::Template(template)))
    }

    /// Arguments of a specialization, in order.
    pub fn template_arguments_of(&mut self, handle: Handle) -> MetaResult<Vec<Handle>> {
        const OP: &str = "template_arguments_of";
        self.tick(OP)?;
        let args = self.specialization_parts(handle, OP)?.1;
        Ok(args.into_iter().map(template_arg_handle).collect())
    }

    pub fn has_template_arguments(&mut self, handle: Handle) -> MetaResult<bool> {
        self.tick("has_template_arguments")?;
        let construct = self.decode(handle, "has_template_arguments")?;
        Ok(self
            .declaration_of(construct)
            .is_some_and(|id| self.unit.specialization_of(id).is_some()))
    }

    fn specialization_parts(
        &self,
        handle: Handle,
        operation: &'static str,
    ) -> MetaResult<(DeclId, Vec<TemplateArg>)> {
        let construct = self.decode_non_null(handle, operation)?;
        self.declaration_of(construct)
            .and_then(|id| self.unit.specialization_of(id))
            .map(|spec| (spec.template, spec.args.to_vec()))
            .ok_or_else(|| {
                MetaError::not_constant(
                    operation,
                    Precondition::NoTemplateArguments(self.describe(handle)),
                )
            })
    }

    /// The object a variable or structured binding names.
    pub fn object_of(&mut self, handle: Handle) -> MetaResult<Handle> {
        const OP: &str = "object_of";
        self.tick(OP)?;
        match self.decode_non_null(handle, OP)? {
            Construct::Object(_) => Ok(handle),
            Construct::Variable(id) | Construct::StructuredBinding(id) => {
                match &self.unit.decl(id).kind {
                    DeclKind::Variable(var) if !self.unit.pool().is_reference(var.ty) => {
                        Ok(Handle::new(Construct::Object(var.object)))
                    }
                    DeclKind::StructuredBinding { object, .. } => {
                        Ok(Handle::new(Construct::Object(*object)))
                    }
                    _ => Err(MetaError::not_constant(
                        OP,
                        Precondition::NoValue(self.describe(handle)),
                    )),
                }
            }
            other => Err(wrong_kind(OP, "variable or object", other)),
        }
    }

    /// The constant value of a value, enumerator, or variable usable in
    /// constant expressions.
    pub fn value_of(&mut self, handle: Handle) -> MetaResult<Handle> {
        const OP: &str = "value_of";
        self.tick(OP)?;
        let value = match self.decode_non_null(handle, OP)? {
            Construct::Value(_) => return Ok(handle),
            Construct::Enumerator(id) => match self.unit.decl(id).kind {
                DeclKind::Enumerator { enumeration, value } => {
                    let ty = self.unit.class_type(enumeration);
                    Some(self.unit.value(ty, ConstValue::Int(value)))
                }
                _ => None,
            },
            Construct::Variable(id) => self.variable_value(id),
            Construct::Object(id) => match self.unit.objects().get(id).origin {
                ObjectOrigin::Variable(var) => self.variable_value(var),
                ObjectOrigin::Subobject { .. } => None,
            },
            other => return Err(wrong_kind(OP, "value, enumerator or variable", other)),
        };
        value
            .map(|id| Handle::new(Construct::Value(id)))
            .ok_or_else(|| MetaError::not_constant(OP, Precondition::NoValue(self.describe(handle))))
    }

    fn variable_value(&self, id: DeclId) -> Option<crate::tu::ValueId> {
        match &self.unit.decl(id).kind {
            DeclKind::Variable(var) => var.value,
            _ => None,
        }
    }

    /// Underlying type of a complete enumeration.
    pub fn underlying_type(&mut self, handle: Handle) -> MetaResult<Handle> {
        const OP: &str = "underlying_type";
        self.tick(OP)?;
        let ty = self.expect_type(handle, OP)?;
        let Some(en) = self.unit.pool().enum_decl(ty).map(DeclId::from) else {
            return Err(MetaError::not_constant(
                OP,
                Precondition::WrongKind {
                    expected: "enumeration type",
                    found: "non-enumeration type",
                },
            ));
        };
        self.require_complete_type(ty, OP)?;
        let underlying = self.unit.enum_decl(en).map_or(Idx::INT, |e| e.underlying);
        Ok(self.reflect_type(underlying))
    }

    // === Declaration Predicates ===

    fn access_is(&mut self, handle: Handle, access: Access, operation: &'static str) -> MetaResult<bool> {
        self.tick(operation)?;
        let construct = self.decode(handle, operation)?;
        Ok(self.declaration_of(construct).is_some_and(|id| {
            let decl = self.unit.decl(id);
            decl.access == access
                && decl
                    .parent
                    .is_some_and(|p| matches!(self.unit.decl(p).kind, DeclKind::Class(_)))
        }))
    }

    pub fn is_public(&mut self, handle: Handle) -> MetaResult<bool> {
        self.access_is(handle, Access::Public, "is_public")
    }

    pub fn is_protected(&mut self, handle: Handle) -> MetaResult<bool> {
        self.access_is(handle, Access::Protected, "is_protected")
    }

    pub fn is_private(&mut self, handle: Handle) -> MetaResult<bool> {
        self.access_is(handle, Access::Private, "is_private")
    }

    /// Test the declaration kind behind a handle.
    fn decl_is(
        &mut self,
        handle: Handle,
        operation: &'static str,
        pred: impl FnOnce(&DeclKind) -> bool,
    ) -> MetaResult<bool> {
        self.tick(operation)?;
        let construct = self.decode(handle, operation)?;
        Ok(construct
            .decl()
            .is_some_and(|id| pred(&self.unit.decl(id).kind)))
    }

    /// A virtual member function or a virtual base.
    pub fn is_virtual(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_virtual", |kind| match kind {
            DeclKind::Function(f) => f.is_virtual,
            DeclKind::Base(b) => b.is_virtual,
            _ => false,
        })
    }

    pub fn is_pure_virtual(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_pure_virtual", |kind| {
            matches!(kind, DeclKind::Function(f) if f.is_pure)
        })
    }

    pub fn is_deleted(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_deleted", |kind| {
            matches!(kind, DeclKind::Function(f) if f.is_deleted)
        })
    }

    pub fn is_defaulted(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_defaulted", |kind| {
            matches!(kind, DeclKind::Function(f) if f.is_defaulted)
        })
    }

    pub fn is_user_provided(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_user_provided", |kind| {
            matches!(kind, DeclKind::Function(f) if f.user_provided && !f.is_defaulted)
        })
    }

    /// Static data members and static member functions.
    pub fn is_static_member(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_static_member", |kind| match kind {
            DeclKind::Variable(var) => var.is_static_member,
            DeclKind::Function(f) => f.role == FunctionRole::Static,
            _ => false,
        })
    }

    /// Bit-field members and bit-field descriptions.
    pub fn is_bit_field(&mut self, handle: Handle) -> MetaResult<bool> {
        if let Construct::MemberDescription(id) = self.decode(handle, "is_bit_field")? {
            self.tick("is_bit_field")?;
            return Ok(self.unit.descs().get(id).bit_width.is_some());
        }
        self.decl_is(handle, "is_bit_field", |kind| {
            matches!(kind, DeclKind::Field(f) if f.is_bit_field())
        })
    }

    pub fn is_constructor(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_constructor", |kind| {
            matches!(kind, DeclKind::Function(f) if f.role == FunctionRole::Constructor)
        })
    }

    pub fn is_destructor(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_destructor", |kind| {
            matches!(kind, DeclKind::Function(f) if f.role == FunctionRole::Destructor)
        })
    }

    pub fn is_special_member_function(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_special_member_function", |kind| {
            matches!(kind, DeclKind::Function(f) if f.special.is_some())
        })
    }

    pub fn is_default_constructor(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "is_default_constructor", |kind| {
            matches!(kind, DeclKind::Function(f) if f.special == Some(SpecialMember::DefaultConstructor))
        })
    }

    /// Member functions with an explicit object parameter.
    pub fn has_explicit_object_parameter(&mut self, handle: Handle) -> MetaResult<bool> {
        self.decl_is(handle, "has_explicit_object_parameter", |kind| {
            matches!(kind, DeclKind::Function(f) if f.role == FunctionRole::ExplicitObject)
        })
    }

    /// Whether a type is complete from the current context, instantiating
    /// a specialization whose definition is reachable.
    pub fn is_complete_type(&mut self, handle: Handle) -> MetaResult<bool> {
        const OP: &str = "is_complete_type";
        self.tick(OP)?;
        let ty = self.expect_type(handle, OP)?;
        self.is_complete_type_idx(ty)
    }

    /// A complete class, or an enumeration whose enumerator list is closed.
    pub fn is_enumerable_type(&mut self, handle: Handle) -> MetaResult<bool> {
        const OP: &str = "is_enumerable_type";
        self.tick(OP)?;
        let ty = self.expect_type(handle, OP)?;
        if let Some(en) = self.unit.pool().enum_decl(ty) {
            return Ok(self.enumerable(en.into()));
        }
        if self.unit.class_of_type(ty).is_some() {
            return self.is_complete_type_idx(ty);
        }
        Ok(false)
    }

    fn template_kind_is(
        &mut self,
        handle: Handle,
        kind: TemplateKind,
        operation: &'static str,
    ) -> MetaResult<bool> {
        self.decl_is(handle, operation, |decl| {
            matches!(decl, DeclKind::Template(t) if t.kind == kind)
        })
    }

    pub fn is_class_template(&mut self, handle: Handle) -> MetaResult<bool> {
        self.template_kind_is(handle, TemplateKind::Class, "is_class_template")
    }

    pub fn is_alias_template(&mut self, handle: Handle) -> MetaResult<bool> {
        self.template_kind_is(handle, TemplateKind::Alias, "is_alias_template")
    }

    pub fn is_function_template(&mut self, handle: Handle) -> MetaResult<bool> {
        self.template_kind_is(handle, TemplateKind::Function, "is_function_template")
    }

    pub fn is_variable_template(&mut self, handle: Handle) -> MetaResult<bool> {
        self.template_kind_is(handle, TemplateKind::Variable, "is_variable_template")
    }

    pub fn is_concept(&mut self, handle: Handle) -> MetaResult<bool> {
        self.template_kind_is(handle, TemplateKind::Concept, "is_concept")
    }
}

/// Handle for a canonical template argument.
pub(crate) fn template_arg_handle(arg: TemplateArg) -> Handle {
    Handle::new(match arg {
        TemplateArg::Type(ty) => Construct::Type(ty),
        TemplateArg::Value(id) => Construct::Value(id),
        TemplateArg::Template(id) => Construct::Template(id),
    })
}
