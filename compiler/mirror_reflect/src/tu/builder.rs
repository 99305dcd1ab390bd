//! Declaration builders.
//!
//! These stand in for the parser: each call declares one entity at the
//! next lexical point, in the order a program would declare them.

use mirror_ir::{Name, Span};
use mirror_types::Idx;
use smallvec::SmallVec;

use super::{
    Access, AliasDecl, BaseDecl, ClassDecl, ClassKey, Completion, ConceptPredicate, ConstValue,
    Constraint, Decl, DeclId, DeclKind, EnumDecl, FieldDecl, FieldPattern, FunctionDecl,
    FunctionRole, NamespaceDecl, ObjectOrigin, Origin, Specialization, TemplateArg, TemplateBody,
    TemplateDecl, TemplateKind, TemplateParam, TranslationUnit, TypePattern, ValueId,
    VariableDecl,
};

impl TranslationUnit {
    /// Declare `kind` in `parent` at the next lexical point.
    fn declare(&mut self, parent: DeclId, name: Name, kind: DeclKind) -> DeclId {
        let point = self.advance();
        let access = match &self.decl(parent).kind {
            DeclKind::Class(class) => class.key.default_access(),
            _ => Access::Public,
        };
        let id = self.push(Decl {
            name,
            kind,
            parent: Some(parent),
            point,
            access,
            span: Span::DUMMY,
            origin: Origin::Source,
        });
        self.attach_member(parent, id);
        id
    }

    /// Append `member` to the member list of a namespace or class.
    pub(crate) fn attach_member(&mut self, parent: DeclId, member: DeclId) {
        match &mut self.decl_mut(parent).kind {
            DeclKind::Namespace(ns) => ns.members.push(member),
            DeclKind::Class(class) => class.members.push(member),
            _ => {}
        }
    }

    /// Existing member of `parent` named `name` matching `pred`.
    fn find_redeclaration(
        &self,
        parent: DeclId,
        name: Name,
        pred: impl Fn(&DeclKind) -> bool,
    ) -> Option<DeclId> {
        let members = match &self.decl(parent).kind {
            DeclKind::Namespace(ns) => &ns.members,
            DeclKind::Class(class) => &class.members,
            _ => return None,
        };
        members.iter().copied().find(|&id| {
            let decl = self.decl(id);
            decl.name == name && pred(&decl.kind)
        })
    }

    pub fn set_access(&mut self, decl: DeclId, access: Access) {
        self.decl_mut(decl).access = access;
    }

    pub fn set_span(&mut self, decl: DeclId, span: Span) {
        self.decl_mut(decl).span = span;
    }

    // === Namespaces ===

    /// Declare or reopen a namespace.
    pub fn namespace(&mut self, parent: DeclId, name: &str) -> DeclId {
        let name = self.intern(name);
        if let Some(existing) =
            self.find_redeclaration(parent, name, |k| matches!(k, DeclKind::Namespace(_)))
        {
            return existing;
        }
        self.declare(parent, name, DeclKind::Namespace(NamespaceDecl::default()))
    }

    /// Declare `namespace name = target;`. Redeclaring the same alias in
    /// the same scope yields the original declaration.
    pub fn namespace_alias(&mut self, parent: DeclId, name: &str, target: DeclId) -> DeclId {
        let name = self.intern(name);
        if let Some(existing) = self.find_redeclaration(parent, name, |k| {
            matches!(k, DeclKind::NamespaceAlias { target: t } if *t == target)
        }) {
            return existing;
        }
        self.declare(parent, name, DeclKind::NamespaceAlias { target })
    }

    // === Classes ===

    /// Declare a class; a second declaration with the same name in the same
    /// scope redeclares the first.
    pub fn class(&mut self, parent: DeclId, name: &str, key: ClassKey) -> DeclId {
        let name = self.intern(name);
        if let Some(existing) =
            self.find_redeclaration(parent, name, |k| matches!(k, DeclKind::Class(_)))
        {
            return existing;
        }
        self.new_class(parent, name, key, None)
    }

    pub(crate) fn new_class(
        &mut self,
        parent: DeclId,
        name: Name,
        key: ClassKey,
        specialization: Option<Specialization>,
    ) -> DeclId {
        let next = DeclId::from_len(self.decl_count());
        let ty = self.pool.record(next.into());
        let class = ClassDecl {
            key,
            ty,
            bases: Vec::new(),
            members: Vec::new(),
            state: Completion::Incomplete,
            specialization,
            injected_from: None,
        };
        match class.specialization.as_ref().map(|spec| spec.template) {
            Some(template) => self.new_specialization(template, DeclKind::Class(class)),
            None => self.declare(parent, name, DeclKind::Class(class)),
        }
    }

    /// Push a specialization of `template`.
    ///
    /// Specializations live in their template's scope and share its point,
    /// but are not members of that scope.
    pub(crate) fn new_specialization(&mut self, template: DeclId, kind: DeclKind) -> DeclId {
        let decl = self.decl(template);
        let (name, parent, point) = (decl.name, decl.parent, decl.point);
        self.push(Decl {
            name,
            kind,
            parent,
            point,
            access: Access::Public,
            span: Span::DUMMY,
            origin: Origin::Instantiated(template),
        })
    }

    /// The class type declared by `class`.
    pub fn class_type(&self, class: DeclId) -> Idx {
        match &self.decl(class).kind {
            DeclKind::Class(decl) => decl.ty,
            DeclKind::Enum(decl) => decl.ty,
            _ => Idx::VOID,
        }
    }

    pub fn field(&mut self, class: DeclId, name: &str, ty: Idx) -> DeclId {
        self.field_with(class, name, FieldDecl::new(ty))
    }

    pub fn field_with(&mut self, class: DeclId, name: &str, field: FieldDecl) -> DeclId {
        let name = self.intern(name);
        self.declare(class, name, DeclKind::Field(field))
    }

    /// A bit-field; `None` declares an unnamed bit-field.
    pub fn bit_field(&mut self, class: DeclId, name: Option<&str>, ty: Idx, width: u64) -> DeclId {
        let field = FieldDecl {
            bit_width: Some(width),
            ..FieldDecl::new(ty)
        };
        self.field_with(class, name.unwrap_or(""), field)
    }

    pub fn base(&mut self, class: DeclId, ty: Idx, access: Access, is_virtual: bool) -> DeclId {
        let point = self.advance();
        let id = self.push(Decl {
            name: Name::EMPTY,
            kind: DeclKind::Base(BaseDecl { ty, is_virtual }),
            parent: Some(class),
            point,
            access,
            span: Span::DUMMY,
            origin: Origin::Source,
        });
        if let Some(decl) = self.class_mut(class) {
            decl.bases.push(id);
        }
        id
    }

    /// End a class definition.
    pub fn complete(&mut self, class: DeclId) {
        let name = self.decl(class).name;
        let class_point = self.decl(class).point;
        let injected_name = self.push(Decl {
            name,
            kind: DeclKind::InjectedClassName { class },
            parent: Some(class),
            point: class_point,
            access: Access::Public,
            span: Span::DUMMY,
            origin: Origin::Source,
        });
        let at = self.advance();
        if let Some(decl) = self.class_mut(class) {
            decl.members.insert(0, injected_name);
            decl.state = Completion::Complete { at, injected: None };
        }
    }

    /// Declare a member function.
    pub fn function(&mut self, parent: DeclId, name: &str, func: FunctionDecl) -> DeclId {
        let name = self.intern(name);
        self.declare(parent, name, DeclKind::Function(func))
    }

    /// Declare a free or static member function of type `ret(params...)`.
    pub fn simple_function(
        &mut self,
        parent: DeclId,
        name: &str,
        params: &[Idx],
        ret: Idx,
    ) -> DeclId {
        let ty = self.pool.function(params, ret, false);
        let role = match self.decl(parent).kind {
            DeclKind::Class(_) => FunctionRole::Static,
            _ => FunctionRole::Free,
        };
        self.function(parent, name, FunctionDecl::new(ty, role))
    }

    pub fn friend(&mut self, class: DeclId, target: Option<DeclId>) -> DeclId {
        self.declare(class, Name::EMPTY, DeclKind::Friend { target })
    }

    pub fn static_assertion(&mut self, parent: DeclId) -> DeclId {
        self.declare(parent, Name::EMPTY, DeclKind::StaticAssert)
    }

    // === Enumerations ===

    /// Declare an enumeration. With a fixed underlying type it is complete
    /// immediately; otherwise once [`complete_enum`](Self::complete_enum)
    /// runs.
    pub fn enumeration(
        &mut self,
        parent: DeclId,
        name: &str,
        underlying: Option<Idx>,
        scoped: bool,
    ) -> DeclId {
        let name = self.intern(name);
        let next = DeclId::from_len(self.decl_count());
        let ty = self.pool.enumeration(next.into());
        let fixed = underlying.is_some() || scoped;
        let id = self.declare(
            parent,
            name,
            DeclKind::Enum(EnumDecl {
                ty,
                underlying: underlying.unwrap_or(Idx::INT),
                fixed_underlying: fixed,
                scoped,
                enumerators: Vec::new(),
                state: Completion::Incomplete,
                enumerable: None,
            }),
        );
        if fixed {
            let at = self.advance();
            if let DeclKind::Enum(en) = &mut self.decl_mut(id).kind {
                en.state = Completion::Complete { at, injected: None };
            }
        }
        id
    }

    pub fn enumerator(&mut self, enumeration: DeclId, name: &str, value: i128) -> DeclId {
        let name = self.intern(name);
        let point = self.advance();
        let id = self.push(Decl {
            name,
            kind: DeclKind::Enumerator { enumeration, value },
            parent: Some(enumeration),
            point,
            access: Access::Public,
            span: Span::DUMMY,
            origin: Origin::Source,
        });
        if let DeclKind::Enum(en) = &mut self.decl_mut(enumeration).kind {
            en.enumerators.push(id);
        }
        id
    }

    /// End an enumeration definition, deducing the underlying type if it
    /// was not fixed.
    pub fn complete_enum(&mut self, enumeration: DeclId) {
        let values: SmallVec<[i128; 8]> = match &self.decl(enumeration).kind {
            DeclKind::Enum(en) => en
                .enumerators
                .iter()
                .filter_map(|&e| match self.decl(e).kind {
                    DeclKind::Enumerator { value, .. } => Some(value),
                    _ => None,
                })
                .collect(),
            _ => return,
        };
        let at = self.advance();
        if let DeclKind::Enum(en) = &mut self.decl_mut(enumeration).kind {
            if !en.fixed_underlying {
                let fits = |lo: i128, hi: i128| values.iter().all(|v| (lo..=hi).contains(v));
                en.underlying = if fits(i128::from(i32::MIN), i128::from(i32::MAX)) {
                    Idx::INT
                } else if fits(0, i128::from(u32::MAX)) {
                    Idx::UINT
                } else if fits(i128::from(i64::MIN), i128::from(i64::MAX)) {
                    Idx::LONG
                } else {
                    Idx::ULONG
                };
            }
            if en.state == Completion::Incomplete {
                en.state = Completion::Complete { at, injected: None };
            }
            en.enumerable = Some(at);
        }
    }

    // === Aliases and Variables ===

    /// Declare `using name = target;`. Redeclaring the same alias in the
    /// same scope yields the original declaration.
    pub fn alias(&mut self, parent: DeclId, name: &str, target: Idx) -> DeclId {
        let name = self.intern(name);
        if let Some(existing) = self.find_redeclaration(parent, name, |k| {
            matches!(k, DeclKind::TypeAlias(alias) if alias.target == target && alias.specialization.is_none())
        }) {
            return existing;
        }
        self.declare(
            parent,
            name,
            DeclKind::TypeAlias(AliasDecl {
                target,
                specialization: None,
            }),
        )
    }

    /// Declare a variable, with a constant initializer if `value` is given.
    pub fn variable(
        &mut self,
        parent: DeclId,
        name: &str,
        ty: Idx,
        value: Option<ConstValue>,
    ) -> DeclId {
        let is_static_member = matches!(self.decl(parent).kind, DeclKind::Class(_));
        let name = self.intern(name);
        let next = DeclId::from_len(self.decl_count());
        let object = self.objects.intern(ty, ObjectOrigin::Variable(next));
        let value_ty = self.pool.unqualified(ty);
        let value = value.map(|v| self.values.intern(value_ty, v));
        self.declare(
            parent,
            name,
            DeclKind::Variable(VariableDecl {
                ty,
                object,
                is_static_member,
                value,
                specialization: None,
            }),
        )
    }

    /// Intern a constant of type `ty`, as written in a template argument.
    pub fn value(&mut self, ty: Idx, value: ConstValue) -> ValueId {
        let ty = self.pool.unqualified(ty);
        self.values.intern(ty, value)
    }

    pub fn structured_binding(&mut self, parent: DeclId, name: &str, ty: Idx) -> DeclId {
        let name = self.intern(name);
        let next = DeclId::from_len(self.decl_count());
        let object = self.objects.intern(ty, ObjectOrigin::Variable(next));
        self.declare(parent, name, DeclKind::StructuredBinding { ty, object })
    }

    // === Templates ===

    fn declare_template(
        &mut self,
        parent: DeclId,
        name: &str,
        kind: TemplateKind,
        params: Vec<TemplateParam>,
        body: TemplateBody,
        defined: bool,
    ) -> DeclId {
        let name = self.intern(name);
        let id = self.declare(
            parent,
            name,
            DeclKind::Template(TemplateDecl {
                kind,
                params,
                constraints: SmallVec::new(),
                body,
                definition: None,
                specializations: Vec::new(),
            }),
        );
        if defined {
            let point = self.decl(id).point;
            if let DeclKind::Template(t) = &mut self.decl_mut(id).kind {
                t.definition = Some(point);
            }
        }
        id
    }

    /// Declare and define a class template.
    pub fn class_template(
        &mut self,
        parent: DeclId,
        name: &str,
        params: Vec<TemplateParam>,
        key: ClassKey,
        fields: Vec<FieldPattern>,
    ) -> DeclId {
        let body = TemplateBody::Class { key, fields };
        self.declare_template(parent, name, TemplateKind::Class, params, body, true)
    }

    /// Declare a class template whose definition comes later.
    pub fn declare_class_template(
        &mut self,
        parent: DeclId,
        name: &str,
        params: Vec<TemplateParam>,
        key: ClassKey,
    ) -> DeclId {
        let body = TemplateBody::Class {
            key,
            fields: Vec::new(),
        };
        self.declare_template(parent, name, TemplateKind::Class, params, body, false)
    }

    /// Define a previously declared class template at the next point.
    pub fn define_class_template(&mut self, template: DeclId, body_fields: Vec<FieldPattern>) {
        let point = self.advance();
        if let DeclKind::Template(t) = &mut self.decl_mut(template).kind {
            if let TemplateBody::Class { fields, .. } = &mut t.body {
                *fields = body_fields;
            }
            t.definition = Some(point);
        }
    }

    pub fn alias_template(
        &mut self,
        parent: DeclId,
        name: &str,
        params: Vec<TemplateParam>,
        target: TypePattern,
    ) -> DeclId {
        let body = TemplateBody::Alias { target };
        self.declare_template(parent, name, TemplateKind::Alias, params, body, true)
    }

    pub fn function_template(
        &mut self,
        parent: DeclId,
        name: &str,
        params: Vec<TemplateParam>,
        fn_params: Vec<TypePattern>,
        ret: TypePattern,
    ) -> DeclId {
        let role = match self.decl(parent).kind {
            DeclKind::Class(_) => FunctionRole::ImplicitObject,
            _ => FunctionRole::Free,
        };
        let body = TemplateBody::Function {
            params: fn_params,
            ret,
            role,
        };
        self.declare_template(parent, name, TemplateKind::Function, params, body, true)
    }

    pub fn variable_template(
        &mut self,
        parent: DeclId,
        name: &str,
        params: Vec<TemplateParam>,
        ty: TypePattern,
    ) -> DeclId {
        let body = TemplateBody::Variable { ty };
        self.declare_template(parent, name, TemplateKind::Variable, params, body, true)
    }

    /// A concept over one type parameter.
    pub fn concept(&mut self, parent: DeclId, name: &str, predicate: ConceptPredicate) -> DeclId {
        let param = TemplateParam::ty(self.intern("T"));
        let body = TemplateBody::Concept { predicate };
        self.declare_template(parent, name, TemplateKind::Concept, vec![param], body, true)
    }

    /// Require the argument at `param` of `template` to satisfy `concept`.
    pub fn constrain(&mut self, template: DeclId, param: usize, concept: DeclId) {
        if let DeclKind::Template(t) = &mut self.decl_mut(template).kind {
            t.constraints.push(Constraint { param, concept });
        }
    }

    /// The class named by the template-id `template<args...>`, declared on
    /// first use. Arguments must already be canonical.
    ///
    /// The specialization is incomplete until something instantiates it.
    pub fn class_specialization(&mut self, template: DeclId, args: &[TemplateArg]) -> DeclId {
        let spec = Specialization {
            template,
            args: args.into(),
        };
        if let Some(existing) = self.specialization(&spec) {
            return existing;
        }
        let key = match self.template(template).map(|t| &t.body) {
            Some(TemplateBody::Class { key, .. }) => *key,
            _ => ClassKey::Struct,
        };
        let decl = self.decl(template);
        let (name, parent) = (decl.name, decl.parent.unwrap_or(DeclId::GLOBAL));
        let id = self.new_class(parent, name, key, Some(spec.clone()));
        self.record_specialization(spec, id);
        id
    }

    pub fn partial_specialization(&mut self, template: DeclId) -> DeclId {
        let parent = self.decl(template).parent.unwrap_or(DeclId::GLOBAL);
        self.declare(parent, Name::EMPTY, DeclKind::PartialSpecialization { template })
    }
}
