//! Substitution: naming specializations without instantiating them.
//!
//! `substitute(template, args)` checks that `template<args...>` is a valid
//! template-id and returns the specialization it names. Failures in the
//! immediate context (arity, argument kinds, narrowing, unsatisfied
//! constraints, invalid alias targets) make `can_substitute` false;
//! failures while instantiating something a constraint needs are hard
//! errors. Equivalent argument lists always produce the identical handle.

use mirror_types::Idx;
use smallvec::SmallVec;

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::query::fits;
use crate::reflector::wrong_kind;
use crate::tu::{
    AliasDecl, ConceptPredicate, ConstValue, DeclId, DeclKind, FunctionDecl, ObjectOrigin,
    ParamKind, PatternError, Specialization, TemplateArg, TemplateBody, TemplateDecl,
    TemplateKind, TemplateParam, VariableDecl,
};
use crate::Reflector;

/// Why a template-id is invalid in the immediate context.
type SubstitutionFailure = &'static str;

type Args = SmallVec<[TemplateArg; 4]>;

impl Reflector {
    /// Whether `template<args...>` is a valid template-id.
    pub fn can_substitute(&mut self, template: Handle, args: &[Handle]) -> MetaResult<bool> {
        self.tick("can_substitute")?;
        Ok(self.try_substitute(template, args, "can_substitute")?.is_ok())
    }

    /// The specialization `template<args...>` names.
    ///
    /// Nothing is instantiated. Concepts yield a `bool` value.
    pub fn substitute(&mut self, template: Handle, args: &[Handle]) -> MetaResult<Handle> {
        const OP: &str = "substitute";
        self.tick(OP)?;
        match self.try_substitute(template, args, OP)? {
            Ok(handle) => Ok(handle),
            Err(reason) => {
                tracing::debug!(reason, "substitution failed");
                Err(MetaError::not_constant(
                    OP,
                    Precondition::SubstitutionFailed(self.describe(template)),
                ))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, args), fields(args = args.len()))]
    fn try_substitute(
        &mut self,
        template: Handle,
        args: &[Handle],
        operation: &'static str,
    ) -> MetaResult<Result<Handle, SubstitutionFailure>> {
        let id = match self.decode_non_null(template, operation)? {
            Construct::Template(id) => id,
            other => return Err(wrong_kind(operation, "template", other)),
        };
        let Some(decl) = self.unit.template(id).cloned() else {
            return Err(MetaError::Internal("template handle names no template".into()));
        };

        let mut given = Args::new();
        for &arg in args {
            match self.template_arg(arg, operation)? {
                Some(arg) => given.push(arg),
                None => return Ok(Err("argument is not a valid template argument")),
            }
        }
        let bound = match self.bind_params(&decl.params, &given) {
            Ok(bound) => bound,
            Err(reason) => return Ok(Err(reason)),
        };
        for constraint in &decl.constraints {
            let Some(&TemplateArg::Type(ty)) = bound.get(constraint.param) else {
                return Ok(Err("constrained parameter is not a type"));
            };
            if !self.satisfies(constraint.concept, ty)? {
                return Ok(Err("constraints not satisfied"));
            }
        }

        let spec = Specialization {
            template: id,
            args: bound.as_slice().into(),
        };
        if let Some(existing) = self.unit.specialization(&spec) {
            tracing::trace!("specialization memo hit");
            return Ok(Ok(self.specialization_handle(existing)));
        }
        self.form_specialization(id, &decl, spec)
    }

    /// Canonical template argument for a handle, or `None` if the handle
    /// cannot be one.
    fn template_arg(
        &mut self,
        handle: Handle,
        operation: &'static str,
    ) -> MetaResult<Option<TemplateArg>> {
        Ok(match self.decode_non_null(handle, operation)? {
            Construct::Type(_) | Construct::TypeAlias(_) => {
                Some(TemplateArg::Type(self.expect_type(handle, operation)?))
            }
            Construct::Value(id) => Some(TemplateArg::Value(id)),
            Construct::Template(id) => Some(TemplateArg::Template(id)),
            Construct::Enumerator(_) | Construct::Variable(_) => match self.value_of(handle) {
                Ok(value) => match value.construct() {
                    Construct::Value(id) => Some(TemplateArg::Value(id)),
                    _ => None,
                },
                Err(err) if err.is_not_constant() => None,
                Err(err) => return Err(err),
            },
            _ => None,
        })
    }

    /// Match arguments to parameters, filling defaults and converting
    /// values to the parameter types.
    fn bind_params(
        &mut self,
        params: &[TemplateParam],
        given: &[TemplateArg],
    ) -> Result<Args, SubstitutionFailure> {
        let mut bound = Args::new();
        let mut next = 0;
        for param in params {
            if param.is_pack {
                for &arg in &given[next.min(given.len())..] {
                    bound.push(self.convert_arg(param.kind, arg)?);
                }
                next = given.len();
                continue;
            }
            let arg = match given.get(next) {
                Some(&arg) => arg,
                None => param.default.ok_or("too few template arguments")?,
            };
            bound.push(self.convert_arg(param.kind, arg)?);
            next += 1;
        }
        if next < given.len() {
            return Err("too many template arguments");
        }
        Ok(bound)
    }

    fn convert_arg(
        &mut self,
        kind: ParamKind,
        arg: TemplateArg,
    ) -> Result<TemplateArg, SubstitutionFailure> {
        match (kind, arg) {
            (ParamKind::Type, TemplateArg::Type(_))
            | (ParamKind::Template, TemplateArg::Template(_)) => Ok(arg),
            (ParamKind::Value(param_ty), TemplateArg::Value(id)) => {
                let param_ty = self.unit.pool().unqualified(param_ty);
                let entry = *self.unit.values().get(id);
                if entry.ty == param_ty {
                    return Ok(arg);
                }
                let converted = self.convert_constant(param_ty, entry.ty, entry.value)?;
                Ok(TemplateArg::Value(self.unit.value(param_ty, converted)))
            }
            _ => Err("template argument of the wrong kind"),
        }
    }

    /// Converted constant expression rules: integral conversions that do
    /// not narrow, and nothing else across types.
    fn convert_constant(
        &self,
        to: Idx,
        from: Idx,
        value: ConstValue,
    ) -> Result<ConstValue, SubstitutionFailure> {
        let pool = self.unit.pool();
        if pool.is_enum(to) || pool.is_enum(from) {
            return Err("enumeration argument of another type");
        }
        let n = match value {
            ConstValue::Int(n) => n,
            ConstValue::Bool(b) if to != Idx::BOOL => i128::from(b),
            _ => return Err("argument type does not match the parameter"),
        };
        if to == Idx::BOOL {
            return Err("narrowing conversion to bool");
        }
        match pool.integer_shape(to) {
            Some((bits, signed)) if fits(n, bits, signed) => Ok(ConstValue::Int(n)),
            Some(_) => Err("narrowing conversion"),
            None => Err("argument type does not match the parameter"),
        }
    }

    /// Check a concept against a type. Instantiation failures propagate.
    pub(crate) fn satisfies(&mut self, concept: DeclId, ty: Idx) -> MetaResult<bool> {
        let predicate = match self.unit.template(concept).map(|t| &t.body) {
            Some(TemplateBody::Concept { predicate }) => *predicate,
            _ => return Ok(false),
        };
        if let Some(answer) = predicate.check_structural(self.unit.pool(), ty) {
            return Ok(answer);
        }
        match predicate {
            ConceptPredicate::Complete => self.is_complete_type_idx(ty),
            ConceptPredicate::TriviallyCopyable => {
                Ok(self.is_complete_type_idx(ty)? && self.trivially_copyable(ty))
            }
            _ => Ok(false),
        }
    }

    fn specialization_handle(&self, id: DeclId) -> Handle {
        self.handle_for_decl(id).unwrap_or(Handle::NULL)
    }

    /// Declare the specialization named by a valid template-id.
    fn form_specialization(
        &mut self,
        template: DeclId,
        decl: &TemplateDecl,
        spec: Specialization,
    ) -> MetaResult<Result<Handle, SubstitutionFailure>> {
        let realize = |this: &mut Self, pattern: &crate::tu::TypePattern| {
            pattern
                .realize(&mut this.unit.pool, &this.unit.values, &spec.args)
                .map_err(|err| match err {
                    PatternError::InvalidType(reason) => reason,
                    PatternError::BadArgument(_) => "template argument of the wrong kind",
                })
        };

        let id = match (&decl.kind, &decl.body) {
            (TemplateKind::Class, _) => {
                let id = self.unit.class_specialization(template, &spec.args);
                return Ok(Ok(self.specialization_handle(id)));
            }
            (TemplateKind::Concept, TemplateBody::Concept { .. }) => {
                let Some(&TemplateArg::Type(ty)) = spec.args.first() else {
                    return Ok(Err("concept argument is not a type"));
                };
                let satisfied = self.satisfies(template, ty)?;
                let value = self.unit.value(Idx::BOOL, ConstValue::Bool(satisfied));
                return Ok(Ok(Handle::new(Construct::Value(value))));
            }
            (TemplateKind::Alias, TemplateBody::Alias { target }) => {
                let target = match realize(self, target) {
                    Ok(ty) => ty,
                    Err(reason) => return Ok(Err(reason)),
                };
                self.unit.new_specialization(
                    template,
                    DeclKind::TypeAlias(AliasDecl {
                        target,
                        specialization: Some(spec.clone()),
                    }),
                )
            }
            (TemplateKind::Function, TemplateBody::Function { params, ret, role }) => {
                let mut param_tys = Vec::with_capacity(params.len());
                for param in params {
                    match realize(self, param) {
                        Ok(ty) => param_tys.push(ty),
                        Err(reason) => return Ok(Err(reason)),
                    }
                }
                let ret = match realize(self, ret) {
                    Ok(ty) => ty,
                    Err(reason) => return Ok(Err(reason)),
                };
                let ty = self.unit.pool_mut().function(&param_tys, ret, false);
                self.unit.new_specialization(
                    template,
                    DeclKind::Function(FunctionDecl {
                        specialization: Some(spec.clone()),
                        ..FunctionDecl::new(ty, *role)
                    }),
                )
            }
            (TemplateKind::Variable, TemplateBody::Variable { ty }) => {
                let ty = match realize(self, ty) {
                    Ok(ty) => ty,
                    Err(reason) => return Ok(Err(reason)),
                };
                let next = DeclId::from_len(self.unit.decl_count());
                let object = self.unit.objects.intern(ty, ObjectOrigin::Variable(next));
                let is_static_member = self
                    .unit
                    .decl(template)
                    .parent
                    .is_some_and(|p| matches!(self.unit.decl(p).kind, DeclKind::Class(_)));
                self.unit.new_specialization(
                    template,
                    DeclKind::Variable(VariableDecl {
                        ty,
                        object,
                        is_static_member,
                        value: None,
                        specialization: Some(spec.clone()),
                    }),
                )
            }
            _ => return Err(MetaError::Internal("template body does not match its kind".into())),
        };
        self.unit.record_specialization(spec, id);
        tracing::debug!(specialization = %self.unit.qualified_name(id), "specialization formed");
        Ok(Ok(self.specialization_handle(id)))
    }
}

#[cfg(test)]
mod tests;
