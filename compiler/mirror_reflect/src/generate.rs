//! Generative declarations: `define_aggregate`.
//!
//! The only operation that extends the translation unit from inside an
//! evaluation. It runs solely in plainly constant-evaluated expressions,
//! which execute once and in lexical order, so every injected declaration
//! has a single well-defined locus. The new definition is reachable from
//! everything lexically after the producing expression and, through the
//! injected point, from the rest of the producing evaluation.

use mirror_ir::Name;
use mirror_types::Idx;
use rustc_hash::FxHashSet;

use crate::errors::{IllFormed, MetaError, MetaResult, Precondition};
use crate::eval::{EvalSite, InjectedDecl};
use crate::handle::{Construct, Handle};
use crate::query::may_repeat;
use crate::reflector::wrong_kind;
use crate::tu::{
    Access, Completion, DataMemberSpec, Decl, DeclId, DeclKind, DescId, FieldDecl, FunctionDecl,
    FunctionRole, InjectedPoint, Origin, SpecialMember,
};
use crate::Reflector;

impl Reflector {
    /// Complete the incomplete class `target` with one public data member
    /// per description, in order.
    ///
    /// Repeating the call with the same descriptions returns the same
    /// handle and declares nothing.
    #[tracing::instrument(level = "debug", skip_all, fields(members = members.len()))]
    pub fn define_aggregate(&mut self, target: Handle, members: &[Handle]) -> MetaResult<Handle> {
        const OP: &str = "define_aggregate";
        self.tick(OP)?;
        let site = self.begin_injection()?.site;

        let class = match self.decode_non_null(target, OP)? {
            Construct::Type(_) | Construct::TypeAlias(_) => {
                let ty = self.expect_type(target, OP)?;
                self.unit.class_of_type(ty)
            }
            _ => None,
        }
        .ok_or_else(|| MetaError::not_constant(OP, Precondition::NotAClassTarget))?;
        let handle = self.reflect_type(self.unit.class_type(class));

        let mut descs = Vec::with_capacity(members.len());
        for &member in members {
            match self.decode_non_null(member, OP)? {
                Construct::MemberDescription(id) => descs.push(id),
                other => return Err(wrong_kind(OP, "data member description", other)),
            }
        }

        self.ensure_complete(class)?;
        if let Some(previous) = self.previous_definition(class)? {
            if *previous == *descs {
                tracing::debug!(class = %self.unit.qualified_name(class), "definition repeated");
                return Ok(handle);
            }
            return Err(IllFormed::RedefinitionConflict {
                target: self.unit.qualified_name(class),
            }
            .into());
        }

        let specs = self.check_descriptions(&descs, OP)?;

        let locus = site.point;
        let point = self.injections.record(InjectedDecl {
            target: class,
            locus,
            site: site.point,
        });
        self.inject_members(class, &specs, site, point);
        if let Some(decl) = self.unit.class_mut(class) {
            decl.state = Completion::Complete {
                at: locus,
                injected: Some(point),
            };
            decl.injected_from = Some(descs.into_boxed_slice());
        }
        self.publish_injection(point)?;
        tracing::debug!(
            class = %self.unit.qualified_name(class),
            injected = point.raw(),
            "aggregate defined"
        );
        Ok(handle)
    }

    /// Descriptions of an earlier generative definition of `class`.
    ///
    /// Fails when `class` cannot receive a generative definition at all.
    fn previous_definition(&self, class: DeclId) -> MetaResult<Option<&[DescId]>> {
        let not_definable = |reason| -> MetaError {
            IllFormed::TargetNotDefinable {
                target: self.unit.qualified_name(class),
                reason,
            }
            .into()
        };
        let Some(decl) = self.unit.class_decl(class) else {
            return Err(MetaError::Internal("class target is not a class".into()));
        };
        match (decl.state, decl.injected_from.as_deref()) {
            (Completion::Complete { injected: Some(_), .. }, Some(previous)) => Ok(Some(previous)),
            (Completion::Complete { .. }, _) => Err(not_definable("it is already defined")),
            (Completion::Incomplete, _) => {
                let template_defined = decl
                    .specialization
                    .as_ref()
                    .and_then(|spec| self.unit.template(spec.template))
                    .and_then(|template| template.definition)
                    .is_some_and(|def| def.precedes(self.context().point()));
                if template_defined {
                    Err(not_definable("its template has a reachable definition"))
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn check_descriptions(
        &mut self,
        descs: &[DescId],
        operation: &'static str,
    ) -> MetaResult<Vec<DataMemberSpec>> {
        let mut seen = FxHashSet::default();
        let mut specs = Vec::with_capacity(descs.len());
        for &id in descs {
            let spec = *self.unit.descs().get(id);
            self.require_complete_type(spec.ty, operation)?;
            if let Some(name) = spec.name {
                if !may_repeat(Some(name)) && !seen.insert(name) {
                    return Err(MetaError::not_constant(
                        operation,
                        Precondition::DuplicateMemberName(
                            self.unit.interner().lookup(name).to_owned(),
                        ),
                    ));
                }
            }
            specs.push(spec);
        }
        Ok(specs)
    }

    fn inject_members(
        &mut self,
        class: DeclId,
        specs: &[DataMemberSpec],
        site: EvalSite,
        point: InjectedPoint,
    ) {
        let name = self.unit.decl(class).name;
        let mut members = Vec::with_capacity(specs.len() + 3);
        members.push(self.push_injected(class, point, site, name, DeclKind::InjectedClassName {
            class,
        }));
        for spec in specs {
            let field = FieldDecl {
                ty: spec.ty,
                bit_width: spec.bit_width,
                align: spec.align,
                no_unique_address: spec.no_unique_address,
                has_default_init: false,
            };
            members.push(self.push_injected(
                class,
                point,
                site,
                spec.name.unwrap_or(Name::EMPTY),
                DeclKind::Field(field),
            ));
        }

        let is_union = self.unit.class_decl(class).is_some_and(|c| c.is_union());
        let needs_special = is_union
            && specs.iter().any(|spec| {
                !self.trivially_default_constructible(spec.ty)
                    || !self.trivially_destructible(spec.ty)
            });
        if needs_special {
            let ty = self.unit.pool_mut().function(&[], Idx::VOID, false);
            let ctor = FunctionDecl {
                special: Some(SpecialMember::DefaultConstructor),
                ..FunctionDecl::new(ty, FunctionRole::Constructor)
            };
            members.push(self.push_injected(class, point, site, name, DeclKind::Function(ctor)));
            let dtor_name = self.unit.intern(&format!("~{}", self.unit.name(class)));
            let dtor = FunctionDecl::new(ty, FunctionRole::Destructor);
            members.push(self.push_injected(
                class,
                point,
                site,
                dtor_name,
                DeclKind::Function(dtor),
            ));
            tracing::trace!("synthesized union special members");
        }

        if let Some(decl) = self.unit.class_mut(class) {
            decl.members.extend(members);
        }
    }

    fn push_injected(
        &mut self,
        class: DeclId,
        point: InjectedPoint,
        site: EvalSite,
        name: Name,
        kind: DeclKind,
    ) -> DeclId {
        self.unit.push(Decl {
            name,
            kind,
            parent: Some(class),
            point: site.point,
            access: Access::Public,
            span: site.span.after(),
            origin: Origin::Injected(point),
        })
    }
}
