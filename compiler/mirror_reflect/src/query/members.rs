//! Member, base and enumerator listings.

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::reflector::wrong_kind;
use crate::tu::{DeclId, DeclKind};
use crate::Reflector;

impl Reflector {
    /// Members of a complete class, in declaration order, or of a
    /// namespace.
    ///
    /// Injected class names, partial specializations, friends, static
    /// assertions and functions with unsatisfied constraints are not
    /// listed. A specialization is instantiated first if its definition is
    /// reachable.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn members_of(&mut self, handle: Handle) -> MetaResult<Vec<Handle>> {
        const OP: &str = "members_of";
        self.tick(OP)?;
        let scope = match self.decode_non_null(handle, OP)? {
            Construct::Namespace(id) => id,
            Construct::NamespaceAlias(id) => self.namespace_target(id),
            Construct::Type(_) | Construct::TypeAlias(_) => self.complete_class(handle, OP)?,
            other => return Err(wrong_kind(OP, "class or namespace", other)),
        };
        let ctx = self.context();
        let members: &[DeclId] = match &self.unit.decl(scope).kind {
            DeclKind::Namespace(ns) => &ns.members,
            DeclKind::Class(class) => &class.members,
            _ => &[],
        };
        Ok(members
            .iter()
            .copied()
            .filter(|&id| self.unit.is_reachable(id, &ctx) && self.is_representable(id))
            .filter_map(|id| self.handle_for_decl(id))
            .collect())
    }

    /// Whether `members_of` lists this declaration.
    fn is_representable(&self, id: DeclId) -> bool {
        match &self.unit.decl(id).kind {
            DeclKind::Function(func) => func.constraints_satisfied,
            DeclKind::InjectedClassName { .. }
            | DeclKind::PartialSpecialization { .. }
            | DeclKind::Friend { .. }
            | DeclKind::StaticAssert
            | DeclKind::Base(_) => false,
            _ => true,
        }
    }

    /// Base-specifiers of a complete class, in declaration order.
    pub fn bases_of(&mut self, handle: Handle) -> MetaResult<Vec<Handle>> {
        const OP: &str = "bases_of";
        self.tick(OP)?;
        let class = self.complete_class(handle, OP)?;
        Ok(self
            .unit
            .class_decl(class)
            .map(|c| c.bases.iter().map(|&b| Handle::new(Construct::Base(b))).collect())
            .unwrap_or_default())
    }

    /// Static data members, in declaration order.
    pub fn static_data_members_of(&mut self, handle: Handle) -> MetaResult<Vec<Handle>> {
        const OP: &str = "static_data_members_of";
        self.class_members_where(handle, OP, |kind| {
            matches!(kind, DeclKind::Variable(var) if var.is_static_member)
        })
    }

    /// Named non-static data members, in declaration order.
    pub fn nonstatic_data_members_of(&mut self, handle: Handle) -> MetaResult<Vec<Handle>> {
        const OP: &str = "nonstatic_data_members_of";
        let members = self.class_members_where(handle, OP, |kind| matches!(kind, DeclKind::Field(_)))?;
        Ok(members
            .into_iter()
            .filter(|m| {
                m.construct()
                    .decl()
                    .is_some_and(|id| !self.unit.decl(id).name.is_empty())
            })
            .collect())
    }

    /// Bases followed by named non-static data members.
    pub fn subobjects_of(&mut self, handle: Handle) -> MetaResult<Vec<Handle>> {
        let mut out = self.bases_of(handle)?;
        out.extend(self.nonstatic_data_members_of(handle)?);
        Ok(out)
    }

    /// Enumerators of an enumeration whose enumerator list is closed.
    pub fn enumerators_of(&mut self, handle: Handle) -> MetaResult<Vec<Handle>> {
        const OP: &str = "enumerators_of";
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
        if !self.enumerable(en) {
            return Err(MetaError::not_constant(
                OP,
                Precondition::IncompleteType(self.unit.format_type(ty)),
            ));
        }
        Ok(self
            .unit
            .enum_decl(en)
            .map(|e| {
                e.enumerators
                    .iter()
                    .map(|&id| Handle::new(Construct::Enumerator(id)))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub(crate) fn enumerable(&self, en: DeclId) -> bool {
        let point = self.context().point();
        self.unit
            .enum_decl(en)
            .and_then(|e| e.enumerable)
            .is_some_and(|at| at.precedes(point))
    }

    fn class_members_where(
        &mut self,
        handle: Handle,
        operation: &'static str,
        pred: impl Fn(&DeclKind) -> bool,
    ) -> MetaResult<Vec<Handle>> {
        self.tick(operation)?;
        let class = self.complete_class(handle, operation)?;
        let ctx = self.context();
        let members = self.unit.class_decl(class).map(|c| c.members.as_slice()).unwrap_or_default();
        Ok(members
            .iter()
            .copied()
            .filter(|&id| self.unit.is_reachable(id, &ctx) && pred(&self.unit.decl(id).kind))
            .filter_map(|id| self.handle_for_decl(id))
            .collect())
    }

    /// Follow namespace aliases to the namespace.
    pub(crate) fn namespace_target(&self, mut id: DeclId) -> DeclId {
        while let DeclKind::NamespaceAlias { target } = self.unit.decl(id).kind {
            id = target;
        }
        id
    }
}
