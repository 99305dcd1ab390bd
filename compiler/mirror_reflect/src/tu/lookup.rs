//! Name lookup over reachable declarations.

use mirror_types::Idx;
use smallvec::SmallVec;

use super::{DeclId, DeclKind, TemplateKind, TranslationUnit};
use crate::eval::EvaluationContext;

/// What lookup of a name found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// A single non-function entity.
    Entity(DeclId),
    /// A fundamental type named by keyword.
    Type(Idx),
    /// Functions and function templates sharing the name.
    OverloadSet(SmallVec<[DeclId; 4]>),
    NotFound(String),
}

impl TranslationUnit {
    /// Qualified lookup of `name` in `scope` only.
    pub fn lookup_in(&self, scope: DeclId, name: &str, ctx: &EvaluationContext) -> Lookup {
        let Some(name_id) = self.interner().get(name) else {
            return self.keyword_type(name);
        };
        let mut functions: SmallVec<[DeclId; 4]> = SmallVec::new();
        let mut entity = None;
        for id in self.scope_candidates(scope) {
            let decl = self.decl(id);
            if decl.name != name_id || !self.is_reachable(id, ctx) {
                continue;
            }
            match &decl.kind {
                DeclKind::Function(_) => functions.push(id),
                DeclKind::Template(t) if t.kind == TemplateKind::Function => functions.push(id),
                DeclKind::InjectedClassName { class } => {
                    entity.get_or_insert(*class);
                }
                DeclKind::Friend { .. }
                | DeclKind::StaticAssert
                | DeclKind::Base(_)
                | DeclKind::PartialSpecialization { .. } => {}
                _ => {
                    entity.get_or_insert(id);
                }
            }
        }
        match entity {
            // A class name is hidden by a function of the same name.
            Some(_) if !functions.is_empty() => Lookup::OverloadSet(functions),
            Some(id) => Lookup::Entity(id),
            None if !functions.is_empty() => Lookup::OverloadSet(functions),
            None => self.keyword_type(name),
        }
    }

    /// Unqualified lookup: `scope`, then each enclosing scope.
    pub fn lookup(&self, scope: DeclId, name: &str, ctx: &EvaluationContext) -> Lookup {
        let mut current = Some(scope);
        while let Some(scope) = current {
            match self.lookup_in(scope, name, ctx) {
                Lookup::NotFound(_) => current = self.decl(scope).parent,
                found => return found,
            }
        }
        Lookup::NotFound(name.to_owned())
    }

    /// Lookup of a `::`-separated path from the global namespace.
    pub fn lookup_path(&self, path: &str, ctx: &EvaluationContext) -> Lookup {
        let mut scope = DeclId::GLOBAL;
        let mut segments = path.trim_start_matches("::").split("::").peekable();
        while let Some(segment) = segments.next() {
            let found = self.lookup_in(scope, segment, ctx);
            if segments.peek().is_none() {
                return found;
            }
            match found {
                Lookup::Entity(id) => scope = self.scope_of(id),
                _ => return Lookup::NotFound(path.to_owned()),
            }
        }
        Lookup::NotFound(path.to_owned())
    }

    /// The scope a name denotes when used as a nested-name-specifier.
    fn scope_of(&self, id: DeclId) -> DeclId {
        match &self.decl(id).kind {
            DeclKind::NamespaceAlias { target } => *target,
            DeclKind::TypeAlias(alias) => self.class_of_type(alias.target).unwrap_or(id),
            _ => id,
        }
    }

    /// Members of `scope` plus enumerators of its unscoped enumerations.
    fn scope_candidates(&self, scope: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        let members: &[DeclId] = match &self.decl(scope).kind {
            DeclKind::Namespace(ns) => &ns.members,
            DeclKind::Class(class) => &class.members,
            DeclKind::Enum(en) => &en.enumerators,
            _ => &[],
        };
        members.iter().flat_map(move |&id| {
            let unscoped: &[DeclId] = match &self.decl(id).kind {
                DeclKind::Enum(en) if !en.scoped => &en.enumerators,
                _ => &[],
            };
            std::iter::once(id).chain(unscoped.iter().copied())
        })
    }

    fn keyword_type(&self, name: &str) -> Lookup {
        (0..Idx::PRIMITIVE_COUNT)
            .map(Idx::from_raw)
            .find(|idx| idx.name() == Some(name))
            .map_or_else(|| Lookup::NotFound(name.to_owned()), Lookup::Type)
    }
}
