//! The reflection operator: lookup results to handles.
//!
//! An overload set resolves only when the invented initialization
//! `const auto* p = &name;` would pick exactly one function. Everything
//! else lookup can find is wrapped directly.

use mirror_types::Idx;

use crate::errors::{IllFormed, MetaResult};
use crate::handle::{Construct, Handle};
use crate::tu::{DeclId, DeclKind, Lookup};
use crate::Reflector;

impl Reflector {
    /// `^^name` for an already looked-up name.
    pub fn reflect(&mut self, found: &Lookup) -> MetaResult<Handle> {
        self.tick("reflect")?;
        match found {
            Lookup::Entity(id) => self.reflect_decl(*id),
            Lookup::Type(ty) => Ok(self.reflect_type(*ty)),
            Lookup::OverloadSet(candidates) => self.reflect_overload_set(candidates),
            Lookup::NotFound(name) => Err(IllFormed::NameNotFound(name.clone()).into()),
        }
    }

    /// `^^T` for a type.
    pub fn reflect_type(&self, ty: Idx) -> Handle {
        Handle::new(Construct::Type(ty))
    }

    /// `^^` of a declared entity.
    pub fn reflect_decl(&self, id: DeclId) -> MetaResult<Handle> {
        self.handle_for_decl(id)
            .ok_or_else(|| IllFormed::NotReflectable(self.unit.decl(id).kind.describe()).into())
    }

    /// Unqualified lookup of `name` from `scope`, then reflect.
    pub fn reflect_name(&mut self, scope: DeclId, name: &str) -> MetaResult<Handle> {
        let found = self.unit.lookup(scope, name, &self.context());
        self.reflect(&found)
    }

    /// Qualified lookup of a `::`-separated path, then reflect.
    pub fn reflect_path(&mut self, path: &str) -> MetaResult<Handle> {
        let found = self.unit.lookup_path(path, &self.context());
        self.reflect(&found)
    }

    fn reflect_overload_set(&self, candidates: &[DeclId]) -> MetaResult<Handle> {
        if let [only] = candidates {
            if let DeclKind::Template(_) = self.unit.decl(*only).kind {
                return Ok(Handle::new(Construct::Template(*only)));
            }
        }
        let has_template = candidates
            .iter()
            .any(|&id| matches!(self.unit.decl(id).kind, DeclKind::Template(_)));
        let viable: Vec<DeclId> = if has_template {
            Vec::new()
        } else {
            candidates
                .iter()
                .copied()
                .filter(|&id| {
                    matches!(&self.unit.decl(id).kind, DeclKind::Function(f) if f.constraints_satisfied)
                })
                .collect()
        };
        match viable.as_slice() {
            [only] => Ok(Handle::new(Construct::Function(*only))),
            _ => {
                let name = candidates
                    .first()
                    .map(|&id| self.unit.qualified_name(id))
                    .unwrap_or_default();
                Err(IllFormed::AmbiguousOverloadSet {
                    name,
                    candidates: candidates.len(),
                }
                .into())
            }
        }
    }
}
