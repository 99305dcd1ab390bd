//! Names of reflected constructs.

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::tu::{DeclId, DeclKind, FunctionRole};
use crate::Reflector;

impl Reflector {
    /// Whether the construct has a plain identifier.
    ///
    /// Specializations, constructors, destructors, base-specifiers, values
    /// and objects have none.
    pub fn has_identifier(&mut self, handle: Handle) -> MetaResult<bool> {
        self.tick("has_identifier")?;
        Ok(self.identifier(handle, "has_identifier")?.is_some())
    }

    /// The identifier of a construct that has one.
    pub fn identifier_of(&mut self, handle: Handle) -> MetaResult<&'static str> {
        const OP: &str = "identifier_of";
        self.tick(OP)?;
        match self.identifier(handle, OP)? {
            Some(name) => Ok(name),
            None => Err(MetaError::not_constant(
                OP,
                Precondition::NoIdentifier(self.display_string_of(handle)),
            )),
        }
    }

    fn identifier(
        &self,
        handle: Handle,
        operation: &'static str,
    ) -> MetaResult<Option<&'static str>> {
        let construct = self.decode(handle, operation)?;
        let decl = match construct {
            Construct::Null
            | Construct::Value(_)
            | Construct::Object(_)
            | Construct::Base(_) => return Ok(None),
            Construct::MemberDescription(id) => {
                let name = self.unit.descs().get(id).name;
                return Ok(name.map(|n| self.unit.interner().lookup(n)));
            }
            Construct::Type(_) => match self.declaration_of(construct) {
                Some(id) if self.unit.specialization_of(id).is_none() => id,
                _ => return Ok(None),
            },
            Construct::Function(id) => match &self.unit.decl(id).kind {
                DeclKind::Function(f)
                    if matches!(f.role, FunctionRole::Constructor | FunctionRole::Destructor)
                        || f.specialization.is_some() =>
                {
                    return Ok(None)
                }
                _ => id,
            },
            other => match other.decl() {
                Some(id) if self.unit.specialization_of(id).is_none() => id,
                _ => return Ok(None),
            },
        };
        let name = self.unit.name(decl);
        Ok((!name.is_empty()).then_some(name))
    }

    /// A human-readable rendering of any handle. Never fails; the format
    /// is not part of any contract.
    pub fn display_string_of(&self, handle: Handle) -> String {
        let Ok(construct) = self.decode(handle, "display_string_of") else {
            return "<foreign reflection>".to_owned();
        };
        match construct {
            Construct::Null => "<null reflection>".to_owned(),
            Construct::Type(ty) => self.unit.format_type(ty),
            Construct::Value(id) => self.unit.format_value(id),
            Construct::Object(id) => {
                let entry = self.unit.objects().get(id);
                match entry.origin {
                    crate::tu::ObjectOrigin::Variable(var) => self.unit.qualified_name(var),
                    crate::tu::ObjectOrigin::Subobject { member, .. } => {
                        format!("<subobject {}>", self.unit.qualified_name(member))
                    }
                }
            }
            Construct::Base(id) => match &self.unit.decl(id).kind {
                DeclKind::Base(base) => format!(
                    "{} (base of {})",
                    self.unit.format_type(base.ty),
                    self.parent_name(id)
                ),
                _ => self.unit.qualified_name(id),
            },
            Construct::MemberDescription(id) => {
                let spec = self.unit.descs().get(id);
                let name = spec.name.map_or("", |n| self.unit.interner().lookup(n));
                match spec.bit_width {
                    Some(width) => format!("{} {name} : {width}", self.unit.format_type(spec.ty)),
                    None => format!("{} {name}", self.unit.format_type(spec.ty)),
                }
            }
            other => other
                .decl()
                .map(|id| self.unit.qualified_name(id))
                .unwrap_or_default(),
        }
    }

    fn parent_name(&self, id: DeclId) -> String {
        self.unit
            .decl(id)
            .parent
            .map(|p| self.unit.qualified_name(p))
            .unwrap_or_default()
    }
}
