//! Metafunctions: read-only queries over handles.
//!
//! Each query decodes its operands, checks its preconditions against the
//! current evaluation context and either answers or fails with
//! [`MetaError::NotConstant`](crate::MetaError::NotConstant). Queries never
//! change what a program means; the only mutation they may cause is the
//! instantiation of a class-template specialization whose definition is
//! reachable.

mod comparison;
mod entity;
mod layout;
mod members;
mod names;
mod spec;
mod traits;
mod values;

pub use comparison::{DefaultedEquality, MemberComparison};
pub use layout::MemberOffset;
pub use spec::DataMemberOptions;
pub use traits::{TypeRelation, TypeTrait, TypeTransform};

pub(crate) use spec::may_repeat;
pub(crate) use values::fits;

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::tu::DeclId;
use crate::Reflector;

impl Reflector {
    /// The declaration behind a handle. Class and enumeration types map to
    /// their declarations; other types have none.
    pub(crate) fn declaration_of(&self, construct: Construct) -> Option<DeclId> {
        match construct {
            Construct::Type(ty) => self
                .unit
                .class_of_type(ty)
                .or_else(|| self.unit.pool().enum_decl(ty).map(DeclId::from)),
            other => other.decl(),
        }
    }

    /// Like [`declaration_of`](Self::declaration_of), failing when there
    /// is no declaration.
    pub(crate) fn expect_decl(&self, handle: Handle, operation: &'static str) -> MetaResult<DeclId> {
        let construct = self.decode_non_null(handle, operation)?;
        self.declaration_of(construct).ok_or_else(|| {
            MetaError::not_constant(
                operation,
                Precondition::WrongKind {
                    expected: "declared entity",
                    found: construct.kind_name(),
                },
            )
        })
    }

    /// Display name of a handle for precondition messages.
    pub(crate) fn describe(&self, handle: Handle) -> String {
        self.display_string_of(handle)
    }
}
