//! The reflection handle.
//!
//! A [`Handle`] is a pointer-sized scalar naming exactly one program
//! construct. Handles are only minted by the resolution engine and by
//! metafunctions, which canonicalize what they wrap (redeclared aliases
//! share a declaration, values and descriptions are interned, alias
//! specializations are memoized), so two handles denote the same construct
//! exactly when their bits are equal.

use std::fmt;

use mirror_types::Idx;

use crate::tu::{DeclId, DescId, ObjectId, ValueId};

/// The construct a handle denotes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Construct {
    Null,
    /// A type other than a typedef-name.
    Type(Idx),
    /// A typedef-name or alias declaration (including alias template
    /// specializations).
    TypeAlias(DeclId),
    Value(ValueId),
    Object(ObjectId),
    Variable(DeclId),
    StructuredBinding(DeclId),
    Function(DeclId),
    Enumerator(DeclId),
    /// A non-static data member.
    DataMember(DeclId),
    Base(DeclId),
    Template(DeclId),
    Namespace(DeclId),
    NamespaceAlias(DeclId),
    /// A synthetic data member description.
    MemberDescription(DescId),
}

impl Construct {
    /// Kind name for diagnostics.
    pub fn kind_name(self) -> &'static str {
        match self {
            Construct::Null => "null reflection",
            Construct::Type(_) => "type",
            Construct::TypeAlias(_) => "type alias",
            Construct::Value(_) => "value",
            Construct::Object(_) => "object",
            Construct::Variable(_) => "variable",
            Construct::StructuredBinding(_) => "structured binding",
            Construct::Function(_) => "function",
            Construct::Enumerator(_) => "enumerator",
            Construct::DataMember(_) => "non-static data member",
            Construct::Base(_) => "base specifier",
            Construct::Template(_) => "template",
            Construct::Namespace(_) => "namespace",
            Construct::NamespaceAlias(_) => "namespace alias",
            Construct::MemberDescription(_) => "data member description",
        }
    }

    /// The declaration behind a declared construct.
    pub fn decl(self) -> Option<DeclId> {
        match self {
            Construct::TypeAlias(id)
            | Construct::Variable(id)
            | Construct::StructuredBinding(id)
            | Construct::Function(id)
            | Construct::Enumerator(id)
            | Construct::DataMember(id)
            | Construct::Base(id)
            | Construct::Template(id)
            | Construct::Namespace(id)
            | Construct::NamespaceAlias(id) => Some(id),
            Construct::Null
            | Construct::Type(_)
            | Construct::Value(_)
            | Construct::Object(_)
            | Construct::MemberDescription(_) => None,
        }
    }
}

/// An opaque reflection of a program construct.
///
/// Layout: kind tag in bits 32..40, payload index in bits 0..32. The
/// all-zero handle is the null reflection.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(transparent)]
pub struct Handle(u64);

mod tag {
    pub const NULL: u8 = 0;
    pub const TYPE: u8 = 1;
    pub const TYPE_ALIAS: u8 = 2;
    pub const VALUE: u8 = 3;
    pub const OBJECT: u8 = 4;
    pub const VARIABLE: u8 = 5;
    pub const STRUCTURED_BINDING: u8 = 6;
    pub const FUNCTION: u8 = 7;
    pub const ENUMERATOR: u8 = 8;
    pub const DATA_MEMBER: u8 = 9;
    pub const BASE: u8 = 10;
    pub const TEMPLATE: u8 = 11;
    pub const NAMESPACE: u8 = 12;
    pub const NAMESPACE_ALIAS: u8 = 13;
    pub const MEMBER_DESCRIPTION: u8 = 14;
}

impl Handle {
    /// The null reflection (`std::meta::info{}`).
    pub const NULL: Handle = Handle(0);

    const fn pack(tag: u8, payload: u32) -> Self {
        Handle(((tag as u64) << 32) | payload as u64)
    }

    #[inline]
    const fn tag(self) -> u8 {
        #[allow(clippy::cast_possible_truncation, reason = "tag occupies one byte")]
        let tag = (self.0 >> 32) as u8;
        tag
    }

    #[inline]
    const fn payload(self) -> u32 {
        #[allow(clippy::cast_possible_truncation, reason = "payload is the low word")]
        let payload = self.0 as u32;
        payload
    }

    /// Raw bits, for hashing into external tables.
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    pub(crate) fn new(construct: Construct) -> Self {
        match construct {
            Construct::Null => Handle::NULL,
            Construct::Type(ty) => Self::pack(tag::TYPE, ty.raw()),
            Construct::TypeAlias(id) => Self::pack(tag::TYPE_ALIAS, id.raw()),
            Construct::Value(id) => Self::pack(tag::VALUE, id.raw()),
            Construct::Object(id) => Self::pack(tag::OBJECT, id.raw()),
            Construct::Variable(id) => Self::pack(tag::VARIABLE, id.raw()),
            Construct::StructuredBinding(id) => Self::pack(tag::STRUCTURED_BINDING, id.raw()),
            Construct::Function(id) => Self::pack(tag::FUNCTION, id.raw()),
            Construct::Enumerator(id) => Self::pack(tag::ENUMERATOR, id.raw()),
            Construct::DataMember(id) => Self::pack(tag::DATA_MEMBER, id.raw()),
            Construct::Base(id) => Self::pack(tag::BASE, id.raw()),
            Construct::Template(id) => Self::pack(tag::TEMPLATE, id.raw()),
            Construct::Namespace(id) => Self::pack(tag::NAMESPACE, id.raw()),
            Construct::NamespaceAlias(id) => Self::pack(tag::NAMESPACE_ALIAS, id.raw()),
            Construct::MemberDescription(id) => Self::pack(tag::MEMBER_DESCRIPTION, id.raw()),
        }
    }

    /// Decode the construct this handle denotes.
    pub fn construct(self) -> Construct {
        let raw = self.payload();
        match self.tag() {
            tag::TYPE => Construct::Type(Idx::from_raw(raw)),
            tag::TYPE_ALIAS => Construct::TypeAlias(DeclId::from_raw(raw)),
            tag::VALUE => Construct::Value(ValueId::from_raw(raw)),
            tag::OBJECT => Construct::Object(ObjectId::from_raw(raw)),
            tag::VARIABLE => Construct::Variable(DeclId::from_raw(raw)),
            tag::STRUCTURED_BINDING => Construct::StructuredBinding(DeclId::from_raw(raw)),
            tag::FUNCTION => Construct::Function(DeclId::from_raw(raw)),
            tag::ENUMERATOR => Construct::Enumerator(DeclId::from_raw(raw)),
            tag::DATA_MEMBER => Construct::DataMember(DeclId::from_raw(raw)),
            tag::BASE => Construct::Base(DeclId::from_raw(raw)),
            tag::TEMPLATE => Construct::Template(DeclId::from_raw(raw)),
            tag::NAMESPACE => Construct::Namespace(DeclId::from_raw(raw)),
            tag::NAMESPACE_ALIAS => Construct::NamespaceAlias(DeclId::from_raw(raw)),
            tag::MEMBER_DESCRIPTION => Construct::MemberDescription(DescId::from_raw(raw)),
            tag::NULL => Construct::Null,
            // Tags are only written by `new`.
            _ => Construct::Null,
        }
    }

    // === Kind Predicates ===

    #[inline]
    pub fn is_null(self) -> bool {
        self.tag() == tag::NULL
    }

    /// Types and typedef-names.
    pub fn is_type(self) -> bool {
        matches!(self.tag(), tag::TYPE | tag::TYPE_ALIAS)
    }

    pub fn is_type_alias(self) -> bool {
        self.tag() == tag::TYPE_ALIAS
    }

    pub fn is_value(self) -> bool {
        self.tag() == tag::VALUE
    }

    pub fn is_object(self) -> bool {
        self.tag() == tag::OBJECT
    }

    pub fn is_variable(self) -> bool {
        self.tag() == tag::VARIABLE
    }

    pub fn is_structured_binding(self) -> bool {
        self.tag() == tag::STRUCTURED_BINDING
    }

    pub fn is_function(self) -> bool {
        self.tag() == tag::FUNCTION
    }

    pub fn is_enumerator(self) -> bool {
        self.tag() == tag::ENUMERATOR
    }

    pub fn is_nonstatic_data_member(self) -> bool {
        self.tag() == tag::DATA_MEMBER
    }

    pub fn is_base(self) -> bool {
        self.tag() == tag::BASE
    }

    pub fn is_template(self) -> bool {
        self.tag() == tag::TEMPLATE
    }

    /// Namespaces and namespace aliases.
    pub fn is_namespace(self) -> bool {
        matches!(self.tag(), tag::NAMESPACE | tag::NAMESPACE_ALIAS)
    }

    pub fn is_namespace_alias(self) -> bool {
        self.tag() == tag::NAMESPACE_ALIAS
    }

    pub fn is_data_member_spec(self) -> bool {
        self.tag() == tag::MEMBER_DESCRIPTION
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:?})", self.construct())
    }
}

#[cfg(test)]
mod tests;
