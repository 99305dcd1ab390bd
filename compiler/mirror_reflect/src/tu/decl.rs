//! Declarations stored in the translation unit arena.
//!
//! The arena is append-only: a declaration is never removed, and the only
//! in-place change is the transition of a class or enumeration from
//! incomplete to complete.

use mirror_ir::{Name, Span};
use mirror_types::Idx;
use smallvec::SmallVec;

use super::pattern::{ConceptPredicate, TemplateArg, TemplateParam, TypePattern};
use super::{DeclId, DescId, InjectedPoint, ObjectId, ProgramPoint, ValueId};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

/// Where a declaration came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Origin {
    /// Written in the program text.
    Source,
    /// Produced by instantiating the given template.
    Instantiated(DeclId),
    /// Produced by compile-time evaluation.
    Injected(InjectedPoint),
}

#[derive(Clone, Debug)]
pub struct Decl {
    /// `Name::EMPTY` for unnamed entities.
    pub name: Name,
    pub kind: DeclKind,
    /// Enclosing scope; `None` only for the global namespace.
    pub parent: Option<DeclId>,
    /// The locus: the declaration is lexically visible after this point.
    pub point: ProgramPoint,
    pub access: Access,
    pub span: Span,
    pub origin: Origin,
}

impl Decl {
    /// The injected point of an injected declaration.
    pub fn injected_point(&self) -> Option<InjectedPoint> {
        match self.origin {
            Origin::Injected(point) => Some(point),
            Origin::Source | Origin::Instantiated(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum DeclKind {
    Namespace(NamespaceDecl),
    NamespaceAlias {
        target: DeclId,
    },
    Class(ClassDecl),
    Enum(EnumDecl),
    Enumerator {
        enumeration: DeclId,
        value: i128,
    },
    TypeAlias(AliasDecl),
    Variable(VariableDecl),
    StructuredBinding {
        ty: Idx,
        object: ObjectId,
    },
    Field(FieldDecl),
    Base(BaseDecl),
    Function(FunctionDecl),
    Template(TemplateDecl),
    StaticAssert,
    Friend {
        target: Option<DeclId>,
    },
    InjectedClassName {
        class: DeclId,
    },
    PartialSpecialization {
        template: DeclId,
    },
}

impl DeclKind {
    /// Human-readable kind, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            DeclKind::Namespace(_) => "namespace",
            DeclKind::NamespaceAlias { .. } => "namespace alias",
            DeclKind::Class(class) => class.key.keyword(),
            DeclKind::Enum(_) => "enumeration",
            DeclKind::Enumerator { .. } => "enumerator",
            DeclKind::TypeAlias(_) => "type alias",
            DeclKind::Variable(_) => "variable",
            DeclKind::StructuredBinding { .. } => "structured binding",
            DeclKind::Field(_) => "data member",
            DeclKind::Base(_) => "base specifier",
            DeclKind::Function(_) => "function",
            DeclKind::Template(t) => t.kind.describe(),
            DeclKind::StaticAssert => "static assertion",
            DeclKind::Friend { .. } => "friend declaration",
            DeclKind::InjectedClassName { .. } => "injected class name",
            DeclKind::PartialSpecialization { .. } => "partial specialization",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NamespaceDecl {
    pub members: Vec<DeclId>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassKey {
    Struct,
    Class,
    Union,
}

impl ClassKey {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKey::Struct => "struct",
            ClassKey::Class => "class",
            ClassKey::Union => "union",
        }
    }

    /// Access of members declared without an access specifier.
    pub fn default_access(self) -> Access {
        match self {
            ClassKey::Struct | ClassKey::Union => Access::Public,
            ClassKey::Class => Access::Private,
        }
    }
}

/// Completion state of a class or enumeration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Completion {
    Incomplete,
    /// Complete after lexical point `at`, or from contexts holding
    /// `injected` when the definition was produced by evaluation.
    Complete {
        at: ProgramPoint,
        injected: Option<InjectedPoint>,
    },
}

/// The template-id a specialization was formed from.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Specialization {
    pub template: DeclId,
    pub args: Box<[TemplateArg]>,
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub key: ClassKey,
    /// The class type in the pool.
    pub ty: Idx,
    /// Base specifiers in declaration order.
    pub bases: Vec<DeclId>,
    /// Member declarations in declaration order.
    pub members: Vec<DeclId>,
    pub state: Completion,
    pub specialization: Option<Specialization>,
    /// Member descriptions a generative definition was produced from.
    pub injected_from: Option<Box<[DescId]>>,
}

impl ClassDecl {
    pub fn is_union(&self) -> bool {
        self.key == ClassKey::Union
    }
}

#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub ty: Idx,
    /// Fixed or deduced underlying type.
    pub underlying: Idx,
    /// Declared with an enum-base, which makes it complete before its
    /// enumerators are known.
    pub fixed_underlying: bool,
    pub scoped: bool,
    pub enumerators: Vec<DeclId>,
    pub state: Completion,
    /// Point after which the enumerator list is closed.
    pub enumerable: Option<ProgramPoint>,
}

#[derive(Clone, Debug)]
pub struct AliasDecl {
    pub target: Idx,
    /// Set when the alias is a specialization of an alias template.
    pub specialization: Option<Specialization>,
}

#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub ty: Idx,
    pub object: ObjectId,
    /// Static data member of a class.
    pub is_static_member: bool,
    /// Constant initializer, when usable in constant expressions.
    pub value: Option<ValueId>,
    pub specialization: Option<Specialization>,
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub ty: Idx,
    pub bit_width: Option<u64>,
    pub align: Option<u64>,
    pub no_unique_address: bool,
    pub has_default_init: bool,
}

impl FieldDecl {
    pub fn new(ty: Idx) -> Self {
        FieldDecl {
            ty,
            bit_width: None,
            align: None,
            no_unique_address: false,
            has_default_init: false,
        }
    }

    pub fn is_bit_field(&self) -> bool {
        self.bit_width.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct BaseDecl {
    pub ty: Idx,
    pub is_virtual: bool,
}

/// How a function receives its object argument.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum FunctionRole {
    /// Namespace-scope function.
    #[default]
    Free,
    /// Static member function.
    Static,
    /// Non-static member function with an implicit `this`.
    ImplicitObject,
    /// Member function with an explicit object parameter (`this Self&`).
    ExplicitObject,
    Constructor,
    Destructor,
}

impl FunctionRole {
    pub fn is_member(self) -> bool {
        !matches!(self, FunctionRole::Free)
    }
}

/// Which special member a function is, if any.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SpecialMember {
    DefaultConstructor,
    CopyConstructor,
    MoveConstructor,
    CopyAssignment,
    MoveAssignment,
    Destructor,
}

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    /// Function type, excluding the implicit object parameter.
    pub ty: Idx,
    pub role: FunctionRole,
    pub special: Option<SpecialMember>,
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_deleted: bool,
    pub is_defaulted: bool,
    /// Declared with a body or defaulted out of line.
    pub user_provided: bool,
    /// Result of checking the trailing requires-clause.
    pub constraints_satisfied: bool,
    pub specialization: Option<Specialization>,
}

impl FunctionDecl {
    /// A user-declared function with satisfied constraints.
    pub fn new(ty: Idx, role: FunctionRole) -> Self {
        FunctionDecl {
            ty,
            role,
            special: match role {
                FunctionRole::Destructor => Some(SpecialMember::Destructor),
                _ => None,
            },
            is_virtual: false,
            is_pure: false,
            is_deleted: false,
            is_defaulted: false,
            user_provided: true,
            constraints_satisfied: true,
            specialization: None,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TemplateKind {
    Class,
    Function,
    Variable,
    Alias,
    Concept,
}

impl TemplateKind {
    pub fn describe(self) -> &'static str {
        match self {
            TemplateKind::Class => "class template",
            TemplateKind::Function => "function template",
            TemplateKind::Variable => "variable template",
            TemplateKind::Alias => "alias template",
            TemplateKind::Concept => "concept",
        }
    }
}

/// A member of a class template body.
#[derive(Clone, Debug)]
pub struct FieldPattern {
    pub name: Name,
    pub ty: TypePattern,
    pub bit_width: Option<u64>,
}

/// What a template produces once its parameters are bound.
#[derive(Clone, Debug)]
pub enum TemplateBody {
    Class {
        key: ClassKey,
        fields: Vec<FieldPattern>,
    },
    Alias {
        target: TypePattern,
    },
    Function {
        params: Vec<TypePattern>,
        ret: TypePattern,
        role: FunctionRole,
    },
    Variable {
        ty: TypePattern,
    },
    Concept {
        predicate: ConceptPredicate,
    },
}

/// A `requires` constraint: the argument at `param` must satisfy `concept`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Constraint {
    pub param: usize,
    pub concept: DeclId,
}

#[derive(Clone, Debug)]
pub struct TemplateDecl {
    pub kind: TemplateKind,
    pub params: Vec<TemplateParam>,
    pub constraints: SmallVec<[Constraint; 2]>,
    pub body: TemplateBody,
    /// Point after which the definition is reachable; `None` while only
    /// declared.
    pub definition: Option<ProgramPoint>,
    /// Specializations formed so far, in creation order.
    pub specializations: Vec<DeclId>,
}
