//! Template parameters, arguments and the type patterns of template bodies.

use mirror_ir::Name;
use mirror_types::{Idx, Pool};

use super::values::{ConstValue, ValueArena};
use super::{DeclId, ValueId};

/// A canonical template argument.
///
/// Values are interned, so two arguments are template-argument-equivalent
/// exactly when they compare equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TemplateArg {
    Type(Idx),
    Value(ValueId),
    Template(DeclId),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamKind {
    Type,
    /// Non-type parameter of the given type.
    Value(Idx),
    Template,
}

#[derive(Clone, Debug)]
pub struct TemplateParam {
    pub name: Name,
    pub kind: ParamKind,
    pub default: Option<TemplateArg>,
    /// A trailing parameter pack; only the last parameter may be one.
    pub is_pack: bool,
}

impl TemplateParam {
    pub fn ty(name: Name) -> Self {
        TemplateParam {
            name,
            kind: ParamKind::Type,
            default: None,
            is_pack: false,
        }
    }

    pub fn value(name: Name, ty: Idx) -> Self {
        TemplateParam {
            name,
            kind: ParamKind::Value(ty),
            default: None,
            is_pack: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: TemplateArg) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn pack(mut self) -> Self {
        self.is_pack = true;
        self
    }
}

/// Array bound in a pattern.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExtentPattern {
    Fixed(u64),
    /// The value of the non-type parameter at this position.
    Param(usize),
}

/// A type written in terms of template parameters.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypePattern {
    Fixed(Idx),
    /// The type argument at this position.
    Param(usize),
    Pointer(Box<TypePattern>),
    LValueRef(Box<TypePattern>),
    RValueRef(Box<TypePattern>),
    Const(Box<TypePattern>),
    Array(Box<TypePattern>, ExtentPattern),
}

/// Why a pattern could not be turned into a type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PatternError {
    /// The argument at a position has the wrong kind or is missing.
    BadArgument(usize),
    /// The bound arguments form an invalid type.
    InvalidType(&'static str),
}

impl TypePattern {
    pub fn param(index: usize) -> Self {
        TypePattern::Param(index)
    }

    pub fn pointer(self) -> Self {
        TypePattern::Pointer(Box::new(self))
    }

    pub fn lvalue_ref(self) -> Self {
        TypePattern::LValueRef(Box::new(self))
    }

    pub fn rvalue_ref(self) -> Self {
        TypePattern::RValueRef(Box::new(self))
    }

    pub fn constant(self) -> Self {
        TypePattern::Const(Box::new(self))
    }

    pub fn array(self, extent: ExtentPattern) -> Self {
        TypePattern::Array(Box::new(self), extent)
    }

    /// Bind `args` into the pattern.
    pub fn realize(
        &self,
        pool: &mut Pool,
        values: &ValueArena,
        args: &[TemplateArg],
    ) -> Result<Idx, PatternError> {
        match self {
            TypePattern::Fixed(ty) => Ok(*ty),
            TypePattern::Param(index) => match args.get(*index) {
                Some(TemplateArg::Type(ty)) => Ok(*ty),
                _ => Err(PatternError::BadArgument(*index)),
            },
            TypePattern::Pointer(inner) => {
                let pointee = inner.realize(pool, values, args)?;
                if pool.is_reference(pointee) {
                    return Err(PatternError::InvalidType("pointer to reference"));
                }
                Ok(pool.pointer(pointee))
            }
            TypePattern::LValueRef(inner) => {
                let referee = inner.realize(pool, values, args)?;
                if pool.is_void(referee) {
                    return Err(PatternError::InvalidType("reference to void"));
                }
                Ok(pool.lvalue_ref(referee))
            }
            TypePattern::RValueRef(inner) => {
                let referee = inner.realize(pool, values, args)?;
                if pool.is_void(referee) {
                    return Err(PatternError::InvalidType("reference to void"));
                }
                Ok(pool.rvalue_ref(referee))
            }
            TypePattern::Const(inner) => {
                let ty = inner.realize(pool, values, args)?;
                Ok(pool.const_of(ty))
            }
            TypePattern::Array(inner, extent) => {
                let elem = inner.realize(pool, values, args)?;
                if !pool.is_object(elem) {
                    return Err(PatternError::InvalidType("array of non-object type"));
                }
                let len = match *extent {
                    ExtentPattern::Fixed(len) => len,
                    ExtentPattern::Param(index) => match args.get(index) {
                        Some(TemplateArg::Value(value)) => match values.get(*value).value {
                            ConstValue::Int(n) => u64::try_from(n)
                                .map_err(|_| PatternError::InvalidType("negative array bound"))?,
                            _ => return Err(PatternError::BadArgument(index)),
                        },
                        _ => return Err(PatternError::BadArgument(index)),
                    },
                };
                if len == 0 {
                    return Err(PatternError::InvalidType("array of zero length"));
                }
                Ok(pool.array(elem, Some(len)))
            }
        }
    }

    /// Whether the pattern mentions any template parameter.
    pub fn is_dependent(&self) -> bool {
        match self {
            TypePattern::Fixed(_) => false,
            TypePattern::Param(_) => true,
            TypePattern::Pointer(inner)
            | TypePattern::LValueRef(inner)
            | TypePattern::RValueRef(inner)
            | TypePattern::Const(inner) => inner.is_dependent(),
            TypePattern::Array(inner, extent) => {
                inner.is_dependent() || matches!(extent, ExtentPattern::Param(_))
            }
        }
    }
}

/// The atomic constraint a concept checks against its single argument.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConceptPredicate {
    Integral,
    FloatingPoint,
    Arithmetic,
    Class,
    /// Requires a complete type; may trigger instantiation.
    Complete,
    TriviallyCopyable,
    SameAs(Idx),
    Constant(bool),
}

impl ConceptPredicate {
    /// Check predicates that need nothing but the pool.
    ///
    /// Returns `None` for predicates that depend on class definitions.
    pub fn check_structural(self, pool: &Pool, ty: Idx) -> Option<bool> {
        match self {
            ConceptPredicate::Integral => Some(pool.is_integral(ty)),
            ConceptPredicate::FloatingPoint => Some(pool.is_floating_point(ty)),
            ConceptPredicate::Arithmetic => Some(pool.is_arithmetic(ty)),
            ConceptPredicate::Class => Some(pool.is_record(ty)),
            ConceptPredicate::SameAs(other) => Some(ty == other),
            ConceptPredicate::Constant(value) => Some(value),
            ConceptPredicate::Complete | ConceptPredicate::TriviallyCopyable => None,
        }
    }
}
