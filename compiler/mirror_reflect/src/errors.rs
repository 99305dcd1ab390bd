//! Failure channel for metafunctions, splices and generative calls.
//!
//! Every operation returns `Result<_, MetaError>`. A [`MetaError`] is never
//! handled locally: it propagates to the enclosing evaluation, which turns
//! it into an [`EvalFailure`] and, for hard errors, a diagnostic.

use mirror_diagnostic::{Diagnostic, ErrorCode, ErrorGuaranteed};
use mirror_ir::Span;
use thiserror::Error;

/// Result alias for reflection operations.
pub type MetaResult<T> = Result<T, MetaError>;

/// Why an operation failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MetaError {
    /// A precondition failed; the enclosing evaluation is not constant.
    #[error("call to `{operation}` is not a constant expression: {precondition}")]
    NotConstant {
        operation: &'static str,
        precondition: Precondition,
    },
    /// The program is ill-formed regardless of how it is evaluated.
    #[error(transparent)]
    IllFormed(#[from] IllFormed),
    /// A nested evaluation already reported its failure.
    #[error("{0}")]
    Diagnosed(ErrorGuaranteed),
    /// A bookkeeping invariant of the engine was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MetaError {
    pub fn not_constant(operation: &'static str, precondition: Precondition) -> Self {
        MetaError::NotConstant {
            operation,
            precondition,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            MetaError::NotConstant { precondition, .. } => precondition.code(),
            MetaError::IllFormed(ill) => ill.code(),
            MetaError::Diagnosed(_) => ErrorCode::E6002,
            MetaError::Internal(_) => ErrorCode::E9001,
        }
    }

    pub fn is_not_constant(&self) -> bool {
        matches!(self, MetaError::NotConstant { .. })
    }

    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            MetaError::NotConstant {
                operation,
                precondition,
            } => diag
                .with_operation(*operation)
                .with_label(span, format!("`{operation}` failed here"))
                .with_note(format!("unmet precondition: {precondition}")),
            MetaError::IllFormed(ill) => {
                let diag = diag.with_label(span, ill.label());
                match ill.suggestion() {
                    Some(suggestion) => diag.with_suggestion(suggestion),
                    None => diag,
                }
            }
            MetaError::Diagnosed(_) | MetaError::Internal(_) => {
                diag.with_label(span, "while evaluating this expression")
            }
        }
    }
}

/// A metafunction precondition.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Precondition {
    #[error("operand is a null reflection")]
    NullReflection,
    #[error("operand does not belong to this translation unit")]
    ForeignHandle,
    #[error("expected a reflection of {expected}, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("`{0}` is not a complete type from this evaluation context")]
    IncompleteType(String),
    #[error("`{0}` is too large to lay out")]
    TooLarge(String),
    #[error("`{0}` has no identifier")]
    NoIdentifier(String),
    #[error("`{0}` has no type")]
    NoType(String),
    #[error("`{0}` has no parent")]
    NoParent(String),
    #[error("`{0}` is not a specialization of a template")]
    NoTemplateArguments(String),
    #[error("`{0}` has no value usable in constant expressions")]
    NoValue(String),
    #[error("value of type `{found}` is not convertible to `{expected}`")]
    TypeMismatch { expected: String, found: String },
    #[error("template arguments do not form a valid template-id for `{0}`")]
    SubstitutionFailed(String),
    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),
    #[error("invalid bit-field width: {0}")]
    InvalidBitWidth(&'static str),
    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(u64),
    #[error("a data member description needs a name unless it is a bit-field")]
    MissingName,
    #[error("member name `{0}` is declared more than once")]
    DuplicateMemberName(String),
    #[error("a generative definition can only name a class type")]
    NotAClassTarget,
    #[error("evaluation exceeded its budget of {budget} metafunction calls")]
    BudgetExceeded { budget: u32 },
    #[error("evaluation nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
    #[error("nested evaluation is not constant: {0}")]
    NonConstantSubexpression(String),
}

impl Precondition {
    pub fn code(&self) -> ErrorCode {
        match self {
            Precondition::BudgetExceeded { .. } => ErrorCode::E2002,
            Precondition::DepthExceeded { .. } => ErrorCode::E2003,
            Precondition::SubstitutionFailed(_) => ErrorCode::E4001,
            Precondition::InvalidName(_)
            | Precondition::InvalidBitWidth(_)
            | Precondition::InvalidAlignment(_)
            | Precondition::MissingName
            | Precondition::DuplicateMemberName(_) => ErrorCode::E5003,
            _ => ErrorCode::E2001,
        }
    }
}

/// Hard errors, diagnosed independently of any evaluation outcome.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IllFormed {
    #[error("reflection of `{name}` does not select a unique function ({candidates} candidates)")]
    AmbiguousOverloadSet { name: String, candidates: usize },
    #[error("{0} cannot be reflected")]
    NotReflectable(&'static str),
    #[error("`{0}` was not found")]
    NameNotFound(String),
    #[error("cannot splice a {0}")]
    SpecialMemberSplice(&'static str),
    #[error("a splice cannot open a namespace definition")]
    NamespaceDefinitionSplice,
    #[error("a dependent splice cannot name the namespace of a using-directive")]
    DependentUsingDirective,
    #[error("a dependent splice cannot name the enumeration of a using-enum-declaration")]
    DependentUsingEnum,
    #[error("a concept splice cannot appear in a template parameter declaration")]
    ConceptTemplateParameter,
    #[error("a splice cannot be used as a designator")]
    DesignatorSplice,
    #[error("splice of a {found} where a {expected} is required")]
    SpliceKindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("cannot splice a null reflection")]
    NullSplice,
    #[error("cannot take the address of bit-field `{0}`")]
    BitFieldAddress(String),
    #[error("instantiation of `{specialization}` failed: {reason}")]
    InstantiationFailed {
        specialization: String,
        reason: &'static str,
    },
    #[error("declaration injected from a {site}, which is not plainly constant-evaluated")]
    NonPlainInjection { site: &'static str },
    #[error("`{target}` was already defined with a different member list")]
    RedefinitionConflict { target: String },
    #[error("`{target}` cannot be defined here: {reason}")]
    TargetNotDefinable {
        target: String,
        reason: &'static str,
    },
    #[error("plainly constant-evaluated expression evaluated out of lexical order")]
    OutOfOrderEvaluation,
}

impl IllFormed {
    pub fn code(&self) -> ErrorCode {
        match self {
            IllFormed::AmbiguousOverloadSet { .. } => ErrorCode::E1001,
            IllFormed::NotReflectable(_) => ErrorCode::E1002,
            IllFormed::NameNotFound(_) => ErrorCode::E1003,
            IllFormed::SpecialMemberSplice(_) => ErrorCode::E3001,
            IllFormed::NamespaceDefinitionSplice => ErrorCode::E3002,
            IllFormed::DependentUsingDirective => ErrorCode::E3003,
            IllFormed::DependentUsingEnum => ErrorCode::E3004,
            IllFormed::ConceptTemplateParameter => ErrorCode::E3005,
            IllFormed::DesignatorSplice => ErrorCode::E3006,
            IllFormed::SpliceKindMismatch { .. } => ErrorCode::E3007,
            IllFormed::NullSplice => ErrorCode::E3008,
            IllFormed::BitFieldAddress(_) => ErrorCode::E3009,
            IllFormed::InstantiationFailed { .. } => ErrorCode::E4002,
            IllFormed::NonPlainInjection { .. } => ErrorCode::E5001,
            IllFormed::RedefinitionConflict { .. } => ErrorCode::E5002,
            IllFormed::TargetNotDefinable { .. } => ErrorCode::E5004,
            IllFormed::OutOfOrderEvaluation => ErrorCode::E6001,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IllFormed::AmbiguousOverloadSet { .. } => "ambiguous reflection",
            IllFormed::NotReflectable(_) | IllFormed::NameNotFound(_) => "reflected here",
            IllFormed::NonPlainInjection { .. }
            | IllFormed::RedefinitionConflict { .. }
            | IllFormed::TargetNotDefinable { .. } => "declaration produced here",
            IllFormed::InstantiationFailed { .. } => "required from here",
            IllFormed::OutOfOrderEvaluation => "evaluated here",
            _ => "spliced here",
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            IllFormed::NonPlainInjection { .. } => {
                Some("move the call into a `static_assert` or a `constexpr` variable initializer")
            }
            IllFormed::AmbiguousOverloadSet { .. } => {
                Some("reflect a single function, e.g. through `members_of` and a filter")
            }
            _ => None,
        }
    }
}

/// How an evaluation ended when it did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalFailure {
    /// A manifestly constant-evaluated expression was not constant. The
    /// caller decides whether that is an error (it is not for trial
    /// evaluation).
    NotConstant(Box<Diagnostic>),
    /// A hard error was diagnosed.
    IllFormed(ErrorGuaranteed),
    /// A plainly constant-evaluated expression failed.
    Fatal(ErrorGuaranteed),
}

impl EvalFailure {
    pub fn is_fatal(&self) -> bool {
        matches!(self, EvalFailure::Fatal(_))
    }

    /// The error proof, when the failure was diagnosed.
    pub fn guarantee(&self) -> Option<ErrorGuaranteed> {
        match self {
            EvalFailure::NotConstant(_) => None,
            EvalFailure::IllFormed(proof) | EvalFailure::Fatal(proof) => Some(*proof),
        }
    }
}

impl From<EvalFailure> for MetaError {
    /// Propagate a nested evaluation's failure to the enclosing one.
    fn from(failure: EvalFailure) -> Self {
        match failure {
            EvalFailure::NotConstant(diag) => MetaError::not_constant(
                "nested evaluation",
                Precondition::NonConstantSubexpression(diag.message),
            ),
            EvalFailure::IllFormed(proof) | EvalFailure::Fatal(proof) => MetaError::Diagnosed(proof),
        }
    }
}
