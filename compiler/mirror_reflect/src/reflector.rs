//! The reflection session.
//!
//! A [`Reflector`] owns one translation unit and everything evaluation
//! adds to it: the frame stack of in-flight evaluations, the injection
//! graph, the memo of plainly-evaluated expressions and the diagnostics
//! queue. Every metafunction is a method on it.

use std::any::Any;

use mirror_diagnostic::DiagnosticQueue;
use mirror_types::Idx;
use rustc_hash::FxHashMap;

use crate::errors::{EvalFailure, MetaError, MetaResult, Precondition};
use crate::eval::{EvalRecord, EvaluationContext, ExprKey, Frame, InjectionGraph};
use crate::handle::{Construct, Handle};
use crate::tu::{DeclId, DeclKind, ProgramPoint, TranslationUnit};
use crate::ReflectConfig;

/// Outcome of a plainly-evaluated expression, kept so it runs only once.
pub(crate) type PlainOutcome = Result<Box<dyn Any>, EvalFailure>;

pub struct Reflector {
    pub(crate) unit: TranslationUnit,
    pub(crate) config: ReflectConfig,
    pub(crate) frames: Vec<Frame>,
    pub(crate) injections: InjectionGraph,
    pub(crate) plain_memo: FxHashMap<ExprKey, PlainOutcome>,
    pub(crate) records: FxHashMap<ExprKey, EvalRecord>,
    /// Point of the last outermost plain evaluation.
    pub(crate) last_plain: Option<ProgramPoint>,
    pub(crate) next_key: u32,
    /// Metafunction calls in the current outermost evaluation.
    pub(crate) calls: u32,
    pub(crate) instantiation_depth: usize,
    pub(crate) diagnostics: DiagnosticQueue,
}

impl Reflector {
    pub fn new(unit: TranslationUnit) -> Self {
        Self::with_config(unit, ReflectConfig::default())
    }

    pub fn with_config(unit: TranslationUnit, config: ReflectConfig) -> Self {
        Reflector {
            unit,
            config,
            frames: Vec::new(),
            injections: InjectionGraph::default(),
            plain_memo: FxHashMap::default(),
            records: FxHashMap::default(),
            last_plain: None,
            next_key: 0,
            calls: 0,
            instantiation_depth: 0,
            diagnostics: DiagnosticQueue::new(),
        }
    }

    // === Accessors ===

    pub fn unit(&self) -> &TranslationUnit {
        &self.unit
    }

    /// The translation unit, for declaring more of the program.
    pub fn unit_mut(&mut self) -> &mut TranslationUnit {
        &mut self.unit
    }

    pub fn config(&self) -> &ReflectConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticQueue {
        &mut self.diagnostics
    }

    pub fn injections(&self) -> &InjectionGraph {
        &self.injections
    }

    /// The evaluation context queries currently run in.
    ///
    /// Outside any evaluation this is the current lexical position.
    pub fn context(&self) -> EvaluationContext {
        match self.frames.last() {
            Some(frame) => frame.context.clone(),
            None => self.unit.ambient_context(),
        }
    }

    /// Whether an evaluation is in progress.
    pub fn is_evaluating(&self) -> bool {
        !self.frames.is_empty()
    }

    // === Call Accounting ===

    /// Count one metafunction call against the evaluation budget.
    pub(crate) fn tick(&mut self, operation: &'static str) -> MetaResult<()> {
        if self.frames.is_empty() {
            return Ok(());
        }
        self.calls = self.calls.saturating_add(1);
        if self.calls > self.config.eval_budget {
            return Err(MetaError::not_constant(
                operation,
                Precondition::BudgetExceeded {
                    budget: self.config.eval_budget,
                },
            ));
        }
        Ok(())
    }

    /// Nesting of evaluations plus instantiations in progress.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len() + self.instantiation_depth
    }

    pub(crate) fn check_depth(&self, operation: &'static str) -> MetaResult<()> {
        if self.depth() >= self.config.max_depth {
            return Err(MetaError::not_constant(
                operation,
                Precondition::DepthExceeded {
                    limit: self.config.max_depth,
                },
            ));
        }
        Ok(())
    }

    // === Handle Decoding ===

    /// Decode a handle, rejecting ids this translation unit never issued.
    pub(crate) fn decode(&self, handle: Handle, operation: &'static str) -> MetaResult<Construct> {
        let construct = handle.construct();
        let known = match construct {
            Construct::Null => true,
            Construct::Type(ty) => (ty.raw() as usize) < self.unit.pool().len(),
            Construct::Value(id) => self.unit.values().contains(id),
            Construct::Object(id) => self.unit.objects().contains(id),
            Construct::MemberDescription(id) => self.unit.descs().contains(id),
            other => other.decl().is_some_and(|id| self.unit.contains(id)),
        };
        if known {
            Ok(construct)
        } else {
            Err(MetaError::not_constant(operation, Precondition::ForeignHandle))
        }
    }

    /// Decode a non-null handle.
    pub(crate) fn decode_non_null(
        &self,
        handle: Handle,
        operation: &'static str,
    ) -> MetaResult<Construct> {
        match self.decode(handle, operation)? {
            Construct::Null => Err(MetaError::not_constant(
                operation,
                Precondition::NullReflection,
            )),
            construct => Ok(construct),
        }
    }

    /// The type a handle denotes, looking through typedef-names.
    pub(crate) fn expect_type(&self, handle: Handle, operation: &'static str) -> MetaResult<Idx> {
        match self.decode_non_null(handle, operation)? {
            Construct::Type(ty) => Ok(ty),
            Construct::TypeAlias(id) => match &self.unit.decl(id).kind {
                DeclKind::TypeAlias(alias) => Ok(alias.target),
                _ => Err(MetaError::Internal(format!(
                    "alias handle names a {}",
                    self.unit.decl(id).kind.describe()
                ))),
            },
            other => Err(wrong_kind(operation, "type", other)),
        }
    }

    /// The class declaration a type handle denotes.
    pub(crate) fn expect_class(
        &self,
        handle: Handle,
        operation: &'static str,
    ) -> MetaResult<DeclId> {
        let ty = self.expect_type(handle, operation)?;
        self.unit
            .class_of_type(ty)
            .ok_or_else(|| MetaError::not_constant(operation, Precondition::WrongKind {
                expected: "class type",
                found: "non-class type",
            }))
    }

    /// Handle for a declaration, or `None` for declarations that cannot be
    /// reflected.
    pub(crate) fn handle_for_decl(&self, id: DeclId) -> Option<Handle> {
        let construct = match &self.unit.decl(id).kind {
            DeclKind::Namespace(_) => Construct::Namespace(id),
            DeclKind::NamespaceAlias { .. } => Construct::NamespaceAlias(id),
            DeclKind::Class(class) => Construct::Type(class.ty),
            DeclKind::Enum(en) => Construct::Type(en.ty),
            DeclKind::Enumerator { .. } => Construct::Enumerator(id),
            DeclKind::TypeAlias(_) => Construct::TypeAlias(id),
            DeclKind::Variable(_) => Construct::Variable(id),
            DeclKind::StructuredBinding { .. } => Construct::StructuredBinding(id),
            DeclKind::Field(_) => Construct::DataMember(id),
            DeclKind::Base(_) => Construct::Base(id),
            DeclKind::Function(_) => Construct::Function(id),
            DeclKind::Template(_) => Construct::Template(id),
            DeclKind::StaticAssert
            | DeclKind::Friend { .. }
            | DeclKind::InjectedClassName { .. }
            | DeclKind::PartialSpecialization { .. } => return None,
        };
        Some(Handle::new(construct))
    }

    /// Plain-evaluation outcome for a key, for inspection.
    pub fn evaluation_record(&self, key: ExprKey) -> Option<&EvalRecord> {
        self.records.get(&key)
    }
}

impl std::fmt::Debug for Reflector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reflector")
            .field("unit", &self.unit)
            .field("frames", &self.frames.len())
            .field("injected", &self.injections.len())
            .field("errors", &self.diagnostics.error_count())
            .finish_non_exhaustive()
    }
}

/// `NotConstant` for an operand of the wrong kind.
pub(crate) fn wrong_kind(
    operation: &'static str,
    expected: &'static str,
    found: Construct,
) -> MetaError {
    match found {
        Construct::Null => MetaError::not_constant(operation, Precondition::NullReflection),
        other => MetaError::not_constant(
            operation,
            Precondition::WrongKind {
                expected,
                found: other.kind_name(),
            },
        ),
    }
}
