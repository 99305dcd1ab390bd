//! Evaluation of manifestly constant-evaluated expressions.
//!
//! Each call to [`Reflector::evaluate`] runs one expression in a fresh
//! frame that moves through `Evaluating -> Produced -> Sequenced`:
//!
//! - only plainly constant-evaluated expressions (static assertions,
//!   `constexpr`/`constinit` initializers) may inject declarations, since
//!   only they are guaranteed to run once and in lexical order
//! - a plain expression runs at most once; asking again returns the
//!   memoized outcome
//! - a nested evaluation sees its parent's context, and once sequenced its
//!   injected points become visible to the rest of the parent
//!
//! Other manifestly constant-evaluated expressions may be retried, so they
//! must stay free of irreversible effects.

mod context;

pub use context::{EvaluationContext, InjectedDecl, InjectionGraph};

use mirror_diagnostic::{Diagnostic, ErrorCode};
use mirror_ir::Span;
use smallvec::SmallVec;

use crate::errors::{EvalFailure, IllFormed, MetaError, MetaResult};
use crate::stack::ensure_sufficient_stack;
use crate::tu::{InjectedPoint, ProgramPoint};
use crate::Reflector;

/// Identity of one manifestly constant-evaluated expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprKey(u32);

impl ExprKey {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Contexts that evaluate exactly once, in lexical order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PlainSite {
    StaticAssert,
    ConstexprInitializer,
    ConstinitInitializer,
}

/// Contexts that require a constant but may be evaluated speculatively.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ManifestSite {
    /// Initializer of a `const` (not `constexpr`) variable.
    ConstInitializer,
    TemplateArgument,
    ArrayBound,
    IfConstexprCondition,
    /// Trial evaluation, e.g. while checking whether an initializer is
    /// constant.
    Trial,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EvalKind {
    Plain(PlainSite),
    Manifest(ManifestSite),
}

impl EvalKind {
    pub fn is_plain(self) -> bool {
        matches!(self, EvalKind::Plain(_))
    }

    pub fn describe(self) -> &'static str {
        match self {
            EvalKind::Plain(PlainSite::StaticAssert) => "static assertion",
            EvalKind::Plain(PlainSite::ConstexprInitializer) => "constexpr initializer",
            EvalKind::Plain(PlainSite::ConstinitInitializer) => "constinit initializer",
            EvalKind::Manifest(ManifestSite::ConstInitializer) => "const initializer",
            EvalKind::Manifest(ManifestSite::TemplateArgument) => "template argument",
            EvalKind::Manifest(ManifestSite::ArrayBound) => "array bound",
            EvalKind::Manifest(ManifestSite::IfConstexprCondition) => "if constexpr condition",
            EvalKind::Manifest(ManifestSite::Trial) => "trial evaluation",
        }
    }
}

/// Where and how an expression is evaluated.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct EvalSite {
    pub key: ExprKey,
    pub kind: EvalKind,
    /// Lexical point of the expression.
    pub point: ProgramPoint,
    pub span: Span,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EvalState {
    Evaluating,
    /// At least one declaration was injected.
    Produced,
    /// Finished; injected points are published.
    Sequenced,
}

/// An in-flight evaluation.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    pub site: EvalSite,
    pub context: EvaluationContext,
    pub state: EvalState,
    pub produced: SmallVec<[InjectedPoint; 2]>,
}

/// What a finished evaluation left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalRecord {
    pub kind: EvalKind,
    pub state: EvalState,
    pub produced: SmallVec<[InjectedPoint; 2]>,
    pub succeeded: bool,
}

impl Reflector {
    /// Allocate a site for an expression at the current lexical position.
    pub fn site(&mut self, kind: EvalKind, span: Span) -> EvalSite {
        let key = ExprKey(self.next_key);
        self.next_key = self.next_key.saturating_add(1);
        let point = self.unit.advance();
        EvalSite {
            key,
            kind,
            point,
            span,
        }
    }

    /// Evaluate the expression at `site` by running `f`.
    #[tracing::instrument(level = "debug", skip_all, fields(key = site.key.raw(), kind = site.kind.describe()))]
    pub fn evaluate<T: Clone + 'static>(
        &mut self,
        site: &EvalSite,
        f: impl FnOnce(&mut Reflector) -> MetaResult<T>,
    ) -> Result<T, EvalFailure> {
        if site.kind.is_plain() {
            let memoized = self.plain_memo.get(&site.key).map(|outcome| match outcome {
                Ok(value) => value.downcast_ref::<T>().cloned().ok_or(None),
                Err(failure) => Err(Some(failure.clone())),
            });
            if let Some(memoized) = memoized {
                tracing::debug!("plain evaluation already sequenced");
                return memoized.map_err(|failure| match failure {
                    Some(failure) => failure,
                    None => self.fail(
                        site,
                        MetaError::Internal("plain result requested at another type".into()),
                    ),
                });
            }
            if self.frames.is_empty() && self.last_plain.is_some_and(|last| site.point < last) {
                let failure = self.fail(site, IllFormed::OutOfOrderEvaluation.into());
                self.plain_memo.insert(site.key, Err(failure.clone()));
                return Err(failure);
            }
        }

        let result = self.run_frame(site, f);

        let outcome = result.map_err(|err| self.fail(site, err));
        if site.kind.is_plain() {
            if self.frames.is_empty() {
                self.last_plain = Some(site.point);
            }
            let memo = match &outcome {
                Ok(value) => Ok(Box::new(value.clone()) as Box<dyn std::any::Any>),
                Err(failure) => Err(failure.clone()),
            };
            self.plain_memo.insert(site.key, memo);
        }
        outcome
    }

    fn run_frame<T>(
        &mut self,
        site: &EvalSite,
        f: impl FnOnce(&mut Reflector) -> MetaResult<T>,
    ) -> MetaResult<T> {
        self.check_depth("evaluate")?;
        let context = match self.frames.last() {
            Some(parent) => parent.context.clone(),
            None => {
                self.calls = 0;
                EvaluationContext::at(site.point)
            }
        };
        self.frames.push(Frame {
            site: *site,
            context,
            state: EvalState::Evaluating,
            produced: SmallVec::new(),
        });

        let result = ensure_sufficient_stack(|| f(self));

        let Some(mut frame) = self.frames.pop() else {
            return Err(MetaError::Internal("evaluation frame missing".into()));
        };
        if frame.site.key != site.key {
            return Err(MetaError::Internal("evaluation frames out of balance".into()));
        }
        frame.state = EvalState::Sequenced;
        if let Some(parent) = self.frames.last_mut() {
            for &point in &frame.produced {
                parent.context.add(point);
            }
        }
        tracing::debug!(
            produced = frame.produced.len(),
            ok = result.is_ok(),
            "evaluation sequenced"
        );
        self.records.insert(
            site.key,
            EvalRecord {
                kind: site.kind,
                state: frame.state,
                produced: frame.produced,
                succeeded: result.is_ok(),
            },
        );
        result
    }

    /// Turn an error into the failure of the evaluation at `site`.
    fn fail(&mut self, site: &EvalSite, err: MetaError) -> EvalFailure {
        tracing::debug!(error = %err, "evaluation failed");
        let plain = site.kind.is_plain();
        match err {
            MetaError::Diagnosed(proof) if plain => EvalFailure::Fatal(proof),
            MetaError::Diagnosed(proof) => EvalFailure::IllFormed(proof),
            MetaError::NotConstant { .. } if plain => {
                let diag = Diagnostic::error(ErrorCode::E6002)
                    .with_message(format!("{} is not a constant expression", site.kind.describe()))
                    .with_label(site.span, "evaluated here")
                    .with_note(err.to_string());
                EvalFailure::Fatal(self.diagnostics.emit_error(diag))
            }
            MetaError::NotConstant { .. } => {
                EvalFailure::NotConstant(Box::new(err.to_diagnostic(site.span)))
            }
            MetaError::IllFormed(_) | MetaError::Internal(_) => {
                let proof = self.diagnostics.emit_error(err.to_diagnostic(site.span));
                if plain {
                    EvalFailure::Fatal(proof)
                } else {
                    EvalFailure::IllFormed(proof)
                }
            }
        }
    }

    /// Record a declaration injected by the innermost evaluation.
    ///
    /// Fails unless that evaluation is plainly constant-evaluated.
    pub(crate) fn begin_injection(&self) -> MetaResult<&Frame> {
        match self.frames.last() {
            Some(frame) => match frame.site.kind {
                EvalKind::Plain(_) => Ok(frame),
                kind @ EvalKind::Manifest(_) => Err(IllFormed::NonPlainInjection {
                    site: kind.describe(),
                }
                .into()),
            },
            None => Err(IllFormed::NonPlainInjection {
                site: "non-constant context",
            }
            .into()),
        }
    }

    pub(crate) fn publish_injection(&mut self, point: InjectedPoint) -> MetaResult<()> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(MetaError::Internal("injection outside an evaluation".into()));
        };
        frame.state = EvalState::Produced;
        frame.produced.push(point);
        frame.context.add(point);
        Ok(())
    }

    /// Budget shared by the outermost evaluation, for callers that loop.
    pub fn remaining_budget(&self) -> u32 {
        self.config.eval_budget.saturating_sub(self.calls)
    }
}

#[cfg(test)]
mod tests;
