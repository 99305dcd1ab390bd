//! Evaluation contexts and the injection graph.
//!
//! An [`EvaluationContext`] is the set of program points a query may see:
//! everything lexically before its point, plus the injected points that
//! earlier evaluations in the same outermost evaluation produced. The
//! [`InjectionGraph`] is the add-only record of which evaluation produced
//! which injected declaration.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::tu::{DeclId, InjectedPoint, ProgramPoint};

/// Visibility for a query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    point: ProgramPoint,
    injected: SmallVec<[InjectedPoint; 4]>,
}

impl EvaluationContext {
    /// Context of an evaluation at `point` that has produced nothing yet.
    pub fn at(point: ProgramPoint) -> Self {
        EvaluationContext {
            point,
            injected: SmallVec::new(),
        }
    }

    #[inline]
    pub fn point(&self) -> ProgramPoint {
        self.point
    }

    pub fn injected(&self) -> &[InjectedPoint] {
        &self.injected
    }

    pub fn contains(&self, injected: InjectedPoint) -> bool {
        self.injected.contains(&injected)
    }

    /// Whether something at lexical point `at`, optionally carrying an
    /// injected point, is reachable from this context.
    pub fn reaches(&self, at: ProgramPoint, injected: Option<InjectedPoint>) -> bool {
        at.precedes(self.point) || injected.is_some_and(|point| self.contains(point))
    }

    /// Grow the context. Contexts never shrink.
    pub(crate) fn add(&mut self, injected: InjectedPoint) {
        if !self.contains(injected) {
            self.injected.push(injected);
        }
    }
}

/// One declaration produced by evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InjectedDecl {
    /// The completed entity.
    pub target: DeclId,
    /// Lexical point of the declaration; everything after it reaches it.
    pub locus: ProgramPoint,
    /// Point of the plainly constant-evaluated expression that produced it.
    pub site: ProgramPoint,
}

/// Add-only edges from producing expressions to injected declarations.
#[derive(Clone, Debug, Default)]
pub struct InjectionGraph {
    decls: Vec<InjectedDecl>,
    by_site: FxHashMap<ProgramPoint, SmallVec<[InjectedPoint; 2]>>,
}

impl InjectionGraph {
    /// Allocate the injected point for a new declaration.
    pub(crate) fn record(&mut self, decl: InjectedDecl) -> InjectedPoint {
        let point = InjectedPoint::from_len(self.decls.len());
        self.decls.push(decl);
        self.by_site.entry(decl.site).or_default().push(point);
        point
    }

    pub fn get(&self, point: InjectedPoint) -> Option<&InjectedDecl> {
        self.decls.get(point.index())
    }

    /// Injected points produced by the expression at `site`.
    pub fn produced_at(&self, site: ProgramPoint) -> &[InjectedPoint] {
        self.by_site.get(&site).map_or(&[], |points| points.as_slice())
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
