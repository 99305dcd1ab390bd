//! Configuration for a reflection session.

use mirror_types::TargetLayout;

/// How a defaulted `operator==` treats a non-static data member of
/// reference type.
///
/// The rule is unsettled; `Deleted` is the conservative choice and the
/// other policies exist so callers can opt in once it is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferenceMemberPolicy {
    /// The defaulted comparison is defined as deleted.
    #[default]
    Deleted,
    /// References compare by the identity of the referred-to object.
    CompareIdentity,
    /// References compare the referred-to values.
    CompareThrough,
}

/// Limits and target description for a [`Reflector`](crate::Reflector).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectConfig {
    /// Data model used by layout queries.
    pub target: TargetLayout,
    /// Maximum metafunction calls per outermost evaluation.
    pub eval_budget: u32,
    /// Maximum nesting of evaluations and instantiations.
    pub max_depth: usize,
    pub reference_member_comparison: ReferenceMemberPolicy,
}

impl ReflectConfig {
    pub const DEFAULT_BUDGET: u32 = 1_000_000;
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    #[must_use]
    pub fn with_target(mut self, target: TargetLayout) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_eval_budget(mut self, budget: u32) -> Self {
        self.eval_budget = budget;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_reference_member_comparison(mut self, policy: ReferenceMemberPolicy) -> Self {
        self.reference_member_comparison = policy;
        self
    }
}

impl Default for ReflectConfig {
    fn default() -> Self {
        ReflectConfig {
            target: TargetLayout::LP64,
            eval_budget: Self::DEFAULT_BUDGET,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            reference_member_comparison: ReferenceMemberPolicy::Deleted,
        }
    }
}
