//! Handle equality.
//!
//! Equality is decided by a fixed chain of rules; the first rule that
//! applies to both operands decides. Because the engine canonicalizes
//! constructs when it mints handles, the chain always agrees with bitwise
//! equality of the handles. [`Reflector::compare`] runs the chain
//! explicitly so that agreement can be checked.

use crate::handle::{Construct, Handle};
use crate::tu::DeclKind;
use crate::Reflector;

/// The rule that decided a comparison.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ComparisonStep {
    /// At least one operand is null.
    Null,
    /// Both name specializations of an alias template.
    AliasSpecialization,
    /// Both are typedef-names or both are namespace aliases.
    Alias,
    Value,
    Object,
    /// Both name the same kind of declared entity.
    Entity,
    MemberDescription,
    /// The operands denote different kinds of construct.
    KindMismatch,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Comparison {
    pub equal: bool,
    pub step: ComparisonStep,
}

impl Comparison {
    fn new(equal: bool, step: ComparisonStep) -> Self {
        Comparison { equal, step }
    }
}

impl Reflector {
    /// Decide `a == b` through the equality chain.
    pub fn compare(&self, a: Handle, b: Handle) -> Comparison {
        let (Ok(lhs), Ok(rhs)) = (self.decode(a, "compare"), self.decode(b, "compare")) else {
            // Handles from another unit carry no structure to compare.
            return Comparison::new(a == b, ComparisonStep::Entity);
        };

        if lhs == Construct::Null || rhs == Construct::Null {
            return Comparison::new(lhs == rhs, ComparisonStep::Null);
        }

        if let (Construct::TypeAlias(x), Construct::TypeAlias(y)) = (lhs, rhs) {
            let spec = |id| match &self.unit.decl(id).kind {
                DeclKind::TypeAlias(alias) => alias.specialization.as_ref(),
                _ => None,
            };
            if let (Some(sx), Some(sy)) = (spec(x), spec(y)) {
                return Comparison::new(sx == sy, ComparisonStep::AliasSpecialization);
            }
        }

        match (lhs, rhs) {
            (Construct::TypeAlias(x), Construct::TypeAlias(y))
            | (Construct::NamespaceAlias(x), Construct::NamespaceAlias(y)) => {
                let (dx, dy) = (self.unit.decl(x), self.unit.decl(y));
                let target_matches = match (&dx.kind, &dy.kind) {
                    (DeclKind::TypeAlias(ax), DeclKind::TypeAlias(ay)) => {
                        ax.target == ay.target && ax.specialization == ay.specialization
                    }
                    (
                        DeclKind::NamespaceAlias { target: tx },
                        DeclKind::NamespaceAlias { target: ty },
                    ) => tx == ty,
                    _ => false,
                };
                let equal = dx.name == dy.name && dx.parent == dy.parent && target_matches;
                Comparison::new(equal, ComparisonStep::Alias)
            }
            (Construct::Value(x), Construct::Value(y)) => {
                let equal = self.unit.values().get(x) == self.unit.values().get(y);
                Comparison::new(equal, ComparisonStep::Value)
            }
            (Construct::Object(x), Construct::Object(y)) => {
                Comparison::new(x == y, ComparisonStep::Object)
            }
            (Construct::MemberDescription(x), Construct::MemberDescription(y)) => {
                let equal = self.unit.descs().get(x) == self.unit.descs().get(y);
                Comparison::new(equal, ComparisonStep::MemberDescription)
            }
            (Construct::Type(x), Construct::Type(y)) => {
                Comparison::new(x == y, ComparisonStep::Entity)
            }
            (Construct::Variable(x), Construct::Variable(y))
            | (Construct::StructuredBinding(x), Construct::StructuredBinding(y))
            | (Construct::Function(x), Construct::Function(y))
            | (Construct::Enumerator(x), Construct::Enumerator(y))
            | (Construct::DataMember(x), Construct::DataMember(y))
            | (Construct::Base(x), Construct::Base(y))
            | (Construct::Template(x), Construct::Template(y))
            | (Construct::Namespace(x), Construct::Namespace(y)) => {
                Comparison::new(x == y, ComparisonStep::Entity)
            }
            _ => Comparison::new(false, ComparisonStep::KindMismatch),
        }
    }

    /// `a == b`.
    pub fn handles_equal(&self, a: Handle, b: Handle) -> bool {
        self.compare(a, b).equal
    }
}

#[cfg(test)]
mod tests;
