//! Defaulted `operator==` over classes with reference members.
//!
//! Whether a defaulted equality comparison may look at a reference member
//! is configurable through [`ReferenceMemberPolicy`]; the default deletes
//! the operator.

use crate::config::ReferenceMemberPolicy;
use crate::errors::MetaResult;
use crate::handle::{Construct, Handle};
use crate::tu::DeclKind;
use crate::Reflector;

/// How a defaulted equality compares one subobject.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberComparison {
    /// Compare values.
    Value(Handle),
    /// Compare the addresses of the referred-to objects.
    Identity(Handle),
}

/// What a defaulted `operator==` for a class would do.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum DefaultedEquality {
    /// Defined as deleted because of `member`.
    Deleted { member: Handle },
    /// Compares bases, then members, in declaration order.
    Memberwise(Vec<MemberComparison>),
}

impl Reflector {
    /// Classify the defaulted equality operator of a complete class.
    pub fn defaulted_equality(&mut self, class: Handle) -> MetaResult<DefaultedEquality> {
        const OP: &str = "defaulted_equality";
        self.tick(OP)?;
        let class = self.complete_class(class, OP)?;
        let policy = self.config.reference_member_comparison;

        let mut plan = Vec::new();
        for (base, _, _) in self.base_classes(class) {
            let base_ty = self.reflect_type(self.unit.class_type(base));
            if let DefaultedEquality::Deleted { member } = self.defaulted_equality(base_ty)? {
                return Ok(DefaultedEquality::Deleted { member });
            }
            plan.push(MemberComparison::Value(base_ty));
        }

        let fields: Vec<_> = self.fields_of(class).collect();
        for field in fields {
            let DeclKind::Field(decl) = &self.unit.decl(field).kind else {
                continue;
            };
            let (ty, unnamed) = (decl.ty, self.unit.decl(field).name.is_empty());
            if unnamed {
                continue;
            }
            let member = Handle::new(Construct::DataMember(field));
            if self.unit.pool().is_reference(ty) {
                match policy {
                    ReferenceMemberPolicy::Deleted => {
                        tracing::debug!(
                            member = %self.unit.qualified_name(field),
                            "defaulted equality deleted by reference member"
                        );
                        return Ok(DefaultedEquality::Deleted { member });
                    }
                    ReferenceMemberPolicy::CompareIdentity => {
                        plan.push(MemberComparison::Identity(member));
                    }
                    ReferenceMemberPolicy::CompareThrough => {
                        plan.push(MemberComparison::Value(member));
                    }
                }
                continue;
            }
            let elem = self.unit.pool().remove_all_extents(ty);
            if self.unit.class_of_type(elem).is_some() {
                let nested = self.reflect_type(self.unit.pool().unqualified(elem));
                if let DefaultedEquality::Deleted { .. } = self.defaulted_equality(nested)? {
                    return Ok(DefaultedEquality::Deleted { member });
                }
            }
            plan.push(MemberComparison::Value(member));
        }
        Ok(DefaultedEquality::Memberwise(plan))
    }
}
