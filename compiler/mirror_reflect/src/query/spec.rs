//! `data_member_spec`: synthetic descriptions of non-static data members.

use mirror_ir::Name;

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::tu::DataMemberSpec;
use crate::Reflector;

/// Options of a data member description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataMemberOptions {
    /// An identifier, or `_` for a placeholder member.
    pub name: Option<String>,
    pub alignment: Option<u64>,
    pub bit_width: Option<u64>,
    pub no_unique_address: bool,
}

impl DataMemberOptions {
    pub fn named(name: impl Into<String>) -> Self {
        DataMemberOptions {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: u64) -> Self {
        self.alignment = Some(alignment);
        self
    }

    #[must_use]
    pub fn with_bit_width(mut self, width: u64) -> Self {
        self.bit_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_no_unique_address(mut self) -> Self {
        self.no_unique_address = true;
        self
    }
}

impl Reflector {
    /// Describe a data member of type `ty`.
    ///
    /// Equal descriptions are the same handle.
    pub fn data_member_spec(
        &mut self,
        ty: Handle,
        options: &DataMemberOptions,
    ) -> MetaResult<Handle> {
        const OP: &str = "data_member_spec";
        self.tick(OP)?;
        let ty = self.expect_type(ty, OP)?;
        let invalid = |precondition| MetaError::not_constant(OP, precondition);

        let pool = self.unit.pool();
        if !pool.is_object(ty) && !pool.is_reference(ty) {
            return Err(invalid(Precondition::WrongKind {
                expected: "object or reference type",
                found: "non-object type",
            }));
        }

        let name = match options.name.as_deref() {
            Some(name) if is_identifier(name) => Some(self.unit.intern(name)),
            Some(name) => return Err(invalid(Precondition::InvalidName(name.to_owned()))),
            None => None,
        };

        if let Some(align) = options.alignment {
            if !align.is_power_of_two() {
                return Err(invalid(Precondition::InvalidAlignment(align)));
            }
        }

        match options.bit_width {
            Some(width) => {
                let pool = self.unit.pool();
                let underlying = match pool.enum_decl(ty) {
                    Some(en) => self.unit.enum_decl(en.into()).map(|e| e.underlying),
                    None => Some(ty),
                };
                let Some((bits, _)) = underlying.and_then(|t| pool.integer_shape(t)) else {
                    return Err(invalid(Precondition::InvalidBitWidth(
                        "bit-field of non-integral type",
                    )));
                };
                if options.alignment.is_some() {
                    return Err(invalid(Precondition::InvalidBitWidth(
                        "bit-field with an alignment",
                    )));
                }
                if width == 0 && name.is_some() {
                    return Err(invalid(Precondition::InvalidBitWidth(
                        "named bit-field of width zero",
                    )));
                }
                if width > u64::from(bits) {
                    return Err(invalid(Precondition::InvalidBitWidth(
                        "width exceeds the width of the type",
                    )));
                }
            }
            None if name.is_none() => return Err(invalid(Precondition::MissingName)),
            None => {}
        }

        let id = self.unit.descs.intern(DataMemberSpec {
            ty,
            name,
            align: options.alignment,
            bit_width: options.bit_width,
            no_unique_address: options.no_unique_address,
        });
        Ok(Handle::new(Construct::MemberDescription(id)))
    }
}

/// An identifier or the placeholder `_`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Whether a description's name may repeat within one class.
pub(crate) fn may_repeat(name: Option<Name>) -> bool {
    name.is_none_or(Name::is_placeholder)
}
