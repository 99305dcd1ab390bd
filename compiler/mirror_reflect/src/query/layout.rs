//! Layout queries: `offset_of`, `size_of`, `alignment_of`, `bit_size_of`.
//!
//! Offsets are reported as whole bytes plus residual bits in `0..8`. A
//! non-static data member of reference type occupies the storage of the
//! corresponding pointer type.

use mirror_types::{Idx, Layout, TargetLayout};

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::reflector::wrong_kind;
use crate::tu::{DeclId, DeclKind, LayoutError, RecordLayout};
use crate::Reflector;

/// Position of a subobject within its enclosing object.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct MemberOffset {
    pub bytes: u64,
    /// Residual bits, always less than 8.
    pub bits: u64,
}

impl MemberOffset {
    pub fn from_bits(total: u64) -> Self {
        MemberOffset {
            bytes: total / TargetLayout::CHAR_BIT,
            bits: total % TargetLayout::CHAR_BIT,
        }
    }

    /// Offset in bits, if it fits in a `u64`.
    pub fn total_bits(self) -> Option<u64> {
        self.bytes
            .checked_mul(TargetLayout::CHAR_BIT)?
            .checked_add(self.bits)
    }
}

impl Reflector {
    /// Offset of a non-static data member or base-specifier in its class.
    pub fn offset_of(&mut self, handle: Handle) -> MetaResult<MemberOffset> {
        const OP: &str = "offset_of";
        self.tick(OP)?;
        match self.decode_non_null(handle, OP)? {
            Construct::DataMember(id) => {
                let class = self.enclosing_complete_class(id, OP)?;
                let bits = self.class_layout(class, OP, |layout| layout.fields.get(&id).copied())?;
                Ok(MemberOffset::from_bits(bits))
            }
            Construct::Base(id) => {
                let class = self.enclosing_complete_class(id, OP)?;
                let bytes = self.class_layout(class, OP, |layout| layout.bases.get(&id).copied())?;
                Ok(MemberOffset { bytes, bits: 0 })
            }
            other => Err(wrong_kind(OP, "non-static data member or base", other)),
        }
    }

    /// `sizeof` of a type, or of the storage an entity or description
    /// occupies.
    pub fn size_of(&mut self, handle: Handle) -> MetaResult<u64> {
        const OP: &str = "size_of";
        self.tick(OP)?;
        Ok(self.storage_of(handle, OP)?.size)
    }

    /// `alignof` of a type, or of the storage an entity or description
    /// occupies. Explicit member alignment is honored.
    pub fn alignment_of(&mut self, handle: Handle) -> MetaResult<u64> {
        const OP: &str = "alignment_of";
        self.tick(OP)?;
        let explicit = match self.decode_non_null(handle, OP)? {
            Construct::DataMember(id) => match &self.unit.decl(id).kind {
                DeclKind::Field(field) => field.align,
                _ => None,
            },
            Construct::MemberDescription(id) => self.unit.descs().get(id).align,
            _ => None,
        };
        let natural = self.storage_of(handle, OP)?.align;
        Ok(explicit.map_or(natural, |align| align.max(natural)))
    }

    /// Size in bits; a bit-field reports its width.
    pub fn bit_size_of(&mut self, handle: Handle) -> MetaResult<u64> {
        const OP: &str = "bit_size_of";
        self.tick(OP)?;
        let width = match self.decode_non_null(handle, OP)? {
            Construct::DataMember(id) => match &self.unit.decl(id).kind {
                DeclKind::Field(field) => field.bit_width,
                _ => None,
            },
            Construct::MemberDescription(id) => self.unit.descs().get(id).bit_width,
            _ => None,
        };
        if let Some(width) = width {
            return Ok(width);
        }
        let size = self.storage_of(handle, OP)?.size;
        size.checked_mul(TargetLayout::CHAR_BIT).ok_or_else(|| {
            MetaError::not_constant(OP, Precondition::TooLarge(self.display_string_of(handle)))
        })
    }

    /// Storage occupied by what a handle denotes.
    fn storage_of(&mut self, handle: Handle, operation: &'static str) -> MetaResult<Layout> {
        let target = self.config.target;
        let (ty, as_member) = match self.decode_non_null(handle, operation)? {
            Construct::Type(_) | Construct::TypeAlias(_) => {
                (self.expect_type(handle, operation)?, false)
            }
            Construct::DataMember(id) => match &self.unit.decl(id).kind {
                DeclKind::Field(field) if field.is_bit_field() => {
                    return Err(MetaError::not_constant(
                        operation,
                        Precondition::WrongKind {
                            expected: "non-bit-field member",
                            found: "bit-field",
                        },
                    ))
                }
                DeclKind::Field(field) => (field.ty, true),
                _ => return Err(MetaError::Internal("data member handle names no field".into())),
            },
            Construct::MemberDescription(id) => {
                let spec = *self.unit.descs().get(id);
                if spec.bit_width.is_some() {
                    return Err(MetaError::not_constant(
                        operation,
                        Precondition::WrongKind {
                            expected: "non-bit-field description",
                            found: "bit-field description",
                        },
                    ));
                }
                (spec.ty, true)
            }
            Construct::Base(id) => match &self.unit.decl(id).kind {
                DeclKind::Base(base) => (base.ty, false),
                _ => return Err(MetaError::Internal("base handle names no base".into())),
            },
            Construct::Variable(_)
            | Construct::StructuredBinding(_)
            | Construct::Object(_)
            | Construct::Value(_) => {
                let ty_handle = self.type_of(handle)?;
                (self.expect_type(ty_handle, operation)?, false)
            }
            other => return Err(wrong_kind(operation, "type or typed entity", other)),
        };

        if !self.unit.pool().is_reference(ty) {
            self.require_complete_type(ty, operation)?;
        } else {
            let referee = self.unit.pool().referee(ty);
            if !as_member {
                self.require_complete_type(referee, operation)?;
            }
        }
        let result = if as_member {
            self.unit.member_layout(ty, &target)
        } else {
            self.unit.type_layout(ty, &target)
        };
        result.map_err(|err| self.layout_failure(err, ty, operation))
    }

    /// Read one placement out of the layout of `class`.
    fn class_layout(
        &mut self,
        class: DeclId,
        operation: &'static str,
        read: impl FnOnce(&RecordLayout) -> Option<u64>,
    ) -> MetaResult<u64> {
        let target = self.config.target;
        let ty = self.unit.class_type(class);
        let placement = match self.unit.record_layout(class, &target) {
            Ok(layout) => read(layout),
            Err(err) => return Err(self.layout_failure(err, ty, operation)),
        };
        placement.ok_or_else(|| MetaError::Internal("subobject missing from its class layout".into()))
    }

    /// The class declaring member `id`, complete in the current context.
    fn enclosing_complete_class(
        &mut self,
        id: DeclId,
        operation: &'static str,
    ) -> MetaResult<DeclId> {
        let parent = self.unit.decl(id).parent.ok_or_else(|| {
            MetaError::not_constant(operation, Precondition::NoParent(self.unit.qualified_name(id)))
        })?;
        let ty = self.unit.class_type(parent);
        self.require_complete_type(ty, operation)?;
        Ok(parent)
    }

    fn layout_failure(&self, err: LayoutError, ty: Idx, operation: &'static str) -> MetaError {
        tracing::trace!(ty = %self.unit.format_type(ty), ?err, "layout unavailable");
        let precondition = match err {
            LayoutError::Incomplete(class) | LayoutError::Recursive(class) => {
                Precondition::IncompleteType(self.unit.qualified_name(class))
            }
            LayoutError::Unsized(inner) => {
                Precondition::IncompleteType(self.unit.format_type(inner))
            }
            LayoutError::TooLarge(inner) => Precondition::TooLarge(self.unit.format_type(inner)),
        };
        MetaError::not_constant(operation, precondition)
    }
}
