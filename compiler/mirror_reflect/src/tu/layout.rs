//! Class layout in the Itanium style.
//!
//! Bit-fields are packed into storage units of their declared type and
//! start a new unit rather than straddle an alignment boundary. A
//! reference member occupies the storage of the corresponding pointer.

use mirror_types::{Idx, Layout, LayoutClass, TargetLayout};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::{DeclId, DeclKind, TranslationUnit};
use crate::stack::ensure_sufficient_stack;

/// Why a layout could not be computed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The class has no definition yet.
    Incomplete(DeclId),
    /// The type has no size (`void`, functions, arrays of unknown bound).
    Unsized(Idx),
    /// The class contains itself by value.
    Recursive(DeclId),
    /// The object has more bits than a `u64` can count.
    TooLarge(Idx),
}

/// Placement of every subobject of a complete class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordLayout {
    pub size: u64,
    pub align: u64,
    /// Offset of each non-static data member, in bits.
    pub fields: FxHashMap<DeclId, u64>,
    /// Offset of each base-specifier's subobject, in bytes.
    pub bases: FxHashMap<DeclId, u64>,
    /// Whether the class carries its own vtable pointer at offset 0.
    pub has_vptr: bool,
    /// No data, no vtable pointer and only empty bases.
    pub is_empty: bool,
}

impl RecordLayout {
    pub fn layout(&self) -> Layout {
        Layout::new(self.size, self.align)
    }
}

fn round_up(value: u64, align: u64) -> Option<u64> {
    if align <= 1 {
        Some(value)
    } else {
        value.div_ceil(align).checked_mul(align)
    }
}

/// Bit count of `bytes`, for sizes whose offsets are tracked in bits.
fn to_bits(bytes: u64) -> Option<u64> {
    bytes.checked_mul(8)
}

type Active = SmallVec<[DeclId; 8]>;

impl TranslationUnit {
    /// Layout of a complete class, computed once.
    pub fn record_layout(
        &mut self,
        class: DeclId,
        target: &TargetLayout,
    ) -> Result<&RecordLayout, LayoutError> {
        let mut active = Active::new();
        self.record_layout_in(class, target, &mut active)?;
        self.layouts.get(&class).ok_or(LayoutError::Incomplete(class))
    }

    /// `sizeof`/`alignof` of a type; a reference reports its referee.
    pub fn type_layout(&mut self, ty: Idx, target: &TargetLayout) -> Result<Layout, LayoutError> {
        let mut active = Active::new();
        self.type_layout_in(ty, target, &mut active, false)
    }

    /// Storage a data member of type `ty` occupies; a reference occupies a
    /// pointer.
    pub fn member_layout(
        &mut self,
        ty: Idx,
        target: &TargetLayout,
    ) -> Result<Layout, LayoutError> {
        let mut active = Active::new();
        self.type_layout_in(ty, target, &mut active, true)
    }

    fn record_layout_in(
        &mut self,
        class: DeclId,
        target: &TargetLayout,
        active: &mut Active,
    ) -> Result<(), LayoutError> {
        if self.layouts.contains_key(&class) {
            return Ok(());
        }
        if active.contains(&class) {
            return Err(LayoutError::Recursive(class));
        }
        active.push(class);
        let layout = ensure_sufficient_stack(|| self.compute_layout(class, target, active));
        active.pop();
        tracing::trace!(class = class.raw(), size = ?layout.as_ref().map(|l| l.size), "record layout");
        self.layouts.insert(class, layout?);
        Ok(())
    }

    fn type_layout_in(
        &mut self,
        ty: Idx,
        target: &TargetLayout,
        active: &mut Active,
        reference_as_pointer: bool,
    ) -> Result<Layout, LayoutError> {
        match self.pool.layout_class(ty, target) {
            LayoutClass::Scalar(layout) => Ok(layout),
            LayoutClass::Reference(_) if reference_as_pointer => Ok(target.pointer),
            LayoutClass::Reference(inner) => self.type_layout_in(inner, target, active, false),
            LayoutClass::Record(decl) => {
                let class = DeclId::from(decl);
                self.record_layout_in(class, target, active)?;
                self.layouts
                    .get(&class)
                    .map(RecordLayout::layout)
                    .ok_or(LayoutError::Incomplete(class))
            }
            LayoutClass::Enum(decl) => {
                let underlying = self
                    .enum_decl(decl.into())
                    .map_or(Idx::INT, |en| en.underlying);
                self.type_layout_in(underlying, target, active, false)
            }
            LayoutClass::Array { elem, len } => {
                let elem_layout = self.type_layout_in(elem, target, active, false)?;
                elem_layout
                    .repeat(len)
                    .filter(|layout| to_bits(layout.size).is_some())
                    .ok_or(LayoutError::TooLarge(ty))
            }
            LayoutClass::Unsized => Err(LayoutError::Unsized(ty)),
        }
    }

    /// Whether objects of the class carry a vtable pointer somewhere.
    pub fn is_dynamic_class(&self, class: DeclId) -> bool {
        let Some(decl) = self.class_decl(class) else {
            return false;
        };
        let virtual_member = decl.members.iter().any(|&m| {
            matches!(&self.decl(m).kind, DeclKind::Function(f) if f.is_virtual)
        });
        virtual_member
            || decl.bases.iter().any(|&b| match &self.decl(b).kind {
                DeclKind::Base(base) => {
                    base.is_virtual
                        || self
                            .class_of_type(base.ty)
                            .is_some_and(|c| self.is_dynamic_class(c))
                }
                _ => false,
            })
    }

    fn compute_layout(
        &mut self,
        class: DeclId,
        target: &TargetLayout,
        active: &mut Active,
    ) -> Result<RecordLayout, LayoutError> {
        let Some(decl) = self.class_decl(class) else {
            return Err(LayoutError::Incomplete(class));
        };
        if decl.state == super::Completion::Incomplete {
            return Err(LayoutError::Incomplete(class));
        }
        let is_union = decl.is_union();
        let bases = decl.bases.clone();
        let members = decl.members.clone();
        let dynamic = self.is_dynamic_class(class);
        let too_large = LayoutError::TooLarge(self.class_type(class));
        let bits_of = |bytes: u64| to_bits(bytes).ok_or(too_large);
        // Next byte offset at or after `bits` with the given alignment.
        let place = |bits: u64, align: u64| round_up(bits.div_ceil(8), align).ok_or(too_large);
        let end_of = |offset: u64, size: u64| {
            offset.checked_add(size).and_then(to_bits).ok_or(too_large)
        };

        let mut out = RecordLayout {
            align: 1,
            ..RecordLayout::default()
        };
        let mut bits: u64 = 0;
        let mut has_data = false;

        let mut non_virtual = Vec::new();
        let mut virtual_bases = Vec::new();
        for &base in &bases {
            if let DeclKind::Base(b) = &self.decl(base).kind {
                let base_class = self.class_of_type(b.ty).ok_or(LayoutError::Unsized(b.ty))?;
                if b.is_virtual {
                    virtual_bases.push((base, base_class));
                } else {
                    non_virtual.push((base, base_class));
                }
            }
        }

        // A dynamic non-virtual base shares its vtable pointer.
        let primary = if dynamic {
            non_virtual
                .iter()
                .copied()
                .find(|&(_, c)| self.is_dynamic_class(c))
        } else {
            None
        };
        if dynamic && primary.is_none() {
            out.has_vptr = true;
            bits = bits_of(target.pointer.size)?;
            out.align = target.pointer.align;
        }
        if let Some((base, base_class)) = primary {
            self.record_layout_in(base_class, target, active)?;
            let layout = self.layouts.get(&base_class).map(RecordLayout::layout);
            let layout = layout.ok_or(LayoutError::Incomplete(base_class))?;
            out.bases.insert(base, 0);
            bits = bits_of(layout.size)?;
            out.align = out.align.max(layout.align);
        }

        for &(base, base_class) in &non_virtual {
            if Some((base, base_class)) == primary {
                continue;
            }
            self.record_layout_in(base_class, target, active)?;
            let Some(base_layout) = self.layouts.get(&base_class) else {
                return Err(LayoutError::Incomplete(base_class));
            };
            let (size, align, empty) = (base_layout.size, base_layout.align, base_layout.is_empty);
            out.align = out.align.max(align);
            if empty {
                out.bases.insert(base, 0);
                continue;
            }
            let offset = place(bits, align)?;
            out.bases.insert(base, offset);
            bits = end_of(offset, size)?;
            has_data = true;
        }

        let mut union_size = 0;
        for &member in &members {
            let DeclKind::Field(field) = &self.decl(member).kind else {
                continue;
            };
            let field = field.clone();
            let storage = self.type_layout_in(field.ty, target, active, true)?;
            let align = field.align.map_or(storage.align, |a| a.max(storage.align));

            if is_union {
                out.fields.insert(member, 0);
                let size = match field.bit_width {
                    Some(width) => width.div_ceil(8),
                    None => storage.size,
                };
                union_size = union_size.max(size);
                out.align = out.align.max(align);
                has_data |= field.bit_width != Some(0);
                continue;
            }

            match field.bit_width {
                Some(0) => {
                    bits = round_up(bits, bits_of(storage.align)?).ok_or(too_large)?;
                    out.fields.insert(member, bits);
                }
                Some(width) => {
                    let unit = bits_of(storage.align)?;
                    let last = bits.checked_add(width - 1).ok_or(too_large)?;
                    if unit > 0 && bits / unit != last / unit {
                        bits = round_up(bits, unit).ok_or(too_large)?;
                    }
                    out.fields.insert(member, bits);
                    bits = bits.checked_add(width).ok_or(too_large)?;
                    out.align = out.align.max(align);
                    has_data = true;
                }
                None => {
                    let empty_member = field.no_unique_address
                        && self
                            .class_of_type(field.ty)
                            .and_then(|c| self.layouts.get(&c))
                            .is_some_and(|l| l.is_empty);
                    let offset = place(bits, align)?;
                    out.fields.insert(member, bits_of(offset)?);
                    out.align = out.align.max(align);
                    if !empty_member {
                        bits = end_of(offset, storage.size)?;
                        has_data = true;
                    }
                }
            }
        }

        for &(base, base_class) in &virtual_bases {
            self.record_layout_in(base_class, target, active)?;
            let Some(base_layout) = self.layouts.get(&base_class) else {
                return Err(LayoutError::Incomplete(base_class));
            };
            let (size, align) = (base_layout.size, base_layout.align);
            let offset = place(bits, align)?;
            out.bases.insert(base, offset);
            bits = end_of(offset, size)?;
            out.align = out.align.max(align);
            has_data = true;
        }

        let data_bytes = if is_union { union_size } else { bits.div_ceil(8) };
        out.is_empty = !has_data && !out.has_vptr && primary.is_none();
        out.size = round_up(data_bytes.max(1), out.align)
            .filter(|&size| to_bits(size).is_some())
            .ok_or(too_large)?;
        Ok(out)
    }
}
