//! Reflections of constant values, and extraction back out of them.
//!
//! Values are interned at their cv-unqualified type, so two reflections of
//! the same value of the same type are the same handle.

use mirror_types::Idx;

use crate::errors::{MetaError, MetaResult, Precondition};
use crate::handle::{Construct, Handle};
use crate::reflector::wrong_kind;
use crate::tu::{Address, ConstValue, DeclKind, FunctionRole};
use crate::Reflector;

impl Reflector {
    /// Reflect a constant of structural type `ty`.
    ///
    /// The value must be representable in `ty`: integers must fit,
    /// floating-point values are rounded to the type, pointers must be
    /// null or address something of the pointee type.
    pub fn reflect_value(&mut self, ty: Handle, value: ConstValue) -> MetaResult<Handle> {
        const OP: &str = "reflect_value";
        self.tick(OP)?;
        let ty = self.expect_type(ty, OP)?;
        let ty = self.unit.pool().unqualified(ty);
        let value = self.convert_value(ty, value, OP)?;
        Ok(Handle::new(Construct::Value(self.unit.value(ty, value))))
    }

    /// `reflect_value` of an `int`-like integer.
    pub fn reflect_int(&mut self, ty: Idx, value: i128) -> MetaResult<Handle> {
        let ty = self.reflect_type(ty);
        self.reflect_value(ty, ConstValue::Int(value))
    }

    pub fn reflect_bool(&mut self, value: bool) -> MetaResult<Handle> {
        self.reflect_value(self.reflect_type(Idx::BOOL), ConstValue::Bool(value))
    }

    /// `reflect_value` of a floating-point value, bit-exact after rounding.
    pub fn reflect_float(&mut self, ty: Idx, value: f64) -> MetaResult<Handle> {
        let ty = self.reflect_type(ty);
        self.reflect_value(ty, ConstValue::Float(value.to_bits()))
    }

    /// `reflect_value(^^r)`: a reflection of a reflection value.
    pub fn reflect_info(&mut self, info: Handle) -> MetaResult<Handle> {
        self.decode(info, "reflect_value")?;
        self.reflect_value(self.reflect_type(Idx::INFO), ConstValue::Info(info))
    }

    /// A pointer value addressing a variable, object or function.
    pub fn reflect_address_of(&mut self, entity: Handle) -> MetaResult<Handle> {
        const OP: &str = "reflect_value";
        self.tick(OP)?;
        let (address, pointee) = match self.decode_non_null(entity, OP)? {
            Construct::Function(id) => match &self.unit.decl(id).kind {
                DeclKind::Function(f)
                    if matches!(
                        f.role,
                        FunctionRole::Free | FunctionRole::Static | FunctionRole::ExplicitObject
                    ) =>
                {
                    (Address::Function(id), f.ty)
                }
                _ => return Err(wrong_kind(OP, "non-member function", Construct::Function(id))),
            },
            Construct::Object(id) => (Address::Object(id), self.unit.objects().get(id).ty),
            Construct::Variable(_) | Construct::StructuredBinding(_) => {
                let object = self.object_of(entity)?;
                match object.construct() {
                    Construct::Object(id) => (Address::Object(id), self.unit.objects().get(id).ty),
                    other => return Err(wrong_kind(OP, "object", other)),
                }
            }
            other => return Err(wrong_kind(OP, "variable, object or function", other)),
        };
        let ty = self.unit.pool_mut().pointer(pointee);
        Ok(Handle::new(Construct::Value(
            self.unit.value(ty, ConstValue::Address(address)),
        )))
    }

    /// Check that `value` can be a constant of `ty`, and normalize it.
    fn convert_value(
        &self,
        ty: Idx,
        value: ConstValue,
        operation: &'static str,
    ) -> MetaResult<ConstValue> {
        let pool = self.unit.pool();
        let mismatch = || {
            MetaError::not_constant(
                operation,
                Precondition::TypeMismatch {
                    expected: self.unit.format_type(ty),
                    found: describe_value(value).to_owned(),
                },
            )
        };
        let integer_shape = match pool.enum_decl(ty) {
            Some(en) => {
                let underlying = self
                    .unit
                    .enum_decl(en.into())
                    .map_or(Idx::INT, |e| e.underlying);
                pool.integer_shape(underlying)
            }
            None => pool.integer_shape(ty),
        };
        match value {
            ConstValue::Bool(_) if ty == Idx::BOOL => Ok(value),
            ConstValue::Int(n) if ty != Idx::BOOL => match integer_shape {
                Some((bits, signed)) if fits(n, bits, signed) => Ok(value),
                _ => Err(mismatch()),
            },
            ConstValue::Float(bits) if pool.is_floating_point(ty) => {
                let rounded = if ty == Idx::FLOAT {
                    #[allow(clippy::cast_possible_truncation, reason = "rounding to float is the point")]
                    let narrow = f64::from_bits(bits) as f32;
                    f64::from(narrow).to_bits()
                } else {
                    bits
                };
                Ok(ConstValue::Float(rounded))
            }
            ConstValue::NullPtr if pool.is_pointer(ty) || pool.is_null_pointer(ty) => Ok(value),
            ConstValue::Address(Address::Object(id)) if pool.is_pointer(ty) => {
                let object_ty = self.unit.objects().get(id).ty;
                if pool.remove_pointer(ty) == object_ty {
                    Ok(value)
                } else {
                    Err(mismatch())
                }
            }
            ConstValue::Address(Address::Function(id)) if pool.is_pointer(ty) => {
                match &self.unit.decl(id).kind {
                    DeclKind::Function(f) if pool.remove_pointer(ty) == f.ty => Ok(value),
                    _ => Err(mismatch()),
                }
            }
            ConstValue::Info(_) if pool.is_reflection(ty) => Ok(value),
            _ => Err(mismatch()),
        }
    }

    // === Extraction ===

    /// The constant behind a value, enumerator or constant variable.
    fn extracted(&mut self, handle: Handle, operation: &'static str) -> MetaResult<ConstValue> {
        self.tick(operation)?;
        let value = self.value_of(handle)?;
        match value.construct() {
            Construct::Value(id) => Ok(self.unit.values().get(id).value),
            other => Err(wrong_kind(operation, "value", other)),
        }
    }

    pub fn extract_int(&mut self, handle: Handle) -> MetaResult<i128> {
        match self.extracted(handle, "extract")? {
            ConstValue::Int(n) => Ok(n),
            ConstValue::Bool(b) => Ok(i128::from(b)),
            other => Err(extract_mismatch("integer", other)),
        }
    }

    pub fn extract_bool(&mut self, handle: Handle) -> MetaResult<bool> {
        match self.extracted(handle, "extract")? {
            ConstValue::Bool(b) => Ok(b),
            other => Err(extract_mismatch("bool", other)),
        }
    }

    pub fn extract_float(&mut self, handle: Handle) -> MetaResult<f64> {
        match self.extracted(handle, "extract")? {
            ConstValue::Float(bits) => Ok(f64::from_bits(bits)),
            other => Err(extract_mismatch("floating-point", other)),
        }
    }

    pub fn extract_info(&mut self, handle: Handle) -> MetaResult<Handle> {
        match self.extracted(handle, "extract")? {
            ConstValue::Info(info) => Ok(info),
            other => Err(extract_mismatch("std::meta::info", other)),
        }
    }
}

/// Whether `n` is representable in an integer of `bits` bits.
pub(crate) fn fits(n: i128, bits: u32, signed: bool) -> bool {
    if signed {
        let min = -(1i128 << (bits - 1));
        let max = (1i128 << (bits - 1)) - 1;
        (min..=max).contains(&n)
    } else {
        n >= 0 && n < (1i128 << bits)
    }
}

fn describe_value(value: ConstValue) -> &'static str {
    match value {
        ConstValue::Int(_) => "integer",
        ConstValue::Bool(_) => "bool",
        ConstValue::Float(_) => "floating-point",
        ConstValue::NullPtr => "null pointer",
        ConstValue::Address(_) => "address",
        ConstValue::Info(_) => "reflection",
    }
}

fn extract_mismatch(expected: &'static str, found: ConstValue) -> MetaError {
    MetaError::not_constant(
        "extract",
        Precondition::TypeMismatch {
            expected: expected.to_owned(),
            found: describe_value(found).to_owned(),
        },
    )
}
