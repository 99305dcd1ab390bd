//! Metafunctions as ordinary, non-constant library calls.
//!
//! A runtime call on a malformed handle has unspecified behavior, which
//! here means a harmless default: an empty list, an empty string, zero,
//! `false` or the null handle. Nothing panics. Each degraded call is
//! logged and leaves an `E2099` warning behind.

use mirror_diagnostic::{Diagnostic, ErrorCode};

use crate::errors::{MetaError, MetaResult};
use crate::handle::Handle;
use crate::query::MemberOffset;
use crate::Reflector;

/// Non-failing view over a [`Reflector`].
pub struct RuntimeView<'a> {
    reflector: &'a mut Reflector,
}

impl Reflector {
    /// Metafunctions for non-constant callers.
    pub fn runtime(&mut self) -> RuntimeView<'_> {
        RuntimeView { reflector: self }
    }
}

impl RuntimeView<'_> {
    fn degrade<T>(&mut self, operation: &'static str, result: MetaResult<T>, default: T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.report(operation, &err);
                default
            }
        }
    }

    fn report(&mut self, operation: &'static str, err: &MetaError) {
        tracing::warn!(operation, error = %err, "runtime metafunction call degraded");
        self.reflector.diagnostics.emit(
            Diagnostic::warning(ErrorCode::E2099)
                .with_message(format!("`{operation}` called at runtime with an invalid operand"))
                .with_operation(operation)
                .with_note(err.to_string()),
        );
    }

    pub fn members_of(&mut self, handle: Handle) -> Vec<Handle> {
        let result = self.reflector.members_of(handle);
        self.degrade("members_of", result, Vec::new())
    }

    pub fn nonstatic_data_members_of(&mut self, handle: Handle) -> Vec<Handle> {
        let result = self.reflector.nonstatic_data_members_of(handle);
        self.degrade("nonstatic_data_members_of", result, Vec::new())
    }

    pub fn identifier_of(&mut self, handle: Handle) -> String {
        let result = self.reflector.identifier_of(handle).map(str::to_owned);
        self.degrade("identifier_of", result, String::new())
    }

    pub fn has_identifier(&mut self, handle: Handle) -> bool {
        let result = self.reflector.has_identifier(handle);
        self.degrade("has_identifier", result, false)
    }

    /// Never degrades; the display string of anything is defined.
    pub fn display_string_of(&self, handle: Handle) -> String {
        self.reflector.display_string_of(handle)
    }

    pub fn type_of(&mut self, handle: Handle) -> Handle {
        let result = self.reflector.type_of(handle);
        self.degrade("type_of", result, Handle::NULL)
    }

    pub fn parent_of(&mut self, handle: Handle) -> Handle {
        let result = self.reflector.parent_of(handle);
        self.degrade("parent_of", result, Handle::NULL)
    }

    pub fn dealias(&mut self, handle: Handle) -> Handle {
        let result = self.reflector.dealias(handle);
        self.degrade("dealias", result, Handle::NULL)
    }

    pub fn size_of(&mut self, handle: Handle) -> u64 {
        let result = self.reflector.size_of(handle);
        self.degrade("size_of", result, 0)
    }

    pub fn offset_of(&mut self, handle: Handle) -> MemberOffset {
        let result = self.reflector.offset_of(handle);
        self.degrade("offset_of", result, MemberOffset::default())
    }

    pub fn is_complete_type(&mut self, handle: Handle) -> bool {
        let result = self.reflector.is_complete_type(handle);
        self.degrade("is_complete_type", result, false)
    }

    pub fn can_substitute(&mut self, template: Handle, args: &[Handle]) -> bool {
        let result = self.reflector.can_substitute(template, args);
        self.degrade("can_substitute", result, false)
    }

    pub fn substitute(&mut self, template: Handle, args: &[Handle]) -> Handle {
        let result = self.reflector.substitute(template, args);
        self.degrade("substitute", result, Handle::NULL)
    }

    pub fn extract_int(&mut self, handle: Handle) -> i128 {
        let result = self.reflector.extract_int(handle);
        self.degrade("extract_int", result, 0)
    }
}

#[cfg(test)]
mod tests;
