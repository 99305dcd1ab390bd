//! Type spelling for `display_string_of` and diagnostics.
//!
//! Types print with declarator syntax: the spelling of a compound type is
//! built inside-out around an (empty) declarator, so pointers to arrays
//! come out as `int(*)[5]` and cv on a pointer as `int* const`.

#![allow(clippy::format_push_string)] // Display formatting prioritizes clarity over allocation

use crate::{DeclRef, Idx, Pool, TypeData};

/// Names of declared types, supplied by the owner of the declarations.
pub trait RecordNames {
    /// Qualified name of a class or enumeration declaration.
    fn decl_name(&self, decl: DeclRef) -> String;
}

/// Join a specifier and a declarator, separating words with a space.
fn attach(base: &str, declarator: &str) -> String {
    let needs_space = declarator
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');
    if declarator.is_empty() {
        base.to_owned()
    } else if needs_space {
        format!("{base} {declarator}")
    } else {
        format!("{base}{declarator}")
    }
}

impl Pool {
    /// Spell a type the way a programmer would write it.
    pub fn format_type(&self, ty: Idx, names: &dyn RecordNames) -> String {
        self.spell(ty, String::new(), names)
    }

    fn spell(&self, ty: Idx, declarator: String, names: &dyn RecordNames) -> String {
        if let Some(name) = ty.name() {
            return attach(name, &declarator);
        }
        match self.data(ty) {
            TypeData::Pointer(pointee) => {
                self.spell_pointer_like(*pointee, "*".to_owned(), declarator, names)
            }
            TypeData::LValueRef(referee) => {
                self.spell_pointer_like(*referee, "&".to_owned(), declarator, names)
            }
            TypeData::RValueRef(referee) => {
                self.spell_pointer_like(*referee, "&&".to_owned(), declarator, names)
            }
            TypeData::MemberPointer { class, pointee } => {
                let op = format!("{}::*", self.format_type(*class, names));
                self.spell_pointer_like(*pointee, op, declarator, names)
            }
            TypeData::Array { elem, len } => {
                let bound = match len {
                    Some(len) => format!("[{len}]"),
                    None => "[]".to_owned(),
                };
                self.spell(*elem, declarator + &bound, names)
            }
            TypeData::Function {
                params,
                ret,
                variadic,
            } => {
                let mut list: Vec<String> = params
                    .iter()
                    .map(|&p| self.format_type(p, names))
                    .collect();
                if *variadic {
                    list.push("...".to_owned());
                }
                let suffix = format!("({})", list.join(", "));
                self.spell(*ret, declarator + &suffix, names)
            }
            TypeData::Qualified { inner, quals } => {
                if self.is_pointer_like(*inner) {
                    self.spell(*inner, attach(quals.spelling(), &declarator), names)
                } else {
                    let base = format!("{} {}", quals.spelling(), self.format_type(*inner, names));
                    attach(&base, &declarator)
                }
            }
            TypeData::Record(decl) | TypeData::Enum(decl) => {
                attach(&names.decl_name(*decl), &declarator)
            }
            // Fundamental types were spelled above.
            _ => attach("<unknown>", &declarator),
        }
    }

    fn spell_pointer_like(
        &self,
        inner: Idx,
        op: String,
        declarator: String,
        names: &dyn RecordNames,
    ) -> String {
        let mut declarator = attach(&op, &declarator);
        if matches!(
            self.data(inner),
            TypeData::Array { .. } | TypeData::Function { .. }
        ) {
            declarator = format!("({declarator})");
        }
        self.spell(inner, declarator, names)
    }

    fn is_pointer_like(&self, ty: Idx) -> bool {
        matches!(
            self.data(ty),
            TypeData::Pointer(_) | TypeData::MemberPointer { .. }
        )
    }
}

#[cfg(test)]
mod tests;
