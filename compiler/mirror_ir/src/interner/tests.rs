use super::*;
use pretty_assertions::assert_eq;

#[test]
fn reserved_names_are_fixed() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.intern("_"), Name::PLACEHOLDER);
    assert!(Name::PLACEHOLDER.is_placeholder());
}

#[test]
fn interning_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("member");
    let b = interner.intern("member");
    let c = interner.intern("other");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.lookup(a), "member");
}

#[test]
fn get_does_not_intern() {
    let interner = StringInterner::new();
    let before = interner.len();
    assert_eq!(interner.get("never_seen"), None);
    assert_eq!(interner.len(), before);
}

#[test]
fn foreign_name_looks_up_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(u32::MAX)), "");
}
