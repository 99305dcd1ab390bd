use mirror_types::Idx;
use pretty_assertions::assert_eq;

use super::*;
use crate::handle::Construct;
use crate::tu::{ClassKey, ConstValue, DeclId, TranslationUnit};

fn warnings(r: &Reflector) -> usize {
    r.diagnostics()
        .iter()
        .filter(|d| d.code == ErrorCode::E2099)
        .count()
}

#[test]
fn valid_calls_match_the_constant_answers() {
    let mut unit = TranslationUnit::new();
    let s = unit.class(DeclId::GLOBAL, "S", ClassKey::Struct);
    let x = unit.field(s, "x", Idx::INT);
    unit.complete(s);
    let k = unit.variable(DeclId::GLOBAL, "k", Idx::INT, Some(ConstValue::Int(9)));
    let mut r = Reflector::new(unit);
    let class = r.reflect_type(r.unit().class_type(s));
    let x = r.reflect_decl(x).unwrap();
    let k = r.reflect_decl(k).unwrap();

    let mut rt = r.runtime();
    assert_eq!(rt.members_of(class), vec![x]);
    assert_eq!(rt.identifier_of(x), "x");
    assert!(rt.has_identifier(x));
    assert_eq!(rt.parent_of(x), class);
    assert_eq!(rt.size_of(class), 4);
    assert_eq!(rt.offset_of(x), MemberOffset::default());
    assert!(rt.is_complete_type(class));
    assert_eq!(rt.extract_int(k), 9);
    assert_eq!(rt.display_string_of(class), "S");
    assert_eq!(warnings(&r), 0);
}

#[test]
fn invalid_operands_degrade_to_defaults() {
    let mut unit = TranslationUnit::new();
    let opaque = unit.class(DeclId::GLOBAL, "opaque", ClassKey::Struct);
    let mut r = Reflector::new(unit);
    let opaque = r.reflect_type(r.unit().class_type(opaque));
    let int = r.reflect_type(Idx::INT);

    let mut rt = r.runtime();
    assert_eq!(rt.members_of(opaque), Vec::new());
    assert_eq!(rt.nonstatic_data_members_of(Handle::NULL), Vec::new());
    assert_eq!(rt.identifier_of(int), "");
    assert_eq!(rt.type_of(Handle::NULL), Handle::NULL);
    assert_eq!(rt.size_of(opaque), 0);
    assert_eq!(rt.offset_of(int), MemberOffset::default());
    assert_eq!(rt.substitute(int, &[int]), Handle::NULL);
    assert!(!rt.can_substitute(int, &[]));
    assert_eq!(rt.extract_int(int), 0);
    assert_eq!(rt.display_string_of(Handle::NULL), "<null reflection>");
    assert_eq!(warnings(&r), 9);
    assert_eq!(r.diagnostics().error_count(), 0);
}

#[test]
fn foreign_handles_do_not_panic() {
    let mut r = Reflector::new(TranslationUnit::new());
    let foreign = Handle::new(Construct::Variable(DeclId::from_raw(4_000)));
    let mut rt = r.runtime();
    assert_eq!(rt.dealias(foreign), Handle::NULL);
    assert!(!rt.is_complete_type(foreign));
    assert_eq!(rt.display_string_of(foreign), "<foreign reflection>");
    assert_eq!(warnings(&r), 2);
}
