use super::*;
use crate::tu::{ClassKey, ConstValue, DataMemberSpec, DeclId, TranslationUnit};
use mirror_types::Idx;
use pretty_assertions::assert_eq;

fn step(r: &Reflector, a: Handle, b: Handle) -> (bool, ComparisonStep) {
    let c = r.compare(a, b);
    (c.equal, c.step)
}

#[test]
fn null_equals_only_null() {
    let r = Reflector::new(TranslationUnit::new());
    let int = r.reflect_type(Idx::INT);
    assert_eq!(step(&r, Handle::NULL, Handle::default()), (true, ComparisonStep::Null));
    assert_eq!(step(&r, Handle::NULL, int), (false, ComparisonStep::Null));
    assert_eq!(step(&r, int, Handle::NULL), (false, ComparisonStep::Null));
}

#[test]
fn alias_is_not_its_target() {
    let mut unit = TranslationUnit::new();
    let a = unit.alias(DeclId::GLOBAL, "A", Idx::INT);
    let b = unit.alias(DeclId::GLOBAL, "B", Idx::INT);
    let r = Reflector::new(unit);
    let (ha, hb) = (
        Handle::new(Construct::TypeAlias(a)),
        Handle::new(Construct::TypeAlias(b)),
    );
    assert_eq!(step(&r, ha, ha), (true, ComparisonStep::Alias));
    assert_eq!(step(&r, ha, hb), (false, ComparisonStep::Alias));
    assert_eq!(
        step(&r, ha, r.reflect_type(Idx::INT)),
        (false, ComparisonStep::KindMismatch)
    );
}

#[test]
fn values_compare_by_type_and_value() {
    let mut unit = TranslationUnit::new();
    let five_int = unit.value(Idx::INT, ConstValue::Int(5));
    let five_int_again = unit.value(Idx::INT, ConstValue::Int(5));
    let five_long = unit.value(Idx::LONG, ConstValue::Int(5));
    let r = Reflector::new(unit);
    let h = |id| Handle::new(Construct::Value(id));

    assert_eq!(five_int, five_int_again);
    assert_eq!(step(&r, h(five_int), h(five_int_again)), (true, ComparisonStep::Value));
    assert_eq!(step(&r, h(five_int), h(five_long)), (false, ComparisonStep::Value));
}

#[test]
fn descriptions_compare_structurally() {
    let mut unit = TranslationUnit::new();
    let spec = DataMemberSpec {
        ty: Idx::INT,
        name: Some(unit.intern("x")),
        align: None,
        bit_width: None,
        no_unique_address: false,
    };
    let a = unit.descs.intern(spec);
    let b = unit.descs.intern(spec);
    let y = unit.intern("y");
    let c = unit.descs.intern(DataMemberSpec {
        name: Some(y),
        ..spec
    });
    let r = Reflector::new(unit);
    let h = |id| Handle::new(Construct::MemberDescription(id));
    assert_eq!(step(&r, h(a), h(b)), (true, ComparisonStep::MemberDescription));
    assert_eq!(step(&r, h(a), h(c)), (false, ComparisonStep::MemberDescription));
}

#[test]
fn entities_compare_by_identity() {
    let mut unit = TranslationUnit::new();
    let s = unit.class(DeclId::GLOBAL, "S", ClassKey::Struct);
    let x = unit.field(s, "x", Idx::INT);
    let y = unit.field(s, "y", Idx::INT);
    let r = Reflector::new(unit);
    let h = |id| Handle::new(Construct::DataMember(id));
    assert_eq!(step(&r, h(x), h(x)), (true, ComparisonStep::Entity));
    assert_eq!(step(&r, h(x), h(y)), (false, ComparisonStep::Entity));
    assert_eq!(
        step(&r, h(x), Handle::new(Construct::Namespace(DeclId::GLOBAL))),
        (false, ComparisonStep::KindMismatch)
    );
}

#[test]
fn foreign_handles_fall_back_to_bits() {
    let r = Reflector::new(TranslationUnit::new());
    let foreign = Handle::new(Construct::Variable(DeclId::from_raw(999)));
    assert_eq!(step(&r, foreign, foreign), (true, ComparisonStep::Entity));
    assert!(!r.handles_equal(foreign, Handle::NULL));
}

#[test]
fn chain_agrees_with_bits() {
    let mut unit = TranslationUnit::new();
    let s = unit.class(DeclId::GLOBAL, "S", ClassKey::Struct);
    let a = unit.alias(DeclId::GLOBAL, "A", Idx::INT);
    let v = unit.value(Idx::INT, ConstValue::Int(1));
    let r = Reflector::new(unit);
    let handles = [
        Handle::NULL,
        r.reflect_type(Idx::INT),
        r.reflect_decl(s).unwrap(),
        Handle::new(Construct::TypeAlias(a)),
        Handle::new(Construct::Value(v)),
        Handle::new(Construct::Namespace(DeclId::GLOBAL)),
    ];
    for &x in &handles {
        for &y in &handles {
            assert_eq!(r.handles_equal(x, y), x == y, "{x:?} vs {y:?}");
        }
    }
}
