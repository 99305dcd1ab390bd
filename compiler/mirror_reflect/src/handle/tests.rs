use super::*;
use pretty_assertions::assert_eq;

#[test]
fn default_is_null() {
    let h = Handle::default();
    assert!(h.is_null());
    assert_eq!(h, Handle::NULL);
    assert_eq!(h.construct(), Construct::Null);
    assert_eq!(std::mem::size_of::<Handle>(), std::mem::size_of::<*const ()>());
}

#[test]
fn constructs_survive_packing() {
    let cases = [
        Construct::Type(Idx::INT),
        Construct::Type(Idx::VOID),
        Construct::TypeAlias(DeclId::from_raw(3)),
        Construct::Value(ValueId::from_raw(0)),
        Construct::Object(ObjectId::from_raw(9)),
        Construct::Variable(DeclId::from_raw(u32::MAX)),
        Construct::StructuredBinding(DeclId::from_raw(1)),
        Construct::Function(DeclId::from_raw(2)),
        Construct::Enumerator(DeclId::from_raw(2)),
        Construct::DataMember(DeclId::from_raw(2)),
        Construct::Base(DeclId::from_raw(2)),
        Construct::Template(DeclId::from_raw(2)),
        Construct::Namespace(DeclId::from_raw(0)),
        Construct::NamespaceAlias(DeclId::from_raw(0)),
        Construct::MemberDescription(DescId::from_raw(5)),
    ];
    for construct in cases {
        assert_eq!(Handle::new(construct).construct(), construct);
    }
}

#[test]
fn void_type_is_not_null() {
    let void = Handle::new(Construct::Type(Idx::VOID));
    assert!(!void.is_null());
    assert!(void.is_type());
    assert_ne!(void, Handle::NULL);
}

#[test]
fn same_payload_different_kind_differ() {
    let f = Handle::new(Construct::Function(DeclId::from_raw(2)));
    let v = Handle::new(Construct::Variable(DeclId::from_raw(2)));
    assert_ne!(f, v);
    assert!(f.is_function());
    assert!(v.is_variable());
}

#[test]
fn kind_predicates() {
    let alias = Handle::new(Construct::TypeAlias(DeclId::from_raw(1)));
    assert!(alias.is_type());
    assert!(alias.is_type_alias());

    let ns_alias = Handle::new(Construct::NamespaceAlias(DeclId::from_raw(1)));
    assert!(ns_alias.is_namespace());
    assert!(ns_alias.is_namespace_alias());

    let desc = Handle::new(Construct::MemberDescription(DescId::from_raw(0)));
    assert!(desc.is_data_member_spec());
    assert!(!desc.is_nonstatic_data_member());
}
