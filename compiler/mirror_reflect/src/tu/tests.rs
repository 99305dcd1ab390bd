use super::*;
use pretty_assertions::assert_eq;

#[test]
fn global_namespace_exists() {
    let unit = TranslationUnit::new();
    assert_eq!(unit.decl_count(), 1);
    assert!(matches!(unit.decl(DeclId::GLOBAL).kind, DeclKind::Namespace(_)));
    assert_eq!(unit.decl(DeclId::GLOBAL).parent, None);
}

#[test]
fn declarations_advance_the_cursor() {
    let mut unit = TranslationUnit::new();
    let a = unit.variable(DeclId::GLOBAL, "a", Idx::INT, None);
    let b = unit.variable(DeclId::GLOBAL, "b", Idx::INT, None);
    assert!(unit.decl(a).point < unit.decl(b).point);
    assert_eq!(unit.cursor(), unit.decl(b).point);
}

#[test]
fn namespaces_reopen() {
    let mut unit = TranslationUnit::new();
    let first = unit.namespace(DeclId::GLOBAL, "n");
    let second = unit.namespace(DeclId::GLOBAL, "n");
    assert_eq!(first, second);
}

#[test]
fn alias_redeclaration_is_merged() {
    let mut unit = TranslationUnit::new();
    let a1 = unit.alias(DeclId::GLOBAL, "A", Idx::INT);
    let a2 = unit.alias(DeclId::GLOBAL, "A", Idx::INT);
    assert_eq!(a1, a2);

    let ns = unit.namespace(DeclId::GLOBAL, "n");
    let a3 = unit.alias(ns, "A", Idx::INT);
    assert_ne!(a1, a3);
}

#[test]
fn lookup_respects_lexical_order() {
    let mut unit = TranslationUnit::new();
    let before = unit.ambient_context();
    let v = unit.variable(DeclId::GLOBAL, "v", Idx::INT, None);
    let after = unit.ambient_context();

    assert_eq!(unit.lookup_in(DeclId::GLOBAL, "v", &before), Lookup::NotFound("v".into()));
    assert_eq!(unit.lookup_in(DeclId::GLOBAL, "v", &after), Lookup::Entity(v));
}

#[test]
fn lookup_walks_enclosing_scopes() {
    let mut unit = TranslationUnit::new();
    let v = unit.variable(DeclId::GLOBAL, "v", Idx::INT, None);
    let ns = unit.namespace(DeclId::GLOBAL, "n");
    let ctx = unit.ambient_context();

    assert_eq!(unit.lookup(ns, "v", &ctx), Lookup::Entity(v));
    assert_eq!(unit.lookup_in(ns, "v", &ctx), Lookup::NotFound("v".into()));
}

#[test]
fn lookup_collects_overloads() {
    let mut unit = TranslationUnit::new();
    let f1 = unit.simple_function(DeclId::GLOBAL, "f", &[Idx::INT], Idx::VOID);
    let f2 = unit.simple_function(DeclId::GLOBAL, "f", &[Idx::DOUBLE], Idx::VOID);
    let ctx = unit.ambient_context();

    match unit.lookup_in(DeclId::GLOBAL, "f", &ctx) {
        Lookup::OverloadSet(set) => assert_eq!(set.as_slice(), &[f1, f2]),
        other => panic!("expected overload set, got {other:?}"),
    }
}

#[test]
fn lookup_path_and_keywords() {
    let mut unit = TranslationUnit::new();
    let ns = unit.namespace(DeclId::GLOBAL, "n");
    let s = unit.class(ns, "S", ClassKey::Struct);
    let x = unit.field(s, "x", Idx::INT);
    unit.complete(s);
    let ctx = unit.ambient_context();

    assert_eq!(unit.lookup_path("n::S::x", &ctx), Lookup::Entity(x));
    assert_eq!(unit.lookup_path("::n::S", &ctx), Lookup::Entity(s));
    assert_eq!(unit.lookup_path("unsigned int", &ctx), Lookup::Type(Idx::UINT));
    assert_eq!(unit.lookup_path("n::T", &ctx), Lookup::NotFound("T".into()));
}

#[test]
fn unscoped_enumerators_are_visible_in_enclosing_scope() {
    let mut unit = TranslationUnit::new();
    let e = unit.enumeration(DeclId::GLOBAL, "E", None, false);
    let red = unit.enumerator(e, "Red", 0);
    unit.complete_enum(e);
    let s = unit.enumeration(DeclId::GLOBAL, "S", None, true);
    unit.enumerator(s, "Green", 1);
    unit.complete_enum(s);
    let ctx = unit.ambient_context();

    assert_eq!(unit.lookup_in(DeclId::GLOBAL, "Red", &ctx), Lookup::Entity(red));
    assert_eq!(unit.lookup_in(DeclId::GLOBAL, "Green", &ctx), Lookup::NotFound("Green".into()));
}

#[test]
fn enum_underlying_type_is_deduced() {
    let mut unit = TranslationUnit::new();
    let small = unit.enumeration(DeclId::GLOBAL, "Small", None, false);
    unit.enumerator(small, "A", -1);
    unit.complete_enum(small);
    let big = unit.enumeration(DeclId::GLOBAL, "Big", None, false);
    unit.enumerator(big, "A", i128::from(u32::MAX) + 1);
    unit.complete_enum(big);

    assert_eq!(unit.enum_decl(small).map(|e| e.underlying), Some(Idx::INT));
    assert_eq!(unit.enum_decl(big).map(|e| e.underlying), Some(Idx::LONG));
}

#[test]
fn class_completion_is_reachability_sensitive() {
    let mut unit = TranslationUnit::new();
    let s = unit.class(DeclId::GLOBAL, "S", ClassKey::Struct);
    let early = unit.ambient_context();
    unit.complete(s);
    let late = unit.ambient_context();

    assert!(!unit.is_complete_in(s, &early));
    assert!(unit.is_complete_in(s, &late));
}

#[test]
fn qualified_names() {
    let mut unit = TranslationUnit::new();
    let ns = unit.namespace(DeclId::GLOBAL, "outer");
    let s = unit.class(ns, "S", ClassKey::Class);
    let ty = unit.class_type(s);
    let p = unit.pool_mut().pointer(ty);

    assert_eq!(unit.qualified_name(s), "outer::S");
    assert_eq!(unit.format_type(p), "outer::S*");
}

#[test]
fn template_ids_name_one_specialization() {
    let mut unit = TranslationUnit::new();
    let t = unit.intern("T");
    let n = unit.intern("N");
    let array = unit.class_template(
        DeclId::GLOBAL,
        "array",
        vec![TemplateParam::ty(t), TemplateParam::value(n, Idx::SIZE_T)],
        ClassKey::Struct,
        Vec::new(),
    );
    let five = unit.value(Idx::SIZE_T, ConstValue::Int(5));
    let args = [TemplateArg::Type(Idx::INT), TemplateArg::Value(five)];

    let first = unit.class_specialization(array, &args);
    let second = unit.class_specialization(array, &args);

    assert_eq!(first, second);
    assert_eq!(unit.qualified_name(first), "array<int, 5>");
    assert_eq!(unit.template(array).map(|t| t.specializations.len()), Some(1));
    assert!(unit.class_decl(first).is_some_and(|c| c.state == Completion::Incomplete));
}

#[test]
fn fixed_enum_is_complete_before_its_enumerators() {
    let mut unit = TranslationUnit::new();
    let e = unit.enumeration(DeclId::GLOBAL, "E", Some(Idx::UCHAR), false);
    let opaque = unit.ambient_context();
    unit.enumerator(e, "a", 0);
    unit.complete_enum(e);

    assert!(unit.is_complete_in(e, &opaque));
    let enumerable = unit.enum_decl(e).and_then(|en| en.enumerable);
    assert!(enumerable.is_some_and(|at| !at.precedes(opaque.point())));
}

#[test]
fn namespace_alias_redeclaration_is_merged() {
    let mut unit = TranslationUnit::new();
    let ns = unit.namespace(DeclId::GLOBAL, "n");
    let a = unit.namespace_alias(DeclId::GLOBAL, "m", ns);
    let b = unit.namespace_alias(DeclId::GLOBAL, "m", ns);
    assert_eq!(a, b);
}
