use super::*;
use crate::tu::{ClassKey, TemplateArg, TemplateParam, TranslationUnit, TypePattern};
use crate::{EvalKind, ManifestSite};
use pretty_assertions::assert_eq;

fn field(unit: &TranslationUnit, name: &str, ty: TypePattern) -> FieldPattern {
    FieldPattern {
        name: unit.intern(name),
        ty,
        bit_width: None,
    }
}

/// `template<class T> struct holder { T value; };` plus `holder<arg>`.
fn holder_of(pattern: TypePattern, arg: Idx) -> (Reflector, DeclId) {
    let mut unit = TranslationUnit::new();
    let params = vec![TemplateParam::ty(unit.intern("T"))];
    let fields = vec![field(&unit, "value", pattern)];
    let holder = unit.class_template(DeclId::GLOBAL, "holder", params, ClassKey::Struct, fields);
    let spec = unit.class_specialization(holder, &[TemplateArg::Type(arg)]);
    (Reflector::new(unit), spec)
}

fn field_types(r: &Reflector, class: DeclId) -> Vec<Idx> {
    r.fields_of(class)
        .filter_map(|m| match &r.unit().decl(m).kind {
            DeclKind::Field(f) => Some(f.ty),
            _ => None,
        })
        .collect()
}

#[test]
fn reachable_definition_is_instantiated() {
    let (mut r, spec) = holder_of(TypePattern::param(0), Idx::INT);
    assert_eq!(r.unit().class_decl(spec).map(|c| c.state), Some(Completion::Incomplete));

    r.ensure_complete(spec).unwrap();
    let class = r.unit().class_decl(spec).unwrap();
    assert!(matches!(class.state, Completion::Complete { injected: None, .. }));
    assert_eq!(field_types(&r, spec), vec![Idx::INT]);
    assert!(matches!(
        r.unit().decl(class.members[0]).kind,
        DeclKind::InjectedClassName { class: owner } if owner == spec
    ));
}

#[test]
fn instantiation_happens_once() {
    let (mut r, spec) = holder_of(TypePattern::param(0), Idx::INT);
    r.ensure_complete(spec).unwrap();
    let count = r.unit().decl_count();
    r.ensure_complete(spec).unwrap();
    assert!(r.is_complete_type_idx(r.unit().class_type(spec)).unwrap());
    assert_eq!(r.unit().decl_count(), count);
}

#[test]
fn invalid_member_type_is_a_hard_error() {
    let (mut r, spec) = holder_of(TypePattern::param(0).lvalue_ref(), Idx::VOID);
    match r.ensure_complete(spec) {
        Err(MetaError::IllFormed(IllFormed::InstantiationFailed {
            specialization,
            reason,
        })) => {
            assert_eq!(specialization, "holder<void>");
            assert_eq!(reason, "reference to void");
        }
        other => panic!("expected instantiation failure, got {other:?}"),
    }
}

#[test]
fn incomplete_member_type_is_a_hard_error() {
    let mut unit = TranslationUnit::new();
    let opaque = unit.class(DeclId::GLOBAL, "opaque", ClassKey::Struct);
    let opaque_ty = unit.class_type(opaque);
    let params = vec![TemplateParam::ty(unit.intern("T"))];
    let fields = vec![field(&unit, "value", TypePattern::param(0))];
    let holder = unit.class_template(DeclId::GLOBAL, "holder", params, ClassKey::Struct, fields);
    let spec = unit.class_specialization(holder, &[TemplateArg::Type(opaque_ty)]);
    let mut r = Reflector::new(unit);

    let err = r.ensure_complete(spec).unwrap_err();
    assert!(matches!(
        err,
        MetaError::IllFormed(IllFormed::InstantiationFailed {
            reason: "data member of incomplete type",
            ..
        })
    ));
    assert_eq!(r.unit().class_decl(spec).map(|c| c.state), Some(Completion::Incomplete));
}

#[test]
fn declared_only_template_is_left_alone() {
    let mut unit = TranslationUnit::new();
    let params = vec![TemplateParam::ty(unit.intern("T"))];
    let tmpl = unit.declare_class_template(DeclId::GLOBAL, "later", params, ClassKey::Struct);
    let spec = unit.class_specialization(tmpl, &[TemplateArg::Type(Idx::INT)]);
    let mut r = Reflector::new(unit);

    r.ensure_complete(spec).unwrap();
    assert_eq!(r.unit().class_decl(spec).map(|c| c.state), Some(Completion::Incomplete));
    assert!(!r.is_complete_type_idx(r.unit().class_type(spec)).unwrap());
}

#[test]
fn definition_after_the_context_is_not_used() {
    let mut unit = TranslationUnit::new();
    let params = vec![TemplateParam::ty(unit.intern("T"))];
    let tmpl = unit.declare_class_template(DeclId::GLOBAL, "later", params, ClassKey::Struct);
    let spec = unit.class_specialization(tmpl, &[TemplateArg::Type(Idx::INT)]);
    let mut r = Reflector::new(unit);

    let early = r.site(EvalKind::Manifest(ManifestSite::Trial), mirror_ir::Span::DUMMY);
    let fields = vec![field(r.unit(), "value", TypePattern::param(0))];
    r.unit_mut().define_class_template(tmpl, fields);
    let ty = r.unit().class_type(spec);

    let before = r.evaluate(&early, |r| r.is_complete_type_idx(ty));
    assert_eq!(before, Ok(false));
    assert!(r.is_complete_type_idx(ty).unwrap());
}

#[test]
fn nested_specializations_instantiate_recursively() {
    let mut unit = TranslationUnit::new();
    let params = vec![TemplateParam::ty(unit.intern("T"))];
    let fields = vec![field(&unit, "value", TypePattern::param(0))];
    let inner = unit.class_template(DeclId::GLOBAL, "inner", params.clone(), ClassKey::Struct, fields);
    let inner_int = unit.class_specialization(inner, &[TemplateArg::Type(Idx::INT)]);
    let inner_ty = unit.class_type(inner_int);
    let fields = vec![field(&unit, "nested", TypePattern::Fixed(inner_ty))];
    let outer = unit.class_template(DeclId::GLOBAL, "outer", params, ClassKey::Struct, fields);
    let outer_int = unit.class_specialization(outer, &[TemplateArg::Type(Idx::INT)]);
    let mut r = Reflector::new(unit);

    r.ensure_complete(outer_int).unwrap();
    assert_eq!(field_types(&r, outer_int), vec![inner_ty]);
    assert!(matches!(
        r.unit().class_decl(inner_int).map(|c| c.state),
        Some(Completion::Complete { .. })
    ));
}

#[test]
fn completeness_of_non_class_types() {
    let mut r = Reflector::new(TranslationUnit::new());
    let pool = r.unit_mut().pool_mut();
    let int_ref = pool.lvalue_ref(Idx::INT);
    let unbounded = pool.array(Idx::INT, None);
    let bounded = pool.array(Idx::INT, Some(3));
    let func = pool.function(&[], Idx::VOID, false);

    assert!(r.is_complete_type_idx(Idx::INT).unwrap());
    assert!(r.is_complete_type_idx(int_ref).unwrap());
    assert!(r.is_complete_type_idx(bounded).unwrap());
    assert!(!r.is_complete_type_idx(Idx::VOID).unwrap());
    assert!(!r.is_complete_type_idx(unbounded).unwrap());
    assert!(!r.is_complete_type_idx(func).unwrap());
}

#[test]
fn require_complete_type_names_the_type() {
    let mut unit = TranslationUnit::new();
    let opaque = unit.class(DeclId::GLOBAL, "opaque", ClassKey::Struct);
    let ty = unit.class_type(opaque);
    let mut r = Reflector::new(unit);
    assert_eq!(
        r.require_complete_type(ty, "size_of"),
        Err(MetaError::not_constant(
            "size_of",
            Precondition::IncompleteType("opaque".into())
        ))
    );
}
