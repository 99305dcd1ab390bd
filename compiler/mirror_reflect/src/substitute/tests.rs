use pretty_assertions::assert_eq;

use super::*;
use crate::tu::{ClassKey, Completion, FieldPattern, TranslationUnit, TypePattern};

fn type_param(unit: &TranslationUnit) -> TemplateParam {
    TemplateParam::ty(unit.intern("T"))
}

/// `template<class T> struct box { T value; };`
fn with_box() -> (Reflector, Handle) {
    let mut unit = TranslationUnit::new();
    let fields = vec![FieldPattern {
        name: unit.intern("value"),
        ty: TypePattern::param(0),
        bit_width: None,
    }];
    let params = vec![type_param(&unit)];
    let tmpl = unit.class_template(DeclId::GLOBAL, "box", params, ClassKey::Struct, fields);
    let r = Reflector::new(unit);
    let handle = r.reflect_decl(tmpl).unwrap();
    (r, handle)
}

#[test]
fn class_substitution_does_not_instantiate() {
    let (mut r, tmpl) = with_box();
    let int = r.reflect_type(Idx::INT);
    let spec = r.substitute(tmpl, &[int]).unwrap();
    let Construct::Type(ty) = spec.construct() else {
        panic!("expected a type, got {spec:?}");
    };
    let class = r.unit().class_of_type(ty).unwrap();
    assert_eq!(r.unit().class_decl(class).map(|c| c.state), Some(Completion::Incomplete));
    assert_eq!(r.display_string_of(spec), "box<int>");

    assert!(r.is_complete_type(spec).unwrap());
}

#[test]
fn equivalent_arguments_give_one_handle() {
    let (mut r, tmpl) = with_box();
    let alias = r.unit_mut().alias(DeclId::GLOBAL, "integer", Idx::INT);
    let alias = r.reflect_decl(alias).unwrap();
    let int = r.reflect_type(Idx::INT);

    let first = r.substitute(tmpl, &[int]).unwrap();
    let second = r.substitute(tmpl, &[alias]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn arity_is_checked() {
    let (mut r, tmpl) = with_box();
    let int = r.reflect_type(Idx::INT);
    assert!(!r.can_substitute(tmpl, &[]).unwrap());
    assert!(!r.can_substitute(tmpl, &[int, int]).unwrap());
    assert!(r.can_substitute(tmpl, &[int]).unwrap());

    let err = r.substitute(tmpl, &[]).unwrap_err();
    assert_eq!(
        err,
        MetaError::not_constant("substitute", Precondition::SubstitutionFailed("box".into()))
    );
}

#[test]
fn defaults_fill_missing_arguments() {
    let mut unit = TranslationUnit::new();
    let params = vec![
        type_param(&unit),
        TemplateParam::ty(unit.intern("U")).with_default(TemplateArg::Type(Idx::CHAR)),
    ];
    let tmpl = unit.declare_class_template(DeclId::GLOBAL, "pair", params, ClassKey::Struct);
    let mut r = Reflector::new(unit);
    let tmpl = r.reflect_decl(tmpl).unwrap();
    let (int, char) = (r.reflect_type(Idx::INT), r.reflect_type(Idx::CHAR));

    let short = r.substitute(tmpl, &[int]).unwrap();
    let long = r.substitute(tmpl, &[int, char]).unwrap();
    assert_eq!(short, long);
}

#[test]
fn alias_templates_form_aliases() {
    let mut unit = TranslationUnit::new();
    let params = vec![type_param(&unit)];
    let ptr_pattern = TypePattern::param(0).pointer();
    let ptr = unit.alias_template(DeclId::GLOBAL, "ptr", params.clone(), ptr_pattern);
    let reference =
        unit.alias_template(DeclId::GLOBAL, "ref", params, TypePattern::param(0).lvalue_ref());
    let mut r = Reflector::new(unit);
    let (ptr, reference) = (r.reflect_decl(ptr).unwrap(), r.reflect_decl(reference).unwrap());
    let (int, void) = (r.reflect_type(Idx::INT), r.reflect_type(Idx::VOID));

    let alias = r.substitute(ptr, &[int]).unwrap();
    assert!(matches!(alias.construct(), Construct::TypeAlias(_)));
    let int_ptr = r.unit_mut().pool_mut().pointer(Idx::INT);
    assert_eq!(r.dealias(alias).unwrap(), r.reflect_type(int_ptr));
    assert_eq!(r.template_of(alias).unwrap(), ptr);

    assert!(!r.can_substitute(reference, &[void]).unwrap());
    assert!(r.can_substitute(reference, &[int]).unwrap());
}

#[test]
fn value_arguments_convert_without_narrowing() {
    let mut unit = TranslationUnit::new();
    let params = vec![TemplateParam::value(unit.intern("N"), Idx::UCHAR)];
    let tmpl = unit.declare_class_template(DeclId::GLOBAL, "counter", params, ClassKey::Struct);
    let mut r = Reflector::new(unit);
    let tmpl = r.reflect_decl(tmpl).unwrap();

    let five_long = r.reflect_int(Idx::LONG, 5).unwrap();
    let five_uchar = r.reflect_int(Idx::UCHAR, 5).unwrap();
    let first = r.substitute(tmpl, &[five_long]).unwrap();
    let second = r.substitute(tmpl, &[five_uchar]).unwrap();
    assert_eq!(first, second);

    let big = r.reflect_int(Idx::INT, 300).unwrap();
    assert!(!r.can_substitute(tmpl, &[big]).unwrap());
    let yes = r.reflect_bool(true).unwrap();
    assert!(r.can_substitute(tmpl, &[yes]).unwrap());
    let int = r.reflect_type(Idx::INT);
    assert!(!r.can_substitute(tmpl, &[int]).unwrap());
}

#[test]
fn enumerators_do_not_convert_to_integers() {
    let mut unit = TranslationUnit::new();
    let color = unit.enumeration(DeclId::GLOBAL, "color", None, false);
    let red = unit.enumerator(color, "red", 0);
    unit.complete_enum(color);
    let params = vec![TemplateParam::value(unit.intern("N"), Idx::INT)];
    let tmpl = unit.declare_class_template(DeclId::GLOBAL, "tag", params, ClassKey::Struct);
    let color_ty = unit.class_type(color);
    let params = vec![TemplateParam::value(unit.intern("C"), color_ty)];
    let by_color = unit.declare_class_template(DeclId::GLOBAL, "hue", params, ClassKey::Struct);
    let mut r = Reflector::new(unit);
    let (tmpl, by_color, red) = (
        r.reflect_decl(tmpl).unwrap(),
        r.reflect_decl(by_color).unwrap(),
        r.reflect_decl(red).unwrap(),
    );

    assert!(!r.can_substitute(tmpl, &[red]).unwrap());
    assert!(r.can_substitute(by_color, &[red]).unwrap());
}

#[test]
fn constraints_are_checked() {
    let mut unit = TranslationUnit::new();
    let integral = unit.concept(DeclId::GLOBAL, "integral", ConceptPredicate::Integral);
    let params = vec![type_param(&unit)];
    let f = unit.function_template(
        DeclId::GLOBAL,
        "f",
        params,
        vec![TypePattern::param(0)],
        TypePattern::Fixed(Idx::VOID),
    );
    unit.constrain(f, 0, integral);
    let mut r = Reflector::new(unit);
    let (f, integral) = (r.reflect_decl(f).unwrap(), r.reflect_decl(integral).unwrap());
    let (int, double) = (r.reflect_type(Idx::INT), r.reflect_type(Idx::DOUBLE));

    assert!(!r.can_substitute(f, &[double]).unwrap());
    let spec = r.substitute(f, &[int]).unwrap();
    assert!(matches!(spec.construct(), Construct::Function(_)));
    let fn_ty = r.unit_mut().pool_mut().function(&[Idx::INT], Idx::VOID, false);
    assert_eq!(r.type_of(spec).unwrap(), r.reflect_type(fn_ty));
    assert!(!r.has_identifier(spec).unwrap());

    let satisfied = r.substitute(integral, &[int]).unwrap();
    assert!(r.extract_bool(satisfied).unwrap());
    let unsatisfied = r.substitute(integral, &[double]).unwrap();
    assert!(!r.extract_bool(unsatisfied).unwrap());
}

#[test]
fn completeness_concepts_may_instantiate() {
    let (mut r, tmpl) = with_box();
    let complete = r
        .unit_mut()
        .concept(DeclId::GLOBAL, "complete", ConceptPredicate::Complete);
    let complete = r.reflect_decl(complete).unwrap();
    let int = r.reflect_type(Idx::INT);
    let spec = r.substitute(tmpl, &[int]).unwrap();

    let answer = r.substitute(complete, &[spec]).unwrap();
    assert!(r.extract_bool(answer).unwrap());
}

#[test]
fn packs_take_the_rest() {
    let mut unit = TranslationUnit::new();
    let params = vec![TemplateParam::ty(unit.intern("Ts")).pack()];
    let tuple = unit.declare_class_template(DeclId::GLOBAL, "tuple", params, ClassKey::Struct);
    let mut r = Reflector::new(unit);
    let tuple = r.reflect_decl(tuple).unwrap();
    let (int, char) = (r.reflect_type(Idx::INT), r.reflect_type(Idx::CHAR));

    let empty = r.substitute(tuple, &[]).unwrap();
    let three = r.substitute(tuple, &[int, char, int]).unwrap();
    assert_ne!(empty, three);
    assert_eq!(r.template_arguments_of(three).unwrap(), vec![int, char, int]);
    assert_eq!(r.display_string_of(empty), "tuple<>");
}

#[test]
fn variable_templates() {
    let mut unit = TranslationUnit::new();
    let params = vec![type_param(&unit)];
    let v = unit.variable_template(DeclId::GLOBAL, "zero", params, TypePattern::param(0).constant());
    let mut r = Reflector::new(unit);
    let v = r.reflect_decl(v).unwrap();
    let int = r.reflect_type(Idx::INT);

    let spec = r.substitute(v, &[int]).unwrap();
    assert!(matches!(spec.construct(), Construct::Variable(_)));
    assert_eq!(r.substitute(v, &[int]).unwrap(), spec);
    let const_int = r.unit_mut().pool_mut().const_of(Idx::INT);
    assert_eq!(r.type_of(spec).unwrap(), r.reflect_type(const_int));
}

#[test]
fn only_templates_substitute() {
    let (mut r, _) = with_box();
    let int = r.reflect_type(Idx::INT);
    let err = r.substitute(int, &[int]).unwrap_err();
    assert!(err.is_not_constant());
    let err = r.can_substitute(Handle::NULL, &[]).unwrap_err();
    assert_eq!(err.code(), mirror_diagnostic::ErrorCode::E2001);
}
