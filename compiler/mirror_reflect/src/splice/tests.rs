use pretty_assertions::assert_eq;

use super::*;
use crate::tu::{ClassKey, ConceptPredicate, TemplateParam, TranslationUnit, TypePattern};

struct Fixture {
    r: Reflector,
    ns: DeclId,
    alias: DeclId,
    color: DeclId,
    class: DeclId,
    field: DeclId,
    bits: DeclId,
    ref_member: DeclId,
    method: DeclId,
    ctor: DeclId,
    helper: DeclId,
    var: DeclId,
    ref_var: DeclId,
    tmpl: DeclId,
    fn_tmpl: DeclId,
    concept: DeclId,
}

fn fixture() -> Fixture {
    let mut unit = TranslationUnit::new();
    let ns = unit.namespace(DeclId::GLOBAL, "n");
    let alias = unit.namespace_alias(DeclId::GLOBAL, "m", ns);
    let color = unit.enumeration(DeclId::GLOBAL, "color", None, true);
    let class = unit.class(DeclId::GLOBAL, "S", ClassKey::Struct);
    let field = unit.field(class, "x", Idx::INT);
    let bits = unit.bit_field(class, Some("b"), Idx::UINT, 3);
    let int_ref = unit.pool_mut().lvalue_ref(Idx::INT);
    let ref_member = unit.field(class, "r", int_ref);
    let unary = unit.pool_mut().function(&[], Idx::INT, false);
    let method = unit.function(class, "get", FunctionDecl::new(unary, FunctionRole::ImplicitObject));
    let void_fn = unit.pool_mut().function(&[], Idx::VOID, false);
    let ctor = unit.function(class, "S", FunctionDecl::new(void_fn, FunctionRole::Constructor));
    let helper = unit.simple_function(class, "make", &[], Idx::INT);
    unit.complete(class);
    let var = unit.variable(DeclId::GLOBAL, "v", Idx::INT, None);
    let ref_var = unit.variable(DeclId::GLOBAL, "rv", int_ref, None);
    let params = vec![TemplateParam::ty(unit.intern("T"))];
    let tmpl = unit.class_template(DeclId::GLOBAL, "box", params.clone(), ClassKey::Struct, Vec::new());
    let fn_tmpl = unit.function_template(
        DeclId::GLOBAL,
        "id",
        params,
        vec![TypePattern::param(0)],
        TypePattern::param(0),
    );
    let concept = unit.concept(DeclId::GLOBAL, "integral", ConceptPredicate::Integral);
    Fixture {
        r: Reflector::new(unit),
        ns,
        alias,
        color,
        class,
        field,
        bits,
        ref_member,
        method,
        ctor,
        helper,
        var,
        ref_var,
        tmpl,
        fn_tmpl,
        concept,
    }
}

impl Fixture {
    fn h(&self, id: DeclId) -> Handle {
        self.r.reflect_decl(id).unwrap()
    }

    fn splice(&mut self, handle: Handle, site: SpliceSite) -> MetaResult<Spliced> {
        self.r.splice(handle, site, SplicePrefix::None, false)
    }
}

fn ill_formed<T: std::fmt::Debug>(result: MetaResult<T>) -> IllFormed {
    match result {
        Err(MetaError::IllFormed(ill)) => ill,
        other => panic!("expected an ill-formed splice, got {other:?}"),
    }
}

// === Ill-formed sites ===

#[test]
fn forbidden_sites_fail_before_the_operand_is_read() {
    let mut f = fixture();
    let ns = f.h(f.ns);
    assert_eq!(
        ill_formed(f.splice(Handle::NULL, SpliceSite::Designator)),
        IllFormed::DesignatorSplice
    );
    assert_eq!(
        ill_formed(f.splice(ns, SpliceSite::NamespaceOpening)),
        IllFormed::NamespaceDefinitionSplice
    );
    assert_eq!(
        ill_formed(f.r.splice(ns, SpliceSite::UsingDirective, SplicePrefix::None, true)),
        IllFormed::DependentUsingDirective
    );
    let color = f.h(f.color);
    assert_eq!(
        ill_formed(f.r.splice(color, SpliceSite::UsingEnum, SplicePrefix::None, true)),
        IllFormed::DependentUsingEnum
    );
}

#[test]
fn null_operands_are_ill_formed() {
    let mut f = fixture();
    assert_eq!(
        ill_formed(f.splice(Handle::NULL, SpliceSite::Expression)),
        IllFormed::NullSplice
    );
    assert_eq!(ill_formed(f.r.address_of_splice(Handle::NULL)), IllFormed::NullSplice);
}

// === Declarative sites ===

#[test]
fn using_directives_take_namespaces() {
    let mut f = fixture();
    let (ns, alias, class) = (f.h(f.ns), f.h(f.alias), f.h(f.class));
    assert_eq!(f.splice(ns, SpliceSite::UsingDirective), Ok(Spliced::Namespace(f.ns)));
    assert_eq!(f.splice(alias, SpliceSite::UsingDirective), Ok(Spliced::Namespace(f.ns)));
    assert!(matches!(
        ill_formed(f.splice(class, SpliceSite::UsingDirective)),
        IllFormed::SpliceKindMismatch { expected: "namespace", .. }
    ));
}

#[test]
fn using_enum_takes_enumerations() {
    let mut f = fixture();
    let (color, class) = (f.h(f.color), f.h(f.class));
    let color_ty = f.r.unit().class_type(f.color);
    assert_eq!(f.splice(color, SpliceSite::UsingEnum), Ok(Spliced::Type(color_ty)));
    assert!(matches!(
        ill_formed(f.splice(class, SpliceSite::UsingEnum)),
        IllFormed::SpliceKindMismatch { expected: "enumeration type", .. }
    ));
}

#[test]
fn template_parameters_reject_concepts() {
    let mut f = fixture();
    let (concept, int) = (f.h(f.concept), f.r.reflect_type(Idx::INT));
    assert_eq!(
        ill_formed(f.splice(concept, SpliceSite::TemplateParameter)),
        IllFormed::ConceptTemplateParameter
    );
    assert_eq!(f.splice(int, SpliceSite::TemplateParameter), Ok(Spliced::Type(Idx::INT)));
}

// === Types and templates ===

#[test]
fn type_positions() {
    let mut f = fixture();
    let (class, tmpl) = (f.h(f.class), f.h(f.tmpl));
    let class_ty = f.r.unit().class_type(f.class);
    assert_eq!(f.splice(class, SpliceSite::TypeOnly), Ok(Spliced::Type(class_ty)));
    assert_eq!(
        f.splice(tmpl, SpliceSite::TypeOnly),
        Ok(Spliced::DeducedClassType(f.tmpl))
    );
    assert_eq!(
        f.r.splice(tmpl, SpliceSite::TypeOnly, SplicePrefix::Template, false),
        Ok(Spliced::TemplateName(f.tmpl))
    );
    assert!(matches!(
        ill_formed(f.r.splice(tmpl, SpliceSite::TypeOnly, SplicePrefix::None, true)),
        IllFormed::SpliceKindMismatch { expected: "type", .. }
    ));
}

#[test]
fn prefixes_are_authoritative() {
    let mut f = fixture();
    let (class, var, fn_tmpl) = (f.h(f.class), f.h(f.var), f.h(f.fn_tmpl));
    let class_ty = f.r.unit().class_type(f.class);
    assert_eq!(
        f.r.splice(class, SpliceSite::Expression, SplicePrefix::Typename, false),
        Ok(Spliced::Type(class_ty))
    );
    assert!(f
        .r
        .splice(var, SpliceSite::Expression, SplicePrefix::Typename, false)
        .is_err());
    assert_eq!(
        f.r.splice(fn_tmpl, SpliceSite::Expression, SplicePrefix::Template, false),
        Ok(Spliced::TemplateName(f.fn_tmpl))
    );
}

// === Expressions ===

#[test]
fn expression_categories() {
    let mut f = fixture();
    let five = f.r.reflect_int(Idx::INT, 5).unwrap();
    assert_eq!(
        f.splice(five, SpliceSite::Expression),
        Ok(Spliced::Expression {
            entity: five,
            category: ValueCategory::PRValue,
            ty: Idx::INT,
        })
    );

    let var = f.h(f.var);
    assert_eq!(
        f.splice(var, SpliceSite::Expression),
        Ok(Spliced::Expression {
            entity: var,
            category: ValueCategory::LValue,
            ty: Idx::INT,
        })
    );

    let ref_var = f.h(f.ref_var);
    assert!(matches!(
        f.splice(ref_var, SpliceSite::Expression),
        Ok(Spliced::Expression {
            category: ValueCategory::LValue,
            ty: Idx::INT,
            ..
        })
    ));

    let ns = f.h(f.ns);
    assert!(matches!(
        ill_formed(f.splice(ns, SpliceSite::Expression)),
        IllFormed::SpliceKindMismatch { expected: "expression", .. }
    ));
}

#[test]
fn special_members_cannot_be_spliced() {
    let mut f = fixture();
    let ctor = f.h(f.ctor);
    assert_eq!(
        ill_formed(f.splice(ctor, SpliceSite::Expression)),
        IllFormed::SpecialMemberSplice("constructor")
    );
    assert_eq!(
        ill_formed(f.r.address_of_splice(ctor)),
        IllFormed::SpecialMemberSplice("constructor")
    );
}

// === Addresses ===

#[test]
fn member_addresses() {
    let mut f = fixture();
    let class_ty = f.r.unit().class_type(f.class);
    let field = f.h(f.field);
    let expected = f.r.unit_mut().pool_mut().member_pointer(class_ty, Idx::INT);
    assert_eq!(
        f.r.address_of_splice(field),
        Ok(SplicedAddress::PointerToMemberData {
            member: f.field,
            ty: expected,
        })
    );

    let method = f.h(f.method);
    let unary = f.r.unit_mut().pool_mut().function(&[], Idx::INT, false);
    let expected = f.r.unit_mut().pool_mut().member_pointer(class_ty, unary);
    assert_eq!(
        f.r.address_of_splice(method),
        Ok(SplicedAddress::PointerToMemberFunction {
            function: f.method,
            ty: expected,
        })
    );

    let helper = f.h(f.helper);
    let expected = f.r.unit_mut().pool_mut().pointer(unary);
    assert_eq!(
        f.r.address_of_splice(helper),
        Ok(SplicedAddress::FunctionPointer {
            function: f.helper,
            ty: expected,
        })
    );
}

#[test]
fn bit_fields_and_reference_members_have_no_address() {
    let mut f = fixture();
    let (bits, ref_member) = (f.h(f.bits), f.h(f.ref_member));
    assert_eq!(
        ill_formed(f.r.address_of_splice(bits)),
        IllFormed::BitFieldAddress("S::b".into())
    );
    assert!(matches!(
        ill_formed(f.r.address_of_splice(ref_member)),
        IllFormed::SpliceKindMismatch {
            found: "reference member",
            ..
        }
    ));
}

#[test]
fn object_and_template_addresses() {
    let mut f = fixture();
    let (var, fn_tmpl) = (f.h(f.var), f.h(f.fn_tmpl));
    let int_ptr = f.r.unit_mut().pool_mut().pointer(Idx::INT);
    assert_eq!(
        f.r.address_of_splice(var),
        Ok(SplicedAddress::ObjectPointer { ty: int_ptr })
    );
    assert_eq!(
        f.r.address_of_splice(fn_tmpl),
        Ok(SplicedAddress::UnresolvedOverloadAddress(f.fn_tmpl))
    );

    let five = f.r.reflect_int(Idx::INT, 5).unwrap();
    assert_eq!(
        ill_formed(f.r.address_of_splice(five)),
        IllFormed::SpliceKindMismatch {
            expected: "lvalue",
            found: "prvalue",
        }
    );
}
