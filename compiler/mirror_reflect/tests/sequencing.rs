//! Ordering and visibility of generative declarations across evaluations.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use common::{constexpr_init, reflector, static_assert, trial};
use mirror_diagnostic::ErrorCode;
use mirror_reflect::tu::{ClassKey, DeclId, TranslationUnit};
use mirror_reflect::{
    DataMemberOptions, EvalFailure, EvalState, Handle, MetaResult, ReflectConfig, Reflector,
};
use mirror_types::Idx;
use pretty_assertions::assert_eq;

fn with_classes(names: &[&str]) -> (Reflector, Vec<Handle>) {
    let mut unit = TranslationUnit::new();
    for name in names {
        unit.class(DeclId::GLOBAL, name, ClassKey::Struct);
    }
    let mut r = reflector(unit);
    let handles = names.iter().map(|n| r.reflect_path(n).unwrap()).collect();
    (r, handles)
}

fn int_member(r: &mut Reflector, name: &str) -> Handle {
    let int = r.reflect_type(Idx::INT);
    r.data_member_spec(int, &DataMemberOptions::named(name)).unwrap()
}

#[test]
fn later_plain_evaluations_see_earlier_definitions() {
    let (mut r, classes) = with_classes(&["S"]);
    let s = classes[0];
    let x = int_member(&mut r, "x");

    let define = static_assert(&mut r);
    r.evaluate(&define, |r| r.define_aggregate(s, &[x])).unwrap();

    let check = static_assert(&mut r);
    let count = r.evaluate(&check, |r| Ok(r.nonstatic_data_members_of(s)?.len()));
    assert_eq!(count, Ok(1));
}

/// Members and data members of `class`, queried inside one plain evaluation.
fn members_from_a_new_site(r: &mut Reflector, class: Handle) -> (Vec<Handle>, Vec<Handle>) {
    let site = static_assert(r);
    r.evaluate(&site, |r| Ok((r.members_of(class)?, r.nonstatic_data_members_of(class)?)))
        .unwrap()
}

fn names(r: &mut Reflector, members: &[Handle]) -> Vec<String> {
    members
        .iter()
        .map(|&m| r.identifier_of(m).unwrap().to_owned())
        .collect()
}

#[test]
fn member_order_is_stable_across_plain_evaluations() {
    let mut unit = TranslationUnit::new();
    let written = unit.class(DeclId::GLOBAL, "written", ClassKey::Struct);
    for name in ["c", "a", "b"] {
        unit.field(written, name, Idx::INT);
    }
    unit.complete(written);
    unit.class(DeclId::GLOBAL, "generated", ClassKey::Struct);
    let mut r = reflector(unit);
    let written = r.reflect_path("written").unwrap();
    let generated = r.reflect_path("generated").unwrap();

    let members = [int_member(&mut r, "z"), int_member(&mut r, "x"), int_member(&mut r, "y")];
    let define = static_assert(&mut r);
    r.evaluate(&define, |r| r.define_aggregate(generated, &members))
        .unwrap();

    for (class, order) in [(written, ["c", "a", "b"]), (generated, ["z", "x", "y"])] {
        let (all_first, data_first) = members_from_a_new_site(&mut r, class);
        let (all_second, data_second) = members_from_a_new_site(&mut r, class);
        assert_eq!(all_first, all_second);
        assert_eq!(data_first, data_second);
        assert_eq!(all_first, data_first);
        assert_eq!(names(&mut r, &data_first), order.map(str::to_owned).to_vec());
    }
}

#[test]
fn trial_evaluations_before_the_definition_see_an_incomplete_class() {
    let (mut r, classes) = with_classes(&["S"]);
    let s = classes[0];

    let before = trial(&mut r);
    let define = constexpr_init(&mut r);
    let after = trial(&mut r);
    r.evaluate(&define, |r| r.define_aggregate(s, &[])).unwrap();

    assert_eq!(r.evaluate(&before, |r| r.is_complete_type(s)), Ok(false));
    assert_eq!(r.evaluate(&after, |r| r.is_complete_type(s)), Ok(true));
    let members = r.evaluate(&before, |r| r.members_of(s));
    assert!(matches!(members, Err(EvalFailure::NotConstant(_))));
}

#[test]
fn plain_evaluations_out_of_lexical_order_are_rejected() {
    let (mut r, classes) = with_classes(&["S", "T"]);
    let (s, t) = (classes[0], classes[1]);
    let first = static_assert(&mut r);
    let second = static_assert(&mut r);

    r.evaluate(&second, |r| r.define_aggregate(t, &[])).unwrap();
    let out = r.evaluate(&first, |r| r.define_aggregate(s, &[]));
    assert!(matches!(out, Err(EvalFailure::Fatal(_))));
    assert_eq!(
        r.diagnostics().iter().map(|d| d.code).collect::<Vec<_>>(),
        vec![ErrorCode::E6001]
    );
    assert!(!r.is_complete_type(s).unwrap());
}

#[test]
fn failed_plain_evaluations_leave_no_declarations() {
    let (mut r, classes) = with_classes(&["S"]);
    let s = classes[0];
    let x = int_member(&mut r, "x");
    let decls = r.unit().decl_count();

    let site = static_assert(&mut r);
    let out: Result<(), _> = r.evaluate(&site, |r| {
        r.define_aggregate(s, &[x, x])?;
        Ok(())
    });
    assert!(out.is_err());
    assert_eq!(r.unit().decl_count(), decls);
    assert!(r.injections().is_empty());
    let record = r.evaluation_record(site.key).unwrap();
    assert_eq!(record.state, EvalState::Sequenced);
    assert!(!record.succeeded);
}

#[test]
fn each_injection_is_recorded_once() {
    let (mut r, classes) = with_classes(&["A", "B", "C"]);
    let site = static_assert(&mut r);
    let out = r.evaluate(&site, |r| {
        classes
            .iter()
            .map(|&class| r.define_aggregate(class, &[]))
            .collect::<MetaResult<Vec<_>>>()
    });
    assert_eq!(out, Ok(classes.clone()));

    let record = r.evaluation_record(site.key).unwrap();
    assert_eq!(record.produced.len(), 3);
    let produced = r.injections().produced_at(site.point).to_vec();
    assert_eq!(produced, record.produced.to_vec());
    for point in produced {
        let decl = r.injections().get(point).unwrap();
        assert_eq!(decl.site, site.point);
    }
}

#[test]
fn budget_bounds_runaway_generation() {
    let mut unit = TranslationUnit::new();
    unit.class(DeclId::GLOBAL, "S", ClassKey::Struct);
    let config = ReflectConfig::default().with_eval_budget(50);
    let mut r = Reflector::with_config(unit, config);
    let s = r.reflect_path("S").unwrap();

    let site = static_assert(&mut r);
    let out: Result<(), _> = r.evaluate(&site, |r| loop {
        r.is_complete_type(s)?;
    });
    assert!(matches!(out, Err(EvalFailure::Fatal(_))));
    assert_eq!(r.diagnostics().error_count(), 1);
}
