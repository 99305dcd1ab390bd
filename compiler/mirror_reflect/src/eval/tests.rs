use super::*;
use crate::errors::Precondition;
use crate::{ReflectConfig, TranslationUnit};
use mirror_types::Idx;
use pretty_assertions::assert_eq;

fn reflector() -> Reflector {
    Reflector::new(TranslationUnit::new())
}

fn plain(r: &mut Reflector) -> EvalSite {
    r.site(EvalKind::Plain(PlainSite::StaticAssert), Span::DUMMY)
}

fn trial(r: &mut Reflector) -> EvalSite {
    r.site(EvalKind::Manifest(ManifestSite::Trial), Span::DUMMY)
}

fn codes(r: &Reflector) -> Vec<ErrorCode> {
    r.diagnostics().iter().map(|d| d.code).collect()
}

#[test]
fn sites_take_increasing_points() {
    let mut r = reflector();
    let a = plain(&mut r);
    let b = trial(&mut r);
    assert!(a.point < b.point);
    assert_ne!(a.key, b.key);
}

#[test]
fn plain_evaluation_runs_once() {
    let mut r = reflector();
    let site = plain(&mut r);
    let mut runs = 0;
    let first = r.evaluate(&site, |_| {
        runs += 1;
        Ok(42)
    });
    let second = r.evaluate(&site, |_| {
        runs += 1;
        Ok(7)
    });
    assert_eq!(first, Ok(42));
    assert_eq!(second, Ok(42));
    assert_eq!(runs, 1);
}

#[test]
fn manifest_evaluation_may_repeat() {
    let mut r = reflector();
    let site = trial(&mut r);
    let mut runs = 0;
    for _ in 0..3 {
        let out = r.evaluate(&site, |_| {
            runs += 1;
            Ok(runs)
        });
        assert!(out.is_ok());
    }
    assert_eq!(runs, 3);
}

#[test]
fn plain_failure_is_memoized_and_fatal() {
    let mut r = reflector();
    let site = plain(&mut r);
    let first: Result<(), _> = r.evaluate(&site, |_| {
        Err(MetaError::not_constant("op", Precondition::NullReflection))
    });
    let Err(failure) = first else {
        panic!("expected failure");
    };
    assert!(failure.is_fatal());
    assert_eq!(codes(&r), vec![ErrorCode::E6002]);

    let again: Result<(), _> = r.evaluate(&site, |_| Ok(()));
    assert_eq!(again, Err(failure));
    assert_eq!(r.diagnostics().error_count(), 1);
}

#[test]
fn manifest_not_constant_is_not_diagnosed() {
    let mut r = reflector();
    let site = trial(&mut r);
    let out: Result<(), _> = r.evaluate(&site, |_| {
        Err(MetaError::not_constant("op", Precondition::NullReflection))
    });
    match out {
        Err(EvalFailure::NotConstant(diag)) => assert_eq!(diag.code, ErrorCode::E2001),
        other => panic!("expected NotConstant, got {other:?}"),
    }
    assert!(r.diagnostics().is_empty());
}

#[test]
fn plain_evaluations_must_arrive_in_order() {
    let mut r = reflector();
    let early = plain(&mut r);
    let late = plain(&mut r);
    assert_eq!(r.evaluate(&late, |_| Ok(1)), Ok(1));

    let out = r.evaluate(&early, |_| Ok(2));
    assert!(matches!(out, Err(EvalFailure::Fatal(_))));
    assert_eq!(codes(&r), vec![ErrorCode::E6001]);
}

#[test]
fn nested_evaluation_shares_the_outer_context() {
    let mut r = reflector();
    let outer = plain(&mut r);
    let inner = trial(&mut r);
    let points = r.evaluate(&outer, |r| {
        let outer_point = r.context().point();
        let inner_point = r.evaluate(&inner, |r| Ok(r.context().point()))?;
        Ok((outer_point, inner_point))
    });
    assert_eq!(points, Ok((outer.point, outer.point)));
}

#[test]
fn budget_is_per_outermost_evaluation() {
    let config = ReflectConfig::default().with_eval_budget(2);
    let mut r = Reflector::with_config(TranslationUnit::new(), config);
    let int = r.reflect_type(Idx::INT);

    let site = trial(&mut r);
    let out = r.evaluate(&site, |r| {
        r.dealias(int)?;
        r.dealias(int)?;
        r.dealias(int)
    });
    match out {
        Err(EvalFailure::NotConstant(diag)) => assert_eq!(diag.code, ErrorCode::E2002),
        other => panic!("expected budget failure, got {other:?}"),
    }

    let site = trial(&mut r);
    let out = r.evaluate(&site, |r| r.dealias(int));
    assert_eq!(out, Ok(int));
}

#[test]
fn depth_is_bounded() {
    let config = ReflectConfig::default().with_max_depth(2);
    let mut r = Reflector::with_config(TranslationUnit::new(), config);
    let a = trial(&mut r);
    let b = trial(&mut r);
    let c = trial(&mut r);
    let out = r.evaluate(&a, |r| {
        r.evaluate(&b, |r| {
            let innermost = r.evaluate(&c, |_| Ok(()));
            Ok(innermost)
        })
        .map_err(MetaError::from)
    });
    match out {
        Ok(Err(EvalFailure::NotConstant(diag))) => assert_eq!(diag.code, ErrorCode::E2003),
        other => panic!("expected depth failure, got {other:?}"),
    }
}

#[test]
fn outcomes_are_recorded() {
    let mut r = reflector();
    let site = plain(&mut r);
    assert_eq!(r.evaluation_record(site.key), None);
    assert_eq!(r.evaluate(&site, |_| Ok(())), Ok(()));

    let record = r.evaluation_record(site.key).cloned();
    assert_eq!(
        record,
        Some(EvalRecord {
            kind: site.kind,
            state: EvalState::Sequenced,
            produced: SmallVec::new(),
            succeeded: true,
        })
    );
    assert!(!r.is_evaluating());
}

#[test]
fn injection_requires_a_plain_frame() {
    let mut r = reflector();
    assert!(matches!(
        r.begin_injection(),
        Err(MetaError::IllFormed(IllFormed::NonPlainInjection { .. }))
    ));

    let site = r.site(EvalKind::Manifest(ManifestSite::ConstInitializer), Span::DUMMY);
    let out = r.evaluate(&site, |r| r.begin_injection().map(|_| ()));
    assert!(matches!(out, Err(EvalFailure::IllFormed(_))));
    assert_eq!(codes(&r), vec![ErrorCode::E5001]);
}

#[test]
fn context_grows_only() {
    let mut ctx = EvaluationContext::at(ProgramPoint::START);
    let mut graph = InjectionGraph::default();
    let ip = graph.record(InjectedDecl {
        target: crate::tu::DeclId::GLOBAL,
        locus: ProgramPoint::START,
        site: ProgramPoint::START,
    });
    assert!(!ctx.reaches(ProgramPoint::START, Some(ip)));
    ctx.add(ip);
    ctx.add(ip);
    assert_eq!(ctx.injected(), &[ip]);
    assert!(ctx.reaches(ProgramPoint::START, Some(ip)));
    assert_eq!(graph.produced_at(ProgramPoint::START), &[ip]);
}
