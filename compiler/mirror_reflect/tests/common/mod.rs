//! Shared fixtures for the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use mirror_ir::Span;
use mirror_reflect::{EvalKind, EvalSite, ManifestSite, PlainSite, Reflector, TranslationUnit};

/// A reflector over `unit`, with tracing enabled when `RUST_LOG` is set.
pub fn reflector(unit: TranslationUnit) -> Reflector {
    mirror_reflect::init_tracing();
    Reflector::new(unit)
}

/// `static_assert(...)` at the current position.
pub fn static_assert(r: &mut Reflector) -> EvalSite {
    r.site(EvalKind::Plain(PlainSite::StaticAssert), Span::DUMMY)
}

/// A `constexpr` variable initializer at the current position.
pub fn constexpr_init(r: &mut Reflector) -> EvalSite {
    r.site(EvalKind::Plain(PlainSite::ConstexprInitializer), Span::DUMMY)
}

/// A `const` (not `constexpr`) variable initializer.
pub fn const_init(r: &mut Reflector) -> EvalSite {
    r.site(EvalKind::Manifest(ManifestSite::ConstInitializer), Span::DUMMY)
}

pub fn trial(r: &mut Reflector) -> EvalSite {
    r.site(EvalKind::Manifest(ManifestSite::Trial), Span::DUMMY)
}
