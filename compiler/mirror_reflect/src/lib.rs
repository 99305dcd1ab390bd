//! Compile-time reflection.
//!
//! A [`Reflector`] wraps one [`TranslationUnit`] and exposes the reflection
//! surface over it:
//!
//! - **Handles** ([`handle`]): opaque scalars naming one program construct
//! - **Resolution** ([`resolve`], [`compare`]): lookup results to handles,
//!   and the equality chain over handles
//! - **Queries** ([`query`]): read-only metafunctions
//! - **Substitution** ([`substitute`]): template-ids without instantiation
//! - **Splices** ([`splice`]): handles back into grammar positions
//! - **Generation** ([`generate`]): `define_aggregate`
//! - **Evaluation** ([`eval`]): sequencing and reachability
//!
//! Every metafunction returns [`MetaResult`]. Failures are never handled
//! locally; they abort the enclosing [`Reflector::evaluate`].

mod config;
mod errors;
mod instantiate;
mod reflector;
mod stack;

pub mod compare;
pub mod eval;
pub mod generate;
pub mod handle;
pub mod query;
pub mod resolve;
pub mod runtime;
pub mod splice;
pub mod substitute;
pub mod tu;

pub use compare::{Comparison, ComparisonStep};
pub use config::{ReferenceMemberPolicy, ReflectConfig};
pub use errors::{EvalFailure, IllFormed, MetaError, MetaResult, Precondition};
pub use eval::{
    EvalKind, EvalRecord, EvalSite, EvalState, EvaluationContext, ExprKey, InjectedDecl,
    InjectionGraph, ManifestSite, PlainSite,
};
pub use handle::{Construct, Handle};
pub use query::{
    DataMemberOptions, DefaultedEquality, MemberComparison, MemberOffset, TypeRelation,
    TypeTrait, TypeTransform,
};
pub use reflector::Reflector;
pub use runtime::RuntimeView;
pub use splice::{SplicePrefix, SpliceSite, Spliced, SplicedAddress, ValueCategory};
pub use stack::ensure_sufficient_stack;
pub use tu::TranslationUnit;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; does nothing when `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

// A handle is pointer-sized, so only 64-bit targets build.
mod size_asserts {
    use super::Handle;
    mirror_ir::static_assert_size!(Handle, ::std::mem::size_of::<*const ()>());
}
