//! Diagnostic system for reflection failures.
//!
//! Every failing metafunction, splice or generative call ends up here as a
//! [`Diagnostic`] naming the operation and the rule it broke:
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Notes (which precondition was unmet)
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! emitted into a [`DiagnosticQueue`]:
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn finish() -> Result<Output, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::DiagnosticQueue;
