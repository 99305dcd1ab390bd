use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_context() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_operation("members_of")
        .with_label(Span::new(0, 5), "here")
        .with_note("the class is incomplete at this point")
        .with_suggestion("complete the class before querying it");

    assert_eq!(diag.code, ErrorCode::E2001);
    assert!(diag.is_error());
    assert_eq!(diag.message, ErrorCode::E2001.description());
    assert_eq!(diag.operation, Some("members_of"));
    assert_eq!(diag.primary_span(), Some(Span::new(0, 5)));
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn later_label_replaces_earlier() {
    let diag = Diagnostic::error(ErrorCode::E5002)
        .with_label(Span::new(1, 2), "first")
        .with_label(Span::new(10, 15), "conflicting definition");

    assert_eq!(diag.primary_span(), Some(Span::new(10, 15)));
}

#[test]
fn display_lists_everything() {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("cannot splice a constructor")
        .with_operation("splice")
        .with_label(Span::new(0, 5), "here")
        .with_note("constructors have no name to splice");

    assert_eq!(
        diag.to_string(),
        "error[E3001]: cannot splice a constructor\n  --> 0..5: here\n  = in call to `splice`\n  = note: constructors have no name to splice"
    );
}

#[test]
fn warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E2099);
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "warning");
}
