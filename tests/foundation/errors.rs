//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use std::error::Error as _;

use uniform_foundation::{BoxError, Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_command() {
    let err = Error::unknown_command("fly");
    assert!(matches!(err.kind, ErrorKind::UnknownCommand { ref name } if name == "fly"));
    assert_eq!(err.to_string(), "unknown command: fly");
}

#[test]
fn error_permission_denied() {
    let err = Error::permission_denied("gamemode", "uniform.gamemode");
    let msg = format!("{err}");
    assert!(msg.contains("gamemode"));
    assert!(msg.contains("uniform.gamemode"));
}

#[test]
fn error_syntax_displays_reason_only() {
    let err = Error::syntax("times", "expected integer");
    assert_eq!(err.to_string(), "expected integer");
}

#[test]
fn error_incomplete() {
    let err = Error::incomplete("greet");
    assert!(matches!(err.kind, ErrorKind::IncompleteCommand { .. }));
    assert!(err.to_string().contains("greet"));
}

#[test]
fn error_invalid_grammar() {
    let err = Error::invalid_grammar("duplicate literal 'a'");
    assert!(matches!(err.kind, ErrorKind::InvalidGrammar(_)));
    assert!(!err.is_parse_failure());
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn parse_failures() {
    assert!(Error::unknown_command("x").is_parse_failure());
    assert!(Error::condition_not_met("x").is_parse_failure());
    assert!(Error::permission_denied("x", "p").is_parse_failure());
    assert!(Error::syntax("x", "bad").is_parse_failure());
    assert!(Error::incomplete("x").is_parse_failure());
    assert!(!Error::new(ErrorKind::DuplicateCommand("x".into())).is_parse_failure());
}

#[test]
fn execution_failure_keeps_source() {
    let cause: BoxError = "disk full".into();
    let err = Error::execution_failure("save", cause);
    assert_eq!(err.to_string(), "command save failed: disk full");
    assert_eq!(err.kind.source().map(ToString::to_string).as_deref(), Some("disk full"));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_cursor() {
    let err = Error::syntax("times", "expected integer").at("greet Alice x", 12);
    assert_eq!(err.cursor(), Some(12));
    assert_eq!(Error::incomplete("x").cursor(), None);
}

#[test]
fn context_short_input_is_not_truncated() {
    let ctx = ErrorContext::new("tp 1", 3);
    assert_eq!(ctx.to_string(), "tp <--[HERE]");
}

#[test]
fn context_long_input_keeps_last_ten_chars() {
    let ctx = ErrorContext::new("broadcast hello everyone", 24);
    assert_eq!(ctx.excerpt(), "...o everyone");
}

#[test]
fn context_cursor_past_end_is_clamped() {
    let ctx = ErrorContext::new("abc", 10);
    assert_eq!(ctx.excerpt(), "abc");
}

#[test]
fn context_respects_char_boundaries() {
    let ctx = ErrorContext::new("héllo", 2);
    assert_eq!(ctx.excerpt(), "h");
}
