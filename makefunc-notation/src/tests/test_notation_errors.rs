//! Diagnostics for malformed or unresolvable notation

use crate::{parse_type, NotationError};
use makefunc_types::TypeRegistry;

fn parse_err(source: &str) -> NotationError {
    parse_type(source, &TypeRegistry::with_prelude()).unwrap_err()
}

#[test]
fn test_unknown_type_name() {
    match parse_err("[]Widget") {
        NotationError::UnknownType { name, span, .. } => {
            assert_eq!(name, "Widget");
            assert_eq!(span.offset(), 2);
            assert_eq!(span.len(), 6);
        }
        other => panic!("expected UnknownType, got {other:?}"),
    }
}

#[test]
fn test_misplaced_variadic() {
    assert!(matches!(
        parse_err("func(...int, string) error"),
        NotationError::MisplacedVariadic { .. }
    ));
}

#[test]
fn test_duplicate_members() {
    assert!(matches!(
        parse_err("struct { A int; A string }"),
        NotationError::DuplicateMember { what: "field", .. }
    ));
    assert!(matches!(
        parse_err("interface { Close() error; Close() error }"),
        NotationError::DuplicateMember { what: "method", .. }
    ));
}

#[test]
fn test_syntax_errors() {
    for source in ["", "[]", "map[string]", "func(int", "*", "int int"] {
        assert!(
            matches!(parse_err(source), NotationError::Syntax { .. }),
            "{source:?} should be a syntax error"
        );
    }
}

#[test]
fn test_expected_forms_are_listed_once() {
    match parse_err("[]") {
        NotationError::Syntax { message, .. } => {
            let mut seen = Vec::new();
            for form in message.trim_start_matches("expected ").split(", or ") {
                assert!(!seen.contains(&form), "{form:?} listed twice in {message:?}");
                seen.push(form);
            }
        }
        other => panic!("expected Syntax, got {other:?}"),
    }
}
