//! Syntax errors stop parsing at the first offending token.

use mal::{ParseError, parse};
use rstest::rstest;

use crate::helpers::source_fixtures::with_header;

fn parse_error(source: &str) -> ParseError {
    match parse(source, "test.mal") {
        Ok(ast) => panic!("expected a syntax error, parsed {ast:?}"),
        Err(err) => err,
    }
}

#[rstest]
#[case("A [a] 0 <-- L --> * [b] B", "Invalid multiplicity '0'")]
#[case("A [a] *..1 <-- L --> * [b] B", "Invalid multiplicity '*..1'")]
#[case("A [a] 1..0 <-- L --> * [b] B", "Invalid multiplicity '1..0'")]
#[case("A [a] 2 <-- L --> * [b] B", "expected '0', '1' or '*', found")]
fn test_invalid_multiplicity(#[case] association: &str, #[case] message: &str) {
    let source = format!("associations {{\n  {association}\n}}\n");
    let err = parse_error(&source);
    assert!(
        err.message.contains(message),
        "expected {message:?}, got {:?}",
        err.message
    );
}

#[test]
fn test_unexpected_top_level_token() {
    let err = parse_error("asset A {}");
    assert_eq!(
        err.message,
        "expected 'category', 'associations', 'include' or '#', found 'asset'"
    );
    assert_eq!((err.position.line, err.position.column), (1, 1));
}

#[test]
fn test_error_display_includes_position() {
    let err = parse_error("category C {\n  asset A {\n    | \n  }\n}\n");
    let rendered = err.to_string();
    assert!(rendered.starts_with("<test.mal:4:3>"), "got {rendered}");
}

#[test]
fn test_missing_reaches_target() {
    let source = with_header("category C {\n  asset A {\n    | s ->\n  }\n}\n");
    let err = parse_error(&source);
    assert!(err.message.starts_with("expected '(' or identifier"), "got {}", err.message);
}

#[test]
fn test_invalid_cia_letter() {
    let source = with_header("category C {\n  asset A {\n    | s {X}\n  }\n}\n");
    let err = parse_error(&source);
    assert!(err.message.contains("'C', 'I', 'A' or '}'"), "got {}", err.message);
}

#[test]
fn test_unterminated_category() {
    let err = parse_error("category C {\n  asset A {}\n");
    assert!(err.message.contains("found end of file"), "got {}", err.message);
}
