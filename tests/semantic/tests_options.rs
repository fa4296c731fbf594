//! Analyzer options.

use mal::semantic::{AnalyzerOptions, Severity};

use crate::helpers::diagnostic_helpers::{analyze_source, analyze_source_with};
use crate::helpers::source_fixtures::with_header;

const UNUSED: &str = r#"
category C {
  asset A {
    let v = b
  }
  asset B {}
}
associations {
  A [a] * <-- L --> * [b] B
}
"#;

#[test]
fn test_default_options() {
    let options = AnalyzerOptions::default();
    assert!(options.check_unused);
    assert!(!options.warnings_as_errors);
    assert!(options.require_version);
}

#[test]
fn test_unused_checks_enabled_by_default() {
    let (ok, diagnostics) = analyze_source(&with_header(UNUSED));
    assert!(ok);
    let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Variable 'v' is never used",
            "Association 'A [a] <-- L --> B [b]' is never used",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_unused_checks_disabled() {
    let options = AnalyzerOptions::default().with_check_unused(false);
    let (ok, diagnostics) = analyze_source_with(&with_header(UNUSED), &options);
    assert!(ok);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_warnings_as_errors() {
    let options = AnalyzerOptions::default().with_warnings_as_errors(true);
    let (ok, diagnostics) = analyze_source_with(&with_header(UNUSED), &options);
    assert!(!ok);
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn test_warnings_as_errors_without_warnings() {
    let options = AnalyzerOptions::default().with_warnings_as_errors(true);
    let source = with_header("category C {\n  asset A {}\n}\n");
    let (ok, diagnostics) = analyze_source_with(&source, &options);
    assert!(ok, "{diagnostics:?}");
}

#[test]
fn test_version_not_required() {
    let source = "#id: \"org.example\"\ncategory C {\n  asset A {}\n}\n";
    let (ok, _) = analyze_source(source);
    assert!(!ok);

    let options = AnalyzerOptions::default().with_require_version(false);
    let (ok, diagnostics) = analyze_source_with(source, &options);
    assert!(ok, "{diagnostics:?}");
}

#[test]
fn test_invalid_version_rejected_even_when_optional() {
    let source = "#id: \"org.example\"\n#version: \"1.0\"\n";
    let options = AnalyzerOptions::default().with_require_version(false);
    let (ok, _) = analyze_source_with(source, &options);
    assert!(!ok);
}
