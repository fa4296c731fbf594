//! Diagnostic assertion helpers.

use mal::semantic::{AnalyzerOptions, Diagnostic, Severity, analyze_with};
use mal::{Model, parse};

/// Parse and analyze `source`, returning every diagnostic and whether the
/// analysis succeeded.
pub fn analyze_source_with(source: &str, options: &AnalyzerOptions) -> (bool, Vec<Diagnostic>) {
    let ast = parse(source, "test.mal").unwrap();
    match analyze_with(&ast, options) {
        Ok(analysis) => (true, analysis.diagnostics),
        Err(err) => (false, err.diagnostics),
    }
}

pub fn analyze_source(source: &str) -> (bool, Vec<Diagnostic>) {
    analyze_source_with(source, &AnalyzerOptions::default())
}

pub fn diagnostics(source: &str) -> Vec<Diagnostic> {
    analyze_source(source).1
}

pub fn errors(source: &str) -> Vec<Diagnostic> {
    diagnostics(source)
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .collect()
}

pub fn warnings(source: &str) -> Vec<Diagnostic> {
    diagnostics(source)
        .into_iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect()
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn has_error_containing(diagnostics: &[Diagnostic], text: &str) -> bool {
    diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error && d.message.contains(text))
}

pub fn has_warning_containing(diagnostics: &[Diagnostic], text: &str) -> bool {
    diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains(text))
}

/// Assert `source` fails analysis with an error containing `text`.
pub fn assert_error(source: &str, text: &str) {
    let (ok, diagnostics) = analyze_source(source);
    assert!(!ok, "Expected analysis to fail, got:\n{}", render(&diagnostics));
    assert!(
        has_error_containing(&diagnostics, text),
        "Expected an error containing {text:?}, got:\n{}",
        render(&diagnostics)
    );
}

/// Assert `source` passes analysis with a warning containing `text`.
pub fn assert_warning(source: &str, text: &str) {
    let (ok, diagnostics) = analyze_source(source);
    assert!(ok, "Expected analysis to pass, got:\n{}", render(&diagnostics));
    assert!(
        has_warning_containing(&diagnostics, text),
        "Expected a warning containing {text:?}, got:\n{}",
        render(&diagnostics)
    );
}

/// Assert `source` has no errors.
pub fn assert_no_errors(source: &str) {
    let errors = errors(source);
    assert!(
        errors.is_empty(),
        "Expected no errors, got {} error(s):\n{}",
        errors.len(),
        render(&errors)
    );
}

/// Compile `source` all the way to a model.
pub fn model(source: &str) -> Model {
    match mal::compile(source, "test.mal") {
        Ok(model) => model,
        Err(err) => panic!("compilation failed: {err}\n{err:?}"),
    }
}
