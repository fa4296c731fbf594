//! Path typing in `reaches`/`requires` bodies and variable resolution.

use rstest::rstest;

use crate::helpers::diagnostic_helpers::{
    analyze_source, assert_error, assert_no_errors, assert_warning, errors, warnings,
};
use crate::helpers::source_fixtures::{NETWORK, with_header};

/// `A` reaches `B` through field `b` and `C` through field `c`; `B` and `C`
/// share the ancestor `P` which declares `y`.
fn graph(a_body: &str) -> String {
    with_header(&format!(
        r#"
category C {{
  asset A {{
{a_body}
  }}
  asset P {{
    | y
  }}
  asset B extends P {{}}
  asset C extends P {{}}
  asset D {{
    | y
  }}
}}
associations {{
  A [a] * <-- L --> * [b] B
  A [a2] * <-- M --> * [c] C
  A [a3] * <-- N --> * [d] D
}}
"#
    ))
}

#[rstest]
#[case("    | x\n      -> b.y")]
#[case("    | x\n      -> (b \\/ c).y")]
#[case("    | x\n      -> (b /\\ c).y")]
#[case("    | x\n      -> (b - c).y")]
#[case("    | x\n      -> b[B].y")]
#[case("    | x\n      -> let t = b, t().y")]
#[case("    | x\n      -> v().y\n    let v = b \\/ c")]
#[case("    | x\n      -> w().y\n    let v = b\n    let w = v()")]
fn test_valid_paths(#[case] body: &str) {
    assert_no_errors(&graph(body));
}

#[rstest]
#[case("    | x\n      -> nope.y", "Field 'nope' not defined for asset 'A'")]
#[case("    | x\n      -> b.nope", "Attack step 'nope' not defined for asset 'B'")]
#[case("    | x\n      -> b[B]", "Last step is not attack step")]
#[case("    | x\n      -> (b \\/ d).y", "Types 'B' and 'D' have no common ancestor")]
#[case("    | x\n      -> b[C].y", "Asset 'B' cannot be of type 'C'")]
#[case("    | x\n      -> b[Q].y", "Asset 'Q' not defined")]
#[case("    | x\n      -> b*.y", "Previous asset 'B' is not of type 'A'")]
#[case("    | x\n      -> nope().y", "Variable 'nope' not defined for asset 'A'")]
fn test_invalid_paths(#[case] body: &str, #[case] message: &str) {
    assert_error(&graph(body), message);
}

#[test]
fn test_transitive_path_within_type() {
    assert_no_errors(NETWORK);
    let source = with_header(
        r#"
category C {
  asset Node {
    | visit
      -> next*.visit
  }
}
associations {
  Node [prev] * <-- Chain --> * [next] Node
}
"#,
    );
    assert_no_errors(&source);
}

#[test]
fn test_self_referencing_variable() {
    let source = graph("    | x\n      -> v().y\n    let v = v");
    let errors = errors(&source);
    assert!(
        errors.iter().any(|d| d.message == "Variable 'v' contains cycle 'v -> v'"),
        "{errors:?}"
    );
}

#[test]
fn test_variable_cycle_through_chain() {
    let source = graph("    | x\n      -> first().y\n    let first = second()\n    let second = first()");
    assert_error(&source, "Variable 'first' contains cycle 'first -> second -> first'");
}

#[test]
fn test_duplicate_variable() {
    let source = graph("    | x\n      -> v().y\n    let v = b\n    let v = c");
    assert_error(&source, "Variable 'v' previously defined at <test.mal:9:9>");
}

#[test]
fn test_variable_shadowing_field_warns() {
    let source = graph("    | x\n      -> b.y\n    let b = c");
    assert_warning(&source, "Step 'b' defined as variable at <test.mal:9:9> and field at");
}

#[test]
fn test_variable_shadowing_attack_step_warns() {
    let source = graph("    | x\n      -> s\n    | s\n    let s = b.y");
    assert_warning(&source, "Step 's' defined as variable at <test.mal:10:9> and attack step at <test.mal:9:7>");
}

#[test]
fn test_inherited_variable_resolves_in_declaring_asset() {
    let source = with_header(
        r#"
category C {
  asset Base {
    let targets = t
  }
  asset Sub extends Base {
    | x
      -> targets().y
  }
  asset T {
    | y
  }
}
associations {
  Base [base] * <-- L --> * [t] T
}
"#,
    );
    assert_no_errors(&source);
}

#[test]
fn test_local_variable_only_visible_at_path_head() {
    let source = graph("    | x\n      -> let t = c, b.t().y");
    assert_error(&source, "Variable 't' not defined for asset 'B'");
}

#[test]
fn test_member_variable_visible_after_dot() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> b.far().y
  }
  asset B {
    let far = c
  }
  asset C {
    | y
  }
}
associations {
  A [a] * <-- L --> * [b] B
  B [bs] * <-- M --> * [c] C
}
"#,
    );
    assert_no_errors(&source);
}

#[test]
fn test_unused_variable_warning() {
    let source = graph("    | x\n      -> b.y\n    let unused = c");
    let warnings = warnings(&source);
    assert!(
        warnings.iter().any(|d| d.message == "Variable 'unused' is never used"),
        "{warnings:?}"
    );
}

#[test]
fn test_reaches_errors_stop_before_association_checks() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> nope.y
  }
}
associations {
  A [a] * <-- L --> * [m] Missing
}
"#,
    );
    let (ok, diagnostics) = analyze_source(&source);
    assert!(!ok);
    assert!(
        diagnostics.iter().all(|d| !d.message.contains("Missing")),
        "{diagnostics:?}"
    );
}
