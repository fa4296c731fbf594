//! Attack step declarations, CIA classifications and TTC expressions.

use rstest::rstest;

use crate::helpers::diagnostic_helpers::{
    analyze_source, assert_error, assert_no_errors, assert_warning, errors,
};
use crate::helpers::source_fixtures::with_header;

fn single_asset(body: &str) -> String {
    with_header(&format!("category C {{\n  asset A {{\n{body}\n  }}\n}}\n"))
}

#[test]
fn test_step_shares_name_with_asset() {
    let source = single_asset("    | a");
    assert_error(&source, "Attack step 'a' shares name with asset 'A' defined at <test.mal:5:9>");
}

#[test]
fn test_duplicate_step_in_same_asset() {
    let source = single_asset("    | s\n    & s");
    assert_error(&source, "Attack step 's' previously defined at <test.mal:6:7>");
}

#[test]
fn test_override_with_same_kind() {
    let source = with_header(
        r#"
category C {
  asset Base {
    | s
  }
  asset Derived extends Base {
    | s
  }
}
"#,
    );
    assert_no_errors(&source);
}

#[test]
fn test_override_with_different_kind() {
    let source = with_header(
        r#"
category C {
  asset Base {
    | s
  }
  asset Derived extends Base {
    & s
  }
}
"#,
    );
    assert_error(
        &source,
        "Cannot override attack step 's' previously defined at <test.mal:7:7> with different type 'ALL' =/= 'ANY'",
    );
}

#[test]
fn test_override_kind_checked_against_nearest_ancestor() {
    let source = with_header(
        r#"
category C {
  asset Root {
    | s
  }
  asset Middle extends Root {
    | s
  }
  asset Leaf extends Middle {
    # s
  }
}
"#,
    );
    assert_error(&source, "previously defined at <test.mal:10:7> with different type 'DEFENSE' =/= 'ANY'");
}

#[test]
fn test_inherit_without_previous_definition() {
    let source = with_header(
        r#"
category C {
  asset A {
    | s
      +> t
    | t
  }
}
"#,
    );
    assert_error(&source, "Cannot inherit attack step 's' without previous definition");
}

#[test]
fn test_inherit_with_previous_definition() {
    let source = with_header(
        r#"
category C {
  asset Base {
    | s
      -> t
    | t
    | u
  }
  asset Derived extends Base {
    | s
      +> u
  }
}
"#,
    );
    assert_no_errors(&source);
}

#[rstest]
#[case("#")]
#[case("E")]
#[case("!E")]
fn test_cia_on_defense_and_existence(#[case] kind: &str) {
    let source = single_asset(&format!("    {kind} s {{C}}"));
    assert_error(&source, "Defenses cannot have CIA classifications");
}

#[test]
fn test_duplicate_cia_is_a_warning() {
    let source = single_asset("    | s {C, I, C}");
    assert_warning(&source, "Attack step A.s contains duplicate classification {C}");
}

#[rstest]
#[case("# d [Enabled]")]
#[case("# d [Disabled]")]
#[case("# d [Bernoulli(0.5)]")]
#[case("| s [Exponential(0.1) + 2 * Gamma(1, 2)]")]
#[case("& s [HardAndUncertain ^ 2]")]
#[case("| s [Bernoulli(0.5) * Exponential(1.0)]")]
#[case("| s []")]
fn test_valid_ttc(#[case] step: &str) {
    assert_no_errors(&single_asset(&format!("    {step}")));
}

#[rstest]
#[case("# d [Exponential(0.1)]", "Defense A.d may only have 'Enabled', 'Disabled', or 'Bernoulli(p)' as TTC")]
#[case("# d [Enabled + 1]", "Defense A.d may not have advanced TTC expressions")]
#[case("# d [Bernoulli(2)]", "is not in valid range")]
#[case("| s [Enabled]", "Distributions 'Enabled' or 'Disabled' may not be used as TTC values in '&' and '|' attack steps")]
#[case("| s [1 + Disabled]", "may not be used as TTC values")]
#[case("| s [Exponential(1.0) - Bernoulli(0.5)]", "TTC distribution 'Bernoulli' is not available in subtraction, division or exponential expressions.")]
#[case("| s [2 ^ EasyButUncertain]", "TTC distribution 'EasyButUncertain' is not available")]
#[case("| s [Exponential(1.0) / (2 + Bernoulli(0.5))]", "TTC distribution 'Bernoulli' is not available")]
#[case("| s [Exponential(0)]", "is not in valid range")]
#[case("| s [Exponential]", "Expected exactly")]
#[case("| s [Unknown(1)]", "Distribution 'Unknown' is not supported")]
fn test_invalid_ttc(#[case] step: &str, #[case] message: &str) {
    assert_error(&single_asset(&format!("    {step}")), message);
}

#[test]
fn test_existence_steps_checked_in_reaches_pass() {
    let source = with_header(
        r#"
category C {
  asset A {
    E withTtc [Exponential(1.0)] <- b
    !E noRequires
    | any <- b
  }
  asset B {}
}
associations {
  A [a] * <-- L --> * [b] B
}
"#,
    );
    let errors = errors(&source);
    let messages: Vec<_> = errors.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Attack step of type 'EXIST' must not have TTC",
            "Attack step of type 'NOTEXIST' must have require '<-'",
            "Require '<-' may only be defined for attack step type exist 'E' or not-exist '!E'",
        ]
    );
}

#[test]
fn test_existence_step_requires_resolve_to_assets() {
    let source = with_header(
        r#"
category C {
  asset A {
    E hasB <- b
    !E hasNoC <- b.c
  }
  asset B {}
  asset C {}
}
associations {
  A [a] * <-- L --> * [b] B
  B [bs] * <-- M --> * [c] C
}
"#,
    );
    let (ok, diagnostics) = analyze_source(&source);
    assert!(ok, "{diagnostics:?}");
}
