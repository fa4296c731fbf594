//! Parent steps derived by reversing `reaches` paths.

use mal::Model;
use mal::model::StepKind;

use crate::helpers::diagnostic_helpers::model;
use crate::helpers::source_fixtures::{NETWORK, USER_COMPUTER, with_header};

fn parents(model: &Model, asset: &str, step: &str) -> Vec<String> {
    let asset = model.asset_id(asset).unwrap();
    let step = model.attack_step(asset, step).unwrap();
    model[step]
        .parent_steps
        .iter()
        .map(|expr| expr.display(model).to_string())
        .collect()
}

#[test]
fn test_single_field_path() {
    let model = model(USER_COMPUTER);
    assert_eq!(parents(&model, "Computer", "stealSecret"), vec!["user.compromise"]);
    assert!(parents(&model, "User", "compromise").is_empty());

    let computer = model.asset_id("Computer").unwrap();
    let user = model.asset_id("User").unwrap();
    let steal = model.attack_step(computer, "stealSecret").unwrap();
    let parent = &model[steal].parent_steps[0];
    assert_eq!(parent.sub_src, computer);
    assert_eq!(parent.terminal_step(), model.attack_step(user, "compromise"));
}

#[test]
fn test_local_steps_and_set_operators() {
    let model = model(NETWORK);
    assert_eq!(
        parents(&model, "Machine", "access"),
        vec!["connect", "patched", "steal", "(networks \\/ networks).reach"]
    );
}

#[test]
fn test_field_and_variable_paths() {
    let model = model(NETWORK);
    assert_eq!(
        parents(&model, "Machine", "connect"),
        vec!["reverse_peers()[Server].connect", "networks.reach"]
    );
    assert_eq!(parents(&model, "Data", "read"), vec!["owner.access"]);
}

#[test]
fn test_transitive_path() {
    let model = model(NETWORK);
    assert_eq!(parents(&model, "Network", "reach"), vec!["children*.reach"]);
}

#[test]
fn test_reverse_variables() {
    let model = model(NETWORK);
    let machine = model.asset_id("Machine").unwrap();
    let reversed = &model[machine].reverse_variables;
    assert_eq!(reversed.len(), 1);

    let variable = &model[reversed[0]];
    assert_eq!(variable.name, "reverse_peers");
    assert_eq!(variable.asset, machine);
    assert_eq!(variable.expr.display(&model).to_string(), "networks.hosts");
    assert!(!model[machine].variables.contains_key("reverse_peers"));
}

#[test]
fn test_multi_step_path() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> b.c.y
  }
  asset B {}
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
    let model = model(&source);
    assert_eq!(parents(&model, "C", "y"), vec!["bs.a.x"]);
}

#[test]
fn test_difference_keeps_operand_order() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> (b - c).y
  }
  asset P {
    | y
  }
  asset B extends P {}
  asset D extends P {}
}
associations {
  A [a] * <-- L --> * [b] B
  A [a2] * <-- M --> * [c] D
}
"#,
    );
    let model = model(&source);
    assert_eq!(parents(&model, "P", "y"), vec!["(a - a2).x"]);
}

#[test]
fn test_inherited_step_reached_from_subtype() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> b.y
  }
  asset Base {
    | y
  }
  asset B extends Base {}
}
associations {
  A [a] * <-- L --> * [b] B
}
"#,
    );
    let model = model(&source);
    assert_eq!(parents(&model, "Base", "y"), vec!["a.x"]);
    let base = model.asset_id("Base").unwrap();
    let b = model.asset_id("B").unwrap();
    let y = model.attack_step(base, "y").unwrap();
    assert_eq!(model.attack_step(b, "y"), Some(y));
    assert_eq!(model[y].parent_steps[0].sub_src, b);
}

#[test]
fn test_inherited_step_variable_narrows_to_user() {
    let source = with_header(
        r#"
category C {
  asset P {
    let v = b.y
  }
  asset Q extends P {
    | x
      -> v
  }
  asset B {
    | y
  }
}
associations {
  P [a] * <-- L --> * [b] B
}
"#,
    );
    let model = model(&source);
    assert_eq!(parents(&model, "B", "y"), vec!["a[Q].x"]);

    let b = model.asset_id("B").unwrap();
    let q = model.asset_id("Q").unwrap();
    let y = model.attack_step(b, "y").unwrap();
    let StepKind::Collect(path, step) = &model[y].parent_steps[0].kind else {
        panic!("expected a collect node");
    };
    assert_eq!(path.sub_target, Some(q));
    assert_eq!(step.src, q);
}
