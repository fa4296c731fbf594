//! Structure of the converted model graph.

use mal::model::{AttackStepKind, Cia};
use mal::{ConvertError, Error, parse};

use crate::helpers::diagnostic_helpers::model;
use crate::helpers::source_fixtures::{NETWORK, USER_COMPUTER, with_header};

#[test]
fn test_defines() {
    let model = model(NETWORK);
    assert_eq!(model.define("id"), Some("org.example.network"));
    assert_eq!(model.define("version"), Some("0.4.2"));
    assert_eq!(model.define("missing"), None);
}

#[test]
fn test_categories_and_assets() {
    let model = model(NETWORK);
    let category = model.category("Network").unwrap();
    let names: Vec<_> = category
        .assets
        .iter()
        .map(|id| model[*id].name.as_str())
        .collect();
    assert_eq!(names, vec!["Machine", "Server", "Laptop", "Network", "Data"]);
    assert_eq!(
        category.meta.get("user").map(String::as_str),
        Some("Hosts and the networks connecting them")
    );

    let machine = model.asset("Machine").unwrap();
    assert!(machine.is_abstract);
    assert_eq!(machine.super_asset, None);

    let server = model.asset("Server").unwrap();
    assert_eq!(server.super_asset, model.asset_id("Machine"));
    assert_eq!(
        server.meta.get("developer").map(String::as_str),
        Some("A machine serving requests")
    );
}

#[test]
fn test_category_blocks_merge() {
    let source = with_header(
        r#"
category C
  user info: "first"
{
  asset A {}
}
category C
  developer info: "second"
{
  asset B {}
}
"#,
    );
    let model = model(&source);
    assert_eq!(model.categories().count(), 1);
    let category = model.category("C").unwrap();
    assert_eq!(category.assets.len(), 2);
    assert_eq!(category.meta.len(), 2);
}

#[test]
fn test_fields_are_paired() {
    let model = model(USER_COMPUTER);
    let user = model.asset_id("User").unwrap();
    let computer = model.asset_id("Computer").unwrap();

    let to_computer = model.field(user, "computer").unwrap();
    let to_user = model.field(computer, "user").unwrap();
    assert_eq!(model[to_computer].asset, user);
    assert_eq!(model[to_computer].target, to_user);
    assert_eq!(model[to_user].target, to_computer);
    assert_eq!(model[to_computer].link, model[to_user].link);

    let link = &model[model[to_computer].link];
    assert_eq!(link.name, "Use");
    assert_eq!(link.left_field, to_computer);
    assert_eq!(link.right_field, to_user);
}

#[test]
fn test_field_multiplicities() {
    let model = model(NETWORK);
    let network = model.asset_id("Network").unwrap();

    let parent = model.field(network, "parent").unwrap();
    assert_eq!((model[parent].min, model[parent].max), (0, Some(1)));

    let children = model.field(network, "children").unwrap();
    assert_eq!((model[children].min, model[children].max), (0, None));

    let data = model.asset_id("Data").unwrap();
    let owner = model.field(data, "owner").unwrap();
    assert_eq!((model[owner].min, model[owner].max), (1, Some(1)));
}

#[test]
fn test_fields_are_inherited() {
    let model = model(NETWORK);
    let server = model.asset_id("Server").unwrap();
    let machine = model.asset_id("Machine").unwrap();
    let networks = model.field(server, "networks").unwrap();
    assert_eq!(model[networks].asset, machine);
    assert!(model[server].fields.is_empty());
}

#[test]
fn test_attack_steps_override() {
    let model = model(NETWORK);
    let machine = model.asset_id("Machine").unwrap();
    let server = model.asset_id("Server").unwrap();
    let laptop = model.asset_id("Laptop").unwrap();

    let base = model.attack_step(machine, "connect").unwrap();
    let overriding = model.attack_step(server, "connect").unwrap();
    assert_ne!(base, overriding);
    assert!(model[overriding].inherits_reaches);
    assert!(!model[base].inherits_reaches);
    assert_eq!(model.attack_step(laptop, "connect"), Some(base));
    assert_eq!(model.attack_step(machine, "patched"), None);
}

#[test]
fn test_attack_step_details() {
    let model = model(NETWORK);
    let server = model.asset_id("Server").unwrap();
    let patched = &model[model.attack_step(server, "patched").unwrap()];
    assert_eq!(patched.kind, AttackStepKind::Defense);
    assert!(patched.ttc.is_none());

    let data = model.asset_id("Data").unwrap();
    let read = &model[model.attack_step(data, "read").unwrap()];
    assert_eq!(
        read.cia,
        Some(Cia {
            confidentiality: true,
            integrity: false,
            availability: false,
        })
    );

    let laptop = model.asset_id("Laptop").unwrap();
    let steal = &model[model.attack_step(laptop, "steal").unwrap()];
    assert_eq!(steal.ttc.as_ref().unwrap().to_string(), "Exponential(0.1)");
}

#[test]
fn test_ttc_expression_tree() {
    let source = with_header(
        "category C {\n  asset A {\n    | s [Exponential(0.1) + 2 * Gamma(1, 2)]\n    # d [Disabled]\n  }\n}\n",
    );
    let model = model(&source);
    let a = model.asset_id("A").unwrap();
    let s = &model[model.attack_step(a, "s").unwrap()];
    assert_eq!(
        s.ttc.as_ref().unwrap().to_string(),
        "(Exponential(0.1) + (2.0 * Gamma(1.0, 2.0)))"
    );
    let d = &model[model.attack_step(a, "d").unwrap()];
    assert_eq!(d.ttc.as_ref().unwrap().to_string(), "Disabled");
}

#[test]
fn test_reaches_paths() {
    let model = model(NETWORK);
    let network = model.asset_id("Network").unwrap();
    let reach = &model[model.attack_step(network, "reach").unwrap()];
    let rendered: Vec<_> = reach
        .reaches
        .iter()
        .map(|expr| expr.display(&model).to_string())
        .collect();
    assert_eq!(
        rendered,
        vec![
            "hosts.connect",
            "(hosts[Server] \\/ hosts[Laptop]).access",
            "parent*.reach",
        ]
    );
}

#[test]
fn test_requires_paths() {
    let source = with_header(
        r#"
category C {
  asset A {
    E hasB <- b
  }
  asset B {}
}
associations {
  A [a] * <-- L --> * [b] B
}
"#,
    );
    let model = model(&source);
    let a = model.asset_id("A").unwrap();
    let has_b = &model[model.attack_step(a, "hasB").unwrap()];
    assert_eq!(has_b.requires.len(), 1);
    assert_eq!(has_b.requires[0].display(&model).to_string(), "b");
    assert_eq!(has_b.requires[0].target, model.asset_id("B"));
}

#[test]
fn test_variables_convert_to_calls() {
    let model = model(NETWORK);
    let machine = model.asset_id("Machine").unwrap();
    let peers = model.variable(machine, "peers").unwrap();
    assert_eq!(model[peers].expr.display(&model).to_string(), "networks.hosts");
    assert_eq!(model[peers].expr.target, Some(machine));

    let server = model.asset_id("Server").unwrap();
    assert_eq!(model.variable(server, "peers"), Some(peers));

    let connect = &model[model.attack_step(server, "connect").unwrap()];
    assert_eq!(connect.reaches[0].display(&model).to_string(), "peers().connect");
}

#[test]
fn test_step_valued_variables_are_inlined() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> target
    let target = b.y
  }
  asset B {
    | y
  }
}
associations {
  A [a] * <-- L --> * [b] B
}
"#,
    );
    let model = model(&source);
    let a = model.asset_id("A").unwrap();
    let x = &model[model.attack_step(a, "x").unwrap()];
    assert_eq!(x.reaches[0].display(&model).to_string(), "b.y");
    assert_eq!(model.variables().count(), 0);
}

#[test]
fn test_compile_reports_semantic_errors() {
    let source = with_header("category C {\n  asset A {\n    | x\n      -> nope\n  }\n}\n");
    match mal::compile(&source, "test.mal") {
        Err(Error::Semantic(err)) => assert_eq!(err.errors().count(), 1),
        other => panic!("expected semantic error, got {other:?}"),
    }
}

#[test]
fn test_convert_unanalyzed_tree() {
    let source = with_header("category C {\n  asset A {\n    | x\n      -> nope\n  }\n}\n");
    let ast = parse(&source, "test.mal").unwrap();
    assert_eq!(
        mal::convert(&ast),
        Err(ConvertError::UnknownAttackStep {
            asset: "A".into(),
            step: "nope".into(),
        })
    );
}

#[test]
fn test_nested_sub_type_narrowing() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> p[B][B2].z
  }
  asset P {}
  asset B extends P {}
  asset B2 extends B {
    | z
  }
}
associations {
  A [a] * <-- L --> * [p] P
}
"#,
    );
    let model = model(&source);
    let a = model.asset_id("A").unwrap();
    let x = &model[model.attack_step(a, "x").unwrap()];
    assert_eq!(x.reaches[0].display(&model).to_string(), "p[B2].z");

    let b2 = model.asset_id("B2").unwrap();
    let z = model.attack_step(b2, "z").unwrap();
    assert_eq!(x.reaches[0].terminal_step(), Some(z));
    assert_eq!(model[z].parent_steps.len(), 1);
}

#[test]
fn test_calls_to_narrowed_variables() {
    let source = with_header(
        r#"
category C {
  asset A {
    | x
      -> v().z,
         w()[B2].z
    let v = b[B2]
    let w = b
  }
  asset B {}
  asset B2 extends B {
    | z
  }
}
associations {
  A [a] * <-- L --> * [b] B
}
"#,
    );
    let model = model(&source);
    let a = model.asset_id("A").unwrap();
    let v = model.variable(a, "v").unwrap();
    assert_eq!(model[v].expr.display(&model).to_string(), "b[B2]");

    let x = &model[model.attack_step(a, "x").unwrap()];
    assert_eq!(x.reaches[0].display(&model).to_string(), "v().z");
    assert_eq!(x.reaches[1].display(&model).to_string(), "w()[B2].z");
}
