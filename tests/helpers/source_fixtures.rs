//! Common MAL source fixtures for tests.

/// Required defines, prepended by [`with_header`].
pub const HEADER: &str = r#"
#id: "org.example.test"
#version: "1.0.0"
"#;

/// Prefix `body` with the required defines.
pub fn with_header(body: &str) -> String {
    format!("{HEADER}{body}")
}

/// Two assets joined by one association.
pub const USER_COMPUTER: &str = r#"
#id: "org.example.users"
#version: "1.0.0"

category System {
  asset User {
    | compromise
      -> computer.stealSecret
  }

  asset Computer {
    | stealSecret
  }
}

associations {
  User [user] 1 <-- Use --> 1 [computer] Computer
}
"#;

/// An inheritance tree with set operators, transitive paths, sub-type
/// narrowing and variables.
pub const NETWORK: &str = r#"
#id: "org.example.network"
#version: "0.4.2"

category Network
  user info: "Hosts and the networks connecting them"
{
  abstract asset Machine {
    | connect
      -> access

    & access
      -> data.read

    let peers = networks.hosts
  }

  asset Server extends Machine
    developer info: "A machine serving requests"
  {
    | connect
      +> peers().connect

    # patched
      -> access
  }

  asset Laptop extends Machine {
    | steal [Exponential(0.1)]
      -> access
  }

  asset Network {
    | reach
      -> hosts.connect,
         (hosts[Server] \/ hosts[Laptop]).access,
         parent*.reach
  }

  asset Data {
    | read {C}
  }
}

associations {
  Machine [hosts] * <-- Connects --> * [networks] Network
  Network [parent] 0..1 <-- Nesting --> * [children] Network
  Machine [owner] 1 <-- Stores --> * [data] Data
}
"#;
