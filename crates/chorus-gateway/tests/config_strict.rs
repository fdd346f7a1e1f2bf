#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chorus_gateway::config::{self, NamePolicy};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:3000"
chat:
  name_polcy: rename # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:3000");
    assert_eq!(cfg.chat.name_policy, NamePolicy::Reject);
    assert_eq!(cfg.chat.welcome_for("alice"), "Welcome, alice!");
}

#[test]
fn name_policy_parses_lowercase() {
    let cfg = config::load_from_str("version: 1\nchat:\n  name_policy: rename\n").unwrap();
    assert_eq!(cfg.chat.name_policy, NamePolicy::Rename);

    let err = config::load_from_str("version: 1\nchat:\n  name_policy: Kick\n").unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");

    // Duplicate names would collapse keys in the compatibility map.
    let err = config::load_from_str("version: 1\nchat:\n  name_policy: allow\n").unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn wrong_version_is_rejected() {
    let err = config::load_from_str("version: 2\n").unwrap_err();
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn listen_must_be_a_socket_address() {
    let err = config::load_from_str("version: 1\ngateway:\n  listen: \"localhost\"\n").unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn idle_timeout_must_exceed_ping_interval() {
    let bad = r#"
version: 1
gateway:
  ping_interval_ms: 30000
  idle_timeout_ms: 20000
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn missing_explicit_file_is_fatal() {
    let err = config::load_from_file("/nonexistent/chorus.yaml").unwrap_err();
    assert_eq!(err.code().as_str(), "INTERNAL");
}
