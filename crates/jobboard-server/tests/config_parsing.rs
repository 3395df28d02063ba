use std::{env, fs};

use jobboard_auth::MarkerPolicy;
use jobboard_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("jobboard.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 2048

[logging]
level = "debug"

[gate]
protected_prefix = "/backoffice"
login_path = "/backoffice/login"
cookie_name = "bo_auth"

[cache]
default_ttl_ms = 1000
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.gate.protected_prefix, "/backoffice");
    assert_eq!(cfg.gate.cookie_name, "bo_auth");
    assert_eq!(cfg.gate.policy, MarkerPolicy::Presence);
    assert_eq!(cfg.cache.default_ttl_ms, 1000);
    assert_eq!(cfg.cache.max_featured_limit, 50);

    // 2) Env override should win over file
    unsafe {
        env::set_var("JOBBOARD__LOGGING__LEVEL", "warn");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.logging.level, "warn");
    unsafe {
        env::remove_var("JOBBOARD__LOGGING__LEVEL");
    }

    // 3) Signed policy without a secret is rejected
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[gate]
policy = "signed"
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("signing_secret"), "{err}");

    // 4) Signed policy with a secret is accepted
    let signed_path = dir.path().join("signed.toml");
    let signed_toml = r#"
[gate]
policy = "signed"
signing_secret = "0123456789abcdef0123456789abcdef"
"#;
    fs::write(&signed_path, signed_toml).expect("write signed toml");
    let cfg = load_config(signed_path.to_str()).expect("signed config parses");
    assert_eq!(cfg.gate.policy, MarkerPolicy::Signed);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("does-not-exist.toml");

    let cfg = load_config(path.to_str()).expect("defaults are valid");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.gate.login_path, "/admin/login");
    assert_eq!(cfg.cache.default_ttl_ms, 300_000);
}

#[test]
fn zero_ttl_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("zero.toml");
    fs::write(&path, "[cache]\ndefault_ttl_ms = 0\n").expect("write toml");

    let err = load_config(path.to_str()).expect_err("zero ttl is invalid");
    assert!(err.contains("default_ttl_ms"), "{err}");
}
