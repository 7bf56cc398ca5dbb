//! Integration tests for Settings config loading with layered precedence.
//!
//! Precedence (lowest to highest):
//! defaults → global file → --config file → legacy CF* variables → PCCCTL_* variables
//!
//! The environment is passed explicitly, so these tests never read the
//! process environment or a real global config.

use std::collections::HashMap;
use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use pccctl::application::ApplicationError;
use pccctl::config::Settings;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn given_no_sources_when_load_then_uses_defaults() {
    let settings = Settings::load_layers(None, None, &HashMap::new()).expect("load settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.cf_command, "cf");
    assert_eq!(settings.operator_user_prefix, "cluster_operator");
    assert_eq!(settings.http.timeout_secs, 30);
    assert!(!settings.http.accept_invalid_certs);
    assert!(settings.credentials.complete().is_none());
}

#[test]
fn given_missing_global_file_when_load_then_skips_it() {
    let temp = TempDir::new().unwrap();
    let global = temp.path().join("pccctl.toml");

    let settings = Settings::load_layers(Some(&global), None, &HashMap::new()).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_global_and_explicit_files_when_load_then_explicit_wins_per_field() {
    let temp = TempDir::new().unwrap();
    let global = temp.path().join("global.toml");
    let explicit = temp.path().join("explicit.toml");
    fs::write(
        &global,
        r#"
default_target = "pcc-global"
cf_command = "cf8"

[http]
timeout_secs = 10
accept_invalid_certs = true
"#,
    )
    .unwrap();
    fs::write(
        &explicit,
        r#"
default_target = "pcc-dev"

[http]
timeout_secs = 5
"#,
    )
    .unwrap();

    let settings = Settings::load_layers(Some(&global), Some(&explicit), &HashMap::new()).unwrap();

    assert_eq!(settings.default_target.as_deref(), Some("pcc-dev"));
    assert_eq!(settings.cf_command, "cf8");
    assert_eq!(settings.http.timeout_secs, 5);
    assert!(settings.http.accept_invalid_certs);
}

#[test]
fn given_missing_explicit_file_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.toml");

    let err = Settings::load_layers(None, Some(&missing), &HashMap::new()).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "default_target = [unclosed").unwrap();

    let err = Settings::load_layers(None, Some(&path), &HashMap::new()).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_legacy_variables_when_load_then_override_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pccctl.toml");
    fs::write(
        &path,
        r#"
default_target = "from-file"

[credentials]
username = "file-user"
"#,
    )
    .unwrap();
    let vars = env(&[
        ("CFPCC", "pcc1"),
        ("CFLOGIN", "admin"),
        ("CFPASSWORD", "secret"),
        ("CFENDPOINT", "https://localhost:7070/"),
    ]);

    let settings = Settings::load_layers(None, Some(&path), &vars).unwrap();

    assert_eq!(settings.default_target.as_deref(), Some("pcc1"));
    let creds = settings.credentials.complete().expect("complete credentials");
    assert_eq!(creds.username, "admin");
    assert_eq!(creds.password, "secret");
    assert_eq!(creds.base_url, "https://localhost:7070");
}

#[test]
fn given_empty_legacy_target_when_load_then_ignored() {
    let settings = Settings::load_layers(None, None, &env(&[("CFPCC", "")])).unwrap();
    assert_eq!(settings.default_target, None);
}

#[test]
fn given_prefixed_variables_when_load_then_override_legacy_and_nested_keys() {
    let vars = env(&[
        ("CFPCC", "legacy"),
        ("PCCCTL_DEFAULT_TARGET", "pcc2"),
        ("PCCCTL_CREDENTIALS__USERNAME", "op"),
        ("PCCCTL_HTTP__TIMEOUT_SECS", "90"),
        ("PCCCTL_HTTP__ACCEPT_INVALID_CERTS", "true"),
    ]);

    let settings = Settings::load_layers(None, None, &vars).unwrap();

    assert_eq!(settings.default_target.as_deref(), Some("pcc2"));
    assert_eq!(settings.credentials.username.as_deref(), Some("op"));
    assert_eq!(settings.http.timeout_secs, 90);
    assert!(settings.http.accept_invalid_certs);
}

#[test]
fn given_invalid_timeout_variable_when_load_then_config_error() {
    let vars = env(&[("PCCCTL_HTTP__TIMEOUT_SECS", "soon")]);

    let err = Settings::load_layers(None, None, &vars).unwrap_err();

    assert!(err.to_string().contains("PCCCTL_HTTP__TIMEOUT_SECS"));
}

#[rstest]
#[case::only_user(Some("u"), None, Some("https://c"))]
#[case::no_endpoint(Some("u"), Some("p"), None)]
#[case::empty_password(Some("u"), Some(""), Some("https://c"))]
fn given_partial_credentials_when_checking_then_incomplete(
    #[case] username: Option<&str>,
    #[case] password: Option<&str>,
    #[case] endpoint: Option<&str>,
) {
    let mut settings = Settings::default();
    settings.credentials.username = username.map(String::from);
    settings.credentials.password = password.map(String::from);
    settings.credentials.endpoint = endpoint.map(String::from);

    assert!(settings.credentials.complete().is_none());
}

#[test]
fn given_password_when_showing_config_then_it_is_masked() {
    let vars = env(&[("CFLOGIN", "admin"), ("CFPASSWORD", "topsecret")]);
    let settings = Settings::load_layers(None, None, &vars).unwrap();

    let shown = settings.to_toml().unwrap();

    assert!(shown.contains("admin"));
    assert!(!shown.contains("topsecret"));
    assert!(shown.contains("***"));
}
