use claims::*;
use std::io::Write;
use subtrack::config::{ConfigLoadError, load_config_with_prefix};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_file() {
    let file = write_config(
        r#"
[api]
base_url = "https://subs.example.com/api/"
credentials_file = "/tmp/subtrack-test/credentials.json"
user_agent = "subtrack-tests"

[logging]
level = "debug"
file = "subtrack.log"

[display]
currency = "€"
top = 5
"#,
    );

    let config = assert_ok!(load_config_with_prefix(
        Some(file.path()),
        "SUBTRACK_TEST_FULL"
    ));
    assert_eq!(config.api().base_url(), "https://subs.example.com/api");
    assert_eq!(config.api().user_agent(), "subtrack-tests");
    assert_eq!(
        config.api().credentials_path().unwrap(),
        std::path::PathBuf::from("/tmp/subtrack-test/credentials.json")
    );
    assert_eq!(config.logging().level(), "debug");
    assert_eq!(config.logging().file(), Some("subtrack.log"));
    assert_eq!(config.display().currency(), "€");
    assert_eq!(config.display().top(), 5);
}

#[test]
fn test_missing_sections_use_defaults() {
    let file = write_config("");

    let config = assert_ok!(load_config_with_prefix(
        Some(file.path()),
        "SUBTRACK_TEST_EMPTY"
    ));
    assert_eq!(config.api().base_url(), client::config::DEFAULT_BASE_URL);
    assert_eq!(config.logging().level(), "warn");
    assert_none!(config.logging().file());
    assert_eq!(config.display().currency(), "$");
    assert_eq!(config.display().top(), 3);
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
[api]
base_url = "https://from-file.example.com/api"
"#,
    );
    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var(
            "SUBTRACK_TEST_ENV__API__BASE_URL",
            "https://from-env.example.com/api",
        );
    }

    let config = assert_ok!(load_config_with_prefix(
        Some(file.path()),
        "SUBTRACK_TEST_ENV"
    ));
    assert_eq!(config.api().base_url(), "https://from-env.example.com/api");
}

#[test]
fn test_explicit_file_must_exist() {
    let error = assert_err!(load_config_with_prefix(
        Some(std::path::Path::new("/nonexistent/subtrack/config.toml")),
        "SUBTRACK_TEST_MISSING"
    ));
    assert!(matches!(error, ConfigLoadError::Load(_)));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let file = write_config(
        r#"
[api]
base_url = "not a url"
"#,
    );

    let error = assert_err!(load_config_with_prefix(
        Some(file.path()),
        "SUBTRACK_TEST_BAD_URL"
    ));
    assert!(matches!(error, ConfigLoadError::Deserialize(_)));
}

#[test]
fn test_client_variables_fill_missing_api_fields() {
    let file = write_config(
        r#"
[api]
base_url = "https://from-file.example.com/api"
"#,
    );
    // SAFETY: other tests here either set user_agent in their file or never read it
    unsafe {
        std::env::set_var(client::config::USER_AGENT_ENV, "subtrack-env-agent");
    }

    let config = assert_ok!(load_config_with_prefix(
        Some(file.path()),
        "SUBTRACK_TEST_FALLBACK"
    ));
    assert_eq!(config.api().base_url(), "https://from-file.example.com/api");
    assert_eq!(config.api().user_agent(), "subtrack-env-agent");
}
