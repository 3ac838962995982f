use crate::config::ClientConfig;
use crate::config::client::{BASE_URL_ENV_VAR, CONFIG_FILE_NAME};
use crate::error::ConfigError;

use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: A missing config file yields defaults.
#[test]
fn given_missing_file_when_loaded_then_defaults() {
    let dir = TempDir::new().unwrap();

    let config = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(config.login_path, "/login");
    assert_eq!(config.storage_prefix, "app_");
}

/// **VALUE**: Save then load returns the same values and leaves no temp file behind.
#[test]
fn given_saved_config_when_loaded_then_values_match() {
    let dir = TempDir::new().unwrap();
    let config = ClientConfig {
        base_url: "https://console.example.com/api/".to_string(),
        timeout_ms: 2_500,
        debug_requests: false,
        ..ClientConfig::default()
    };

    config.save(dir.path()).unwrap();
    let loaded = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(loaded, config);
    assert!(!dir.path().join(format!("{CONFIG_FILE_NAME}.tmp")).exists());
}

/// **VALUE**: Invalid values are rejected with a validation error.
///
/// **BUG THIS CATCHES**: Would catch a zero timeout slipping through, which makes every
/// request fail instantly as a "timeout".
#[test]
fn given_invalid_values_when_validated_then_validation_error() {
    let cases = [
        ClientConfig {
            timeout_ms: 0,
            ..ClientConfig::default()
        },
        ClientConfig {
            base_url: "ftp://example.com".to_string(),
            ..ClientConfig::default()
        },
        ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        },
        ClientConfig {
            login_path: "login".to_string(),
            ..ClientConfig::default()
        },
    ];

    for config in cases {
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "{config:?} should be invalid"
        );
    }
}

/// **VALUE**: A corrupt file is a parse error, not silently replaced by defaults.
#[test]
fn given_corrupt_file_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "timeout_ms = \"soon\"").unwrap();

    let result = ClientConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: The environment overrides the configured base url.
#[test]
#[serial]
fn given_env_base_url_when_overrides_applied_then_env_wins() {
    // SAFETY: serialized with the other env-mutating tests.
    unsafe { std::env::set_var(BASE_URL_ENV_VAR, "http://10.0.0.5:9000/api/") };

    let config = ClientConfig::default().with_env_overrides();

    unsafe { std::env::remove_var(BASE_URL_ENV_VAR) };
    assert_eq!(config.unwrap().base_url, "http://10.0.0.5:9000/api/");
}
