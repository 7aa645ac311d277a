use super::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_load_empty_config() {
    let config = ConfigLoader::load_str("").unwrap();
    assert_eq!(config.product.id, "playbooks");
    assert_eq!(config.metrics.address, ":9093");
    assert_eq!(config.metrics.refresh_interval(), Duration::from_secs(15 * 60));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[metrics]").unwrap();
    writeln!(file, "refresh_interval_secs = 60").unwrap();

    let config = ConfigLoader::load(file.path()).unwrap();
    assert_eq!(config.metrics.refresh_interval_secs, 60);
}

#[test]
fn test_load_nonexistent_file() {
    let result = ConfigLoader::load(Path::new("/nonexistent/path/playbooks.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_invalid_toml() {
    let result = ConfigLoader::load_str("invalid = [unclosed");
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_load_rejects_zero_interval() {
    let content = r#"
        [metrics]
        refresh_interval_secs = 0
    "#;
    let result = ConfigLoader::load_str(content);
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_load_telemetry_credentials() {
    let content = r#"
        [telemetry]
        dataplane_url = "https://dataplane.example.com"
        write_key = "key"
    "#;
    let config = ConfigLoader::load_str(content).unwrap();
    assert!(config.telemetry.credentials().is_some());
}

#[test]
fn test_expand_env_vars() {
    // SAFETY: This test sets a unique test-only env var
    unsafe {
        std::env::set_var("PLAYBOOKS_TEST_WRITE_KEY", "secret");
    }
    let content = "write_key = \"${PLAYBOOKS_TEST_WRITE_KEY}\"";
    let expanded = ConfigLoader::expand_env_vars(content).unwrap();
    assert!(expanded.contains("secret"));
    unsafe {
        std::env::remove_var("PLAYBOOKS_TEST_WRITE_KEY");
    }
}

#[test]
fn test_expand_env_vars_not_set() {
    let content = "value = \"${NONEXISTENT_PLAYBOOKS_VAR_12345}\"";
    let result = ConfigLoader::expand_env_vars(content);
    assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
}
