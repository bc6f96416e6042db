//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use hospital_sync::config::{load_config, StoreBackend};
use hospital_sync::domain::Locale;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("HOSPITAL_SYNC_APPLICATION_LOG_LEVEL");
    std::env::remove_var("HOSPITAL_SYNC_STORE_BACKEND");
    std::env::remove_var("HOSPITAL_SYNC_STORE_BASE_URL");
    std::env::remove_var("HOSPITAL_SYNC_STORE_TIMEOUT_SECONDS");
    std::env::remove_var("HOSPITAL_SYNC_HOSPITALS_DEFAULT_YEAR");
    std::env::remove_var("HOSPITAL_SYNC_HOSPITALS_LOCALE");
    std::env::remove_var("HOSPITAL_SYNC_HOSPITALS_STRICT_PARTITIONS");
    std::env::remove_var("TEST_STORE_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[store]
backend = "rest"
base_url = "https://hospitals-demo.firebaseio.com"
auth_token = "token-12345"
timeout_seconds = 45
connect_timeout_seconds = 5
tls_verify = false

[hospitals]
default_year = "2025"
locale = "en"
strict_partitions = true

[logging]
local_enabled = false
local_path = "/tmp/hospital-sync"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.store.backend, StoreBackend::Rest);
    assert_eq!(config.store.base_url, "https://hospitals-demo.firebaseio.com");
    assert_eq!(
        config.store.auth_token.as_ref().unwrap().expose_secret(),
        "token-12345"
    );
    assert_eq!(config.store.timeout_seconds, 45);
    assert_eq!(config.store.connect_timeout_seconds, 5);
    assert!(!config.store.tls_verify);
    assert_eq!(config.hospitals.default_year, "2025");
    assert_eq!(config.hospitals.locale, Locale::En);
    assert!(config.hospitals.strict_partitions);
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_memory_config_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[store]
backend = "memory"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.hospitals.default_year, "2024");
    assert_eq!(config.hospitals.locale, Locale::Ko);
    assert!(!config.hospitals.strict_partitions);
    assert!(config.store.seed_file.is_none());
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_STORE_TOKEN", "substituted-token");

    let temp_file = write_config(
        r#"
[store]
base_url = "https://hospitals-demo.firebaseio.com"
# auth_token = "${NOT_SET_ANYWHERE}"
auth_token = "${TEST_STORE_TOKEN}"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(
        config.store.auth_token.as_ref().unwrap().expose_secret(),
        "substituted-token"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[store]
base_url = "https://hospitals-demo.firebaseio.com"
auth_token = "${TEST_STORE_TOKEN}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_STORE_TOKEN"));
}

#[test]
fn test_env_var_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[store]
base_url = "https://hospitals-demo.firebaseio.com"
timeout_seconds = 30

[hospitals]
default_year = "2024"
"#,
    );

    std::env::set_var("HOSPITAL_SYNC_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("HOSPITAL_SYNC_STORE_TIMEOUT_SECONDS", "90");
    std::env::set_var("HOSPITAL_SYNC_HOSPITALS_DEFAULT_YEAR", "2023");
    std::env::set_var("HOSPITAL_SYNC_HOSPITALS_LOCALE", "en");
    std::env::set_var("HOSPITAL_SYNC_HOSPITALS_STRICT_PARTITIONS", "true");

    let result = load_config(temp_file.path());
    cleanup_env_vars();
    let config = result.unwrap();

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.store.timeout_seconds, 90);
    assert_eq!(config.hospitals.default_year, "2023");
    assert_eq!(config.hospitals.locale, Locale::En);
    assert!(config.hospitals.strict_partitions);
}

#[test]
fn test_backend_override_switches_to_memory() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    // No base_url: only valid once the backend is overridden to memory
    let temp_file = write_config("[hospitals]\ndefault_year = \"2024\"\n");

    assert!(load_config(temp_file.path()).is_err());

    std::env::set_var("HOSPITAL_SYNC_STORE_BACKEND", "memory");
    let result = load_config(temp_file.path());
    cleanup_env_vars();

    assert_eq!(result.unwrap().store.backend, StoreBackend::Memory);
}

#[test]
fn test_invalid_override_value() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config("[store]\nbackend = \"memory\"\n");
    std::env::set_var("HOSPITAL_SYNC_STORE_TIMEOUT_SECONDS", "soon");

    let result = load_config(temp_file.path());
    cleanup_env_vars();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("HOSPITAL_SYNC_STORE_TIMEOUT_SECONDS"));
}

#[test]
fn test_invalid_config_validation() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"loud\"\n[store]\nbackend = \"memory\"\n",
        "[store]\nbase_url = \"ftp://hospitals.example.com\"\n",
        "[store]\nbackend = \"memory\"\ntimeout_seconds = 0\n",
        "[store]\nbackend = \"memory\"\n[hospitals]\ndefault_year = \"20/24\"\n",
        "[store]\nbackend = \"memory\"\n[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for contents in cases {
        let temp_file = write_config(contents);
        let result = load_config(temp_file.path());
        assert!(result.is_err(), "expected failure for:\n{contents}");
    }
}

#[test]
fn test_missing_config_file() {
    let result = load_config("/nonexistent/hospital-sync.toml");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}
