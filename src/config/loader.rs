//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::HospitalSyncConfig;
use super::secret::secret_string;
use crate::domain::errors::HospitalError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "hospital-sync.toml";

/// Prefix of override environment variables
pub const ENV_PREFIX: &str = "HOSPITAL_SYNC";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into HospitalSyncConfig
/// 4. Applies environment variable overrides (HOSPITAL_SYNC_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use hospital_sync::config::loader::load_config;
///
/// let config = load_config("hospital-sync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<HospitalSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HospitalError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HospitalError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Parses configuration from TOML text, applying the same substitution,
/// overrides and validation as [`load_config`]
pub fn load_config_from_str(contents: &str) -> Result<HospitalSyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: HospitalSyncConfig = toml::from_str(&contents)
        .map_err(|e| HospitalError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        HospitalError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched. Every missing variable is reported in
/// a single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| HospitalError::Other(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(HospitalError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(section: &str, key: &str, raw: &str) -> Result<T> {
    raw.parse().map_err(|_| {
        HospitalError::Configuration(format!(
            "Invalid value '{raw}' in {ENV_PREFIX}_{section}_{key}"
        ))
    })
}

/// Applies environment variable overrides using HOSPITAL_SYNC_* prefix
///
/// Environment variables follow the pattern: HOSPITAL_SYNC_<SECTION>_<KEY>
/// For example: HOSPITAL_SYNC_STORE_BASE_URL, HOSPITAL_SYNC_HOSPITALS_LOCALE
fn apply_env_overrides(config: &mut HospitalSyncConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Store overrides
    if let Some(val) = env_override("STORE", "BACKEND") {
        config.store.backend = val.parse().map_err(HospitalError::Configuration)?;
    }
    if let Some(val) = env_override("STORE", "BASE_URL") {
        config.store.base_url = val;
    }
    if let Some(val) = env_override("STORE", "AUTH_TOKEN") {
        config.store.auth_token = Some(secret_string(val));
    }
    if let Some(val) = env_override("STORE", "TIMEOUT_SECONDS") {
        config.store.timeout_seconds = parse_override("STORE", "TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = env_override("STORE", "CONNECT_TIMEOUT_SECONDS") {
        config.store.connect_timeout_seconds =
            parse_override("STORE", "CONNECT_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = env_override("STORE", "TLS_VERIFY") {
        config.store.tls_verify = val.parse().unwrap_or(true);
    }
    if let Some(val) = env_override("STORE", "SEED_FILE") {
        config.store.seed_file = Some(val);
    }

    // Hospitals overrides
    if let Some(val) = env_override("HOSPITALS", "DEFAULT_YEAR") {
        config.hospitals.default_year = val;
    }
    if let Some(val) = env_override("HOSPITALS", "LOCALE") {
        config.hospitals.locale = val.parse().map_err(HospitalError::Configuration)?;
    }
    if let Some(val) = env_override("HOSPITALS", "STRICT_PARTITIONS") {
        config.hospitals.strict_partitions = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Some(val) = env_override("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
