//! Configuration schema types
//!
//! This module defines the configuration structure for hospital-sync.

use crate::config::SecretString;
use crate::domain::ids::DEFAULT_YEAR;
use crate::domain::{Locale, Year};
use serde::{Deserialize, Serialize};

/// Store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted realtime database over REST
    #[default]
    Rest,
    /// In-process store, optionally seeded from a JSON file
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Rest => write!(f, "rest"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(StoreBackend::Rest),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Invalid store.backend '{other}'. Must be one of: rest, memory"
            )),
        }
    }
}

/// Main hospital-sync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HospitalSyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Backing store connection
    #[serde(default)]
    pub store: StoreConfig,

    /// Repository behaviour
    #[serde(default)]
    pub hospitals: HospitalsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HospitalSyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.store.validate()?;
        self.hospitals.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Backing store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend implementation
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database URL, e.g. `https://my-project-default-rtdb.firebaseio.com`
    #[serde(default)]
    pub base_url: String,

    /// Database secret or ID token sent as the `auth` query parameter
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Timeout for a single request in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Timeout for establishing a connection in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// TLS certificate verification enabled
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// JSON file loaded into the memory backend at startup
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        match self.backend {
            StoreBackend::Rest => {
                if self.base_url.is_empty() {
                    return Err("store.base_url is required for the rest backend".to_string());
                }
                if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://")
                {
                    return Err(format!(
                        "store.base_url must start with http:// or https://, got '{}'",
                        self.base_url
                    ));
                }
            }
            StoreBackend::Memory => {
                if let Some(seed_file) = &self.seed_file {
                    if seed_file.trim().is_empty() {
                        return Err("store.seed_file must not be empty when set".to_string());
                    }
                }
            }
        }

        if self.timeout_seconds == 0 {
            return Err("store.timeout_seconds must be > 0".to_string());
        }
        if self.connect_timeout_seconds == 0 {
            return Err("store.connect_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            base_url: String::new(),
            auth_token: None,
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            tls_verify: true,
            seed_file: None,
        }
    }
}

/// Repository behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalsConfig {
    /// Year selected when the repository starts
    #[serde(default = "default_year")]
    pub default_year: String,

    /// Language of the user-facing error messages
    #[serde(default)]
    pub locale: Locale,

    /// Reject update/delete when the target record does not exist
    #[serde(default)]
    pub strict_partitions: bool,
}

impl HospitalsConfig {
    fn validate(&self) -> Result<(), String> {
        Year::new(self.default_year.clone())
            .map_err(|e| format!("Invalid hospitals.default_year: {e}"))?;
        Ok(())
    }
}

impl Default for HospitalsConfig {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            locale: Locale::default(),
            strict_partitions: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must not be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_year() -> String {
    DEFAULT_YEAR.to_string()
}

fn default_local_path() -> String {
    "/var/log/hospital-sync".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
