//! Configuration management for hospital-sync.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! hospital-sync uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HOSPITAL_SYNC_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hospital_sync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hospital-sync.toml")?;
//!
//! println!("Store: {} ({})", config.store.base_url, config.store.backend);
//! println!("Default year: {}", config.hospitals.default_year);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`StoreConfig`] - Backend selection, URL, credentials, timeouts
//! - [`HospitalsConfig`] - Default year, message locale, partition checks
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [store]
//! backend = "rest"
//! base_url = "https://my-project-default-rtdb.firebaseio.com"
//! auth_token = "${HOSPITAL_SYNC_DB_SECRET}"
//!
//! [hospitals]
//! default_year = "2024"
//! locale = "ko"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str, DEFAULT_CONFIG_FILE};
pub use schema::{
    ApplicationConfig, HospitalSyncConfig, HospitalsConfig, LoggingConfig, StoreBackend,
    StoreConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
