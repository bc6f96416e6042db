//! Logging and observability
//!
//! Structured logging with `tracing`:
//! - Console output on stderr
//! - JSON file output with rotation
//! - Level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use hospital_sync::logging::init_logging;
//! use hospital_sync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(year = "2024", "Watching hospitals");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use hospital_sync::log_error_with_context;
/// use hospital_sync::domain::HospitalError;
///
/// let error = HospitalError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log one hospital list snapshot as seen by a consumer
///
/// # Example
///
/// ```no_run
/// use hospital_sync::log_hospital_snapshot;
///
/// log_hospital_snapshot!(12, 3, "2024");
/// ```
#[macro_export]
macro_rules! log_hospital_snapshot {
    ($total:expr, $in_year:expr, $year:expr) => {
        tracing::info!(
            total = $total,
            in_year = $in_year,
            year = %$year,
            "Hospital list updated"
        );
    };
}
