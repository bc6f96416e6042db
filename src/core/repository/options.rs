//! Repository options

use crate::config::HospitalsConfig;
use crate::domain::{HospitalError, Locale, Result, Year};

/// Behaviour switches of a [`HospitalRepository`](super::HospitalRepository)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Language of the messages placed in the error cell
    pub locale: Locale,

    /// Initial value of the selected-year cell
    pub default_year: Year,

    /// Check that the record exists before update/delete
    ///
    /// Off by default: a wrong year then silently targets a location that
    /// does not exist (update creates it, delete is a no-op).
    pub strict_partitions: bool,
}

impl RepositoryOptions {
    /// Build options from the `[hospitals]` configuration section
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `default_year` is not a valid key.
    pub fn from_config(config: &HospitalsConfig) -> Result<Self> {
        let default_year = Year::new(config.default_year.clone()).map_err(|e| {
            HospitalError::Configuration(format!("Invalid hospitals.default_year: {e}"))
        })?;

        Ok(Self {
            locale: config.locale,
            default_year,
            strict_partitions: config.strict_partitions,
        })
    }
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            default_year: Year::default(),
            strict_partitions: false,
        }
    }
}
