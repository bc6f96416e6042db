//! Shared setup for commands that talk to the store

use crate::adapters::store::create_store;
use crate::config::{load_config, HospitalSyncConfig};
use crate::core::repository::{HospitalRepository, RepositoryOptions};
use crate::domain::HospitalError;

/// Loaded configuration plus a repository over the configured store
pub struct Session {
    pub config: HospitalSyncConfig,
    pub repository: HospitalRepository,
}

impl Session {
    /// Load configuration and connect the repository
    ///
    /// On failure the problem has already been printed and the exit code to
    /// return is given back.
    pub fn open(config_path: &str) -> Result<Self, i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Err(2);
            }
        };

        let options = match RepositoryOptions::from_config(&config.hospitals) {
            Ok(o) => o,
            Err(e) => {
                println!("❌ Invalid [hospitals] configuration");
                println!("   Error: {e}");
                return Err(2);
            }
        };

        let store = match create_store(&config.store) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to create store client");
                println!("   Error: {e}");
                return Err(exit_code_for(&e));
            }
        };

        tracing::debug!(backend = store.backend_name(), "Store client ready");

        Ok(Self {
            config,
            repository: HospitalRepository::new(store, options),
        })
    }
}

/// Exit code for a failed repository call
///
/// 2 for configuration or input problems, 4 for store and connection
/// failures, 5 for anything else.
pub fn exit_code_for(err: &HospitalError) -> i32 {
    match err {
        HospitalError::Configuration(_) | HospitalError::Validation(_) => 2,
        HospitalError::Store(_) | HospitalError::Subscription(_) | HospitalError::NotFound(_) => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;
    use test_case::test_case;

    #[test_case(HospitalError::Configuration("x".into()), 2)]
    #[test_case(HospitalError::Validation("x".into()), 2)]
    #[test_case(HospitalError::Store(StoreError::Timeout("x".into())), 4)]
    #[test_case(HospitalError::NotFound("x".into()), 4)]
    #[test_case(HospitalError::Other("x".into()), 5)]
    fn test_exit_code_for(err: HospitalError, expected: i32) {
        assert_eq!(exit_code_for(&err), expected);
    }

    #[test]
    fn test_open_missing_config() {
        assert!(matches!(Session::open("/nonexistent/hospital-sync.toml"), Err(2)));
    }
}
