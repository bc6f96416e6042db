//! Store factory
//!
//! This module creates the configured store backend.

use crate::adapters::memory::MemoryStore;
use crate::adapters::rest::RestStore;
use crate::adapters::store::traits::RealtimeStore;
use crate::config::schema::{StoreBackend, StoreConfig};
use crate::domain::{HospitalError, Result};
use std::fs;
use std::sync::Arc;

/// Create a store client based on the configuration
///
/// # Arguments
///
/// * `config` - The `[store]` section of the configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements `RealtimeStore`
///
/// # Errors
///
/// Returns an error if the REST client cannot be built or the memory seed
/// file cannot be read.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn RealtimeStore>> {
    match config.backend {
        StoreBackend::Rest => {
            tracing::info!(base_url = %config.base_url, "Creating REST store client");
            let store = RestStore::new(config)?;
            Ok(Arc::new(store) as Arc<dyn RealtimeStore>)
        }
        StoreBackend::Memory => {
            let store = match &config.seed_file {
                Some(seed_file) => {
                    tracing::info!(seed_file = %seed_file, "Creating memory store from seed file");
                    let contents = fs::read_to_string(seed_file).map_err(|e| {
                        HospitalError::Configuration(format!(
                            "Failed to read store.seed_file {seed_file}: {e}"
                        ))
                    })?;
                    let data = serde_json::from_str(&contents).map_err(|e| {
                        HospitalError::Configuration(format!(
                            "store.seed_file {seed_file} is not valid JSON: {e}"
                        ))
                    })?;
                    MemoryStore::with_data(data)
                }
                None => {
                    tracing::info!("Creating empty memory store");
                    MemoryStore::new()
                }
            };
            Ok(Arc::new(store) as Arc<dyn RealtimeStore>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_create_memory_store() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..Default::default()
        };
        let store = create_store(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_create_memory_store_from_seed() {
        let mut seed = NamedTempFile::new().unwrap();
        write!(seed, r#"{{"hospitals": {{"2024": {{"x": {{"name": "A"}}}}}}}}"#).unwrap();

        let config = StoreConfig {
            backend: StoreBackend::Memory,
            seed_file: Some(seed.path().to_string_lossy().to_string()),
            ..Default::default()
        };
        let store = create_store(&config).unwrap();
        let value = store
            .get(&crate::adapters::store::StorePath::hospitals())
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({"2024": {"x": {"name": "A"}}}));
    }

    #[test]
    fn test_missing_seed_file() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            seed_file: Some("/nonexistent/seed.json".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            create_store(&config),
            Err(HospitalError::Configuration(_))
        ));
    }

    #[test]
    fn test_create_rest_store() {
        let config = StoreConfig {
            backend: StoreBackend::Rest,
            base_url: "https://example.firebaseio.com".to_string(),
            ..Default::default()
        };
        let store = create_store(&config).unwrap();
        assert_eq!(store.backend_name(), "rest");
    }
}
