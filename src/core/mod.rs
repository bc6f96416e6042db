//! Core logic for hospital-sync.
//!
//! # Modules
//!
//! - [`repository`] - The hospital repository and its options
//! - [`state`] - Reactive cells (hospitals, loading, error, selected year)
//! - [`transform`] - Snapshot flattening
//!
//! # Data Flow
//!
//! 1. **Activate**: attach a listener to `hospitals` in the store
//! 2. **Snapshot**: every change delivers the whole `hospitals` subtree
//! 3. **Flatten**: `year -> id -> fields` becomes a flat list of hospitals
//! 4. **Publish**: the list cell is replaced wholesale
//! 5. **Write**: add/update/delete go straight to the store and come back
//!    through step 2
//!
//! # Example
//!
//! ```rust,no_run
//! use hospital_sync::adapters::store::create_store;
//! use hospital_sync::config::load_config;
//! use hospital_sync::core::repository::{HospitalRepository, RepositoryOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hospital-sync.toml")?;
//! let store = create_store(&config.store)?;
//! let options = RepositoryOptions::from_config(&config.hospitals)?;
//!
//! let repository = HospitalRepository::new(store, options);
//! repository.activate().await?;
//!
//! let mut view = repository.view();
//! view.wait_until_idle().await;
//! println!("{} hospitals", repository.hospitals().len());
//! # Ok(())
//! # }
//! ```

pub mod repository;
pub mod state;
pub mod transform;
