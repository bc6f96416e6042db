//! External system integrations for hospital-sync.
//!
//! - [`store`] - Store abstraction (trait, paths, subscriptions, factory)
//! - [`rest`] - Hosted realtime database over REST and event streams
//! - [`memory`] - In-process implementation for tests and offline use
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the external store and
//! enable testing with the in-memory implementation.
//!
//! ```rust,no_run
//! use hospital_sync::adapters::store::{create_store, StorePath};
//! use hospital_sync::config::StoreConfig;
//!
//! # async fn example() -> hospital_sync::domain::Result<()> {
//! let config = StoreConfig {
//!     base_url: "https://my-project.firebaseio.com".to_string(),
//!     ..Default::default()
//! };
//!
//! let store = create_store(&config)?;
//! let snapshot = store.get(&StorePath::hospitals()).await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod rest;
pub mod store;
