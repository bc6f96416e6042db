//! Store abstraction layer
//!
//! This module provides a trait-based abstraction over the realtime store,
//! allowing the repository to run against different backends (REST, memory).

pub mod factory;
pub mod path;
pub mod subscription;
pub mod traits;
pub mod tree;

pub use factory::create_store;
pub use path::{StorePath, HOSPITALS_ROOT};
pub use subscription::{ListenerRegistration, SnapshotResult, Subscription};
pub use traits::{RealtimeStore, StoreResult};
