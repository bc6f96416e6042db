//! Realtime store abstraction
//!
//! This module defines the trait that store backends must implement. It
//! mirrors the native API of a hierarchical realtime database: listen to a
//! path, append a child under a generated key, replace a node, remove a node.

use super::path::StorePath;
use super::subscription::Subscription;
use crate::domain::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// Result type for backend calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Hierarchical realtime key-value store
///
/// Values are JSON trees. Writing `null` is equivalent to removing a node and
/// empty objects are never stored.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;

    /// Attach a listener to `path`
    ///
    /// The returned subscription yields the current value immediately and the
    /// full value again after every change below `path`, until it is
    /// unsubscribed or dropped. Listener failures (e.g. permission denial)
    /// arrive as a terminal `Err` item.
    ///
    /// # Errors
    ///
    /// Returns an error only if the listener cannot be registered at all.
    async fn subscribe(&self, path: &StorePath) -> StoreResult<Subscription>;

    /// Read the value at `path` once. Absent nodes read as `Value::Null`.
    async fn get(&self, path: &StorePath) -> StoreResult<Value>;

    /// Append `value` under `parent` with a store-assigned unique key
    ///
    /// # Returns
    ///
    /// The generated key of the new child.
    async fn push(&self, parent: &StorePath, value: Value) -> StoreResult<String>;

    /// Replace the value at `path` wholesale
    async fn set(&self, path: &StorePath, value: Value) -> StoreResult<()>;

    /// Delete the value at `path`
    async fn remove(&self, path: &StorePath) -> StoreResult<()>;
}
