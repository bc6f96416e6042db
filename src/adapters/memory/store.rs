//! In-process realtime store
//!
//! `MemoryStore` keeps the whole database as one JSON tree and notifies
//! listeners synchronously after each write. It behaves like the remote store
//! as far as this crate relies on it (full snapshots, generated push keys,
//! null-as-delete, listener cancellation on permission denial) and adds
//! fault injection for tests.

use super::push_id::PushIdGenerator;
use crate::adapters::store::subscription::{
    snapshot_channel, ListenerRegistration, SnapshotSender, Subscription,
};
use crate::adapters::store::traits::{RealtimeStore, StoreResult};
use crate::adapters::store::tree;
use crate::adapters::store::StorePath;
use crate::domain::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Store operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Subscribe,
    Get,
    Push,
    Set,
    Remove,
}

struct Listener {
    path: StorePath,
    sender: SnapshotSender,
    last: Value,
}

#[derive(Default)]
struct Inner {
    root: Value,
    listeners: HashMap<u64, Listener>,
    next_listener_id: u64,
    push_ids: PushIdGenerator,
    injected: HashMap<Operation, StoreError>,
    read_denial: Option<String>,
}

impl Inner {
    fn take_injected(&mut self, operation: Operation) -> StoreResult<()> {
        match self.injected.remove(&operation) {
            Some(err) => {
                tracing::debug!(?operation, error = %err, "Returning injected failure");
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn write(&mut self, path: &StorePath, value: Value) {
        tree::write_at(&mut self.root, path.segments(), value);
        self.notify(path);
    }

    /// Deliver the new value to every listener whose view changed. Listeners
    /// whose subscription is gone are dropped from the registry.
    fn notify(&mut self, written: &StorePath) {
        let root = &self.root;
        self.listeners.retain(|id, listener| {
            if !listener.path.overlaps(written) {
                return true;
            }

            let current = tree::value_at(root, listener.path.segments());
            if current == listener.last {
                return true;
            }

            listener.last = current.clone();
            let delivered = listener.sender.send(Ok(current)).is_ok();
            if !delivered {
                tracing::debug!(listener_id = id, "Dropping listener with closed subscription");
            }
            delivered
        });
    }
}

/// In-memory implementation of [`RealtimeStore`]
///
/// Cloning is cheap; clones share the same tree and listeners.
///
/// # Example
///
/// ```
/// use hospital_sync::adapters::memory::MemoryStore;
/// use hospital_sync::adapters::store::{RealtimeStore, StorePath};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), hospital_sync::domain::StoreError> {
/// let store = MemoryStore::new();
/// let parent = StorePath::parse("hospitals/2024")?;
/// let key = store.push(&parent, json!({"name": "A"})).await?;
/// assert_eq!(store.get(&parent.child(&key)?).await?, json!({"name": "A"}));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `data` at the root
    pub fn with_data(data: Value) -> Self {
        let store = Self::new();
        store.lock().root = tree::normalize(data);
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Synchronous read of the value at `path`
    pub fn value_at(&self, path: &StorePath) -> Value {
        tree::value_at(&self.lock().root, path.segments())
    }

    /// Number of listeners currently registered
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Make the next call of `operation` fail with `error`
    pub fn fail_next(&self, operation: Operation, error: StoreError) {
        self.lock().injected.insert(operation, error);
    }

    /// Revoke read access. Every registered listener receives a
    /// `PermissionDenied` error and is cancelled; later subscriptions are
    /// cancelled the same way until [`MemoryStore::allow_reads`].
    pub fn deny_reads(&self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut inner = self.lock();
        for (_, listener) in inner.listeners.drain() {
            let _ = listener
                .sender
                .send(Err(StoreError::PermissionDenied(reason.clone())));
        }
        inner.read_denial = Some(reason);
    }

    /// Restore read access
    pub fn allow_reads(&self) {
        self.lock().read_denial = None;
    }

    /// Replace the value at `path` as if another client had written it
    pub fn external_write(&self, path: &StorePath, value: Value) {
        self.lock().write(path, value);
    }
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn subscribe(&self, path: &StorePath) -> StoreResult<Subscription> {
        let mut inner = self.lock();
        inner.take_injected(Operation::Subscribe)?;

        let (sender, receiver) = snapshot_channel();

        if let Some(reason) = inner.read_denial.clone() {
            // Registration succeeds but the listener is cancelled at once
            let _ = sender.send(Err(StoreError::PermissionDenied(reason)));
            return Ok(Subscription::new(
                path.clone(),
                receiver,
                ListenerRegistration::new(|| {}),
            ));
        }

        let current = tree::value_at(&inner.root, path.segments());
        let _ = sender.send(Ok(current.clone()));

        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.insert(
            id,
            Listener {
                path: path.clone(),
                sender,
                last: current,
            },
        );
        tracing::debug!(listener_id = id, path = %path, "Listener registered");

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let registration = ListenerRegistration::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                if inner.listeners.remove(&id).is_some() {
                    tracing::debug!(listener_id = id, "Listener removed");
                }
            }
        });

        Ok(Subscription::new(path.clone(), receiver, registration))
    }

    async fn get(&self, path: &StorePath) -> StoreResult<Value> {
        let mut inner = self.lock();
        inner.take_injected(Operation::Get)?;
        if let Some(reason) = &inner.read_denial {
            return Err(StoreError::PermissionDenied(reason.clone()));
        }
        Ok(tree::value_at(&inner.root, path.segments()))
    }

    async fn push(&self, parent: &StorePath, value: Value) -> StoreResult<String> {
        let mut inner = self.lock();
        inner.take_injected(Operation::Push)?;

        let key = inner.push_ids.next_id();
        let path = parent.child(&key)?;
        inner.write(&path, value);
        Ok(key)
    }

    async fn set(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.take_injected(Operation::Set)?;
        inner.write(path, value);
        Ok(())
    }

    async fn remove(&self, path: &StorePath) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.take_injected(Operation::Remove)?;
        inner.write(path, Value::Null);
        Ok(())
    }
}
