//! Live subscriptions
//!
//! A [`Subscription`] is the consumer end of a listener registered on a store
//! path. It yields the full value at the path once on registration and again
//! after every change. An error item is terminal: the store cancels the
//! listener and the stream ends after it.
//!
//! The listener stays registered until [`Subscription::unsubscribe`] is
//! called or the subscription (or its [`ListenerRegistration`]) is dropped.

use super::path::StorePath;
use crate::domain::StoreError;
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// One item delivered to a listener
pub type SnapshotResult = Result<Value, StoreError>;

/// Producer side handed to backends
pub type SnapshotSender = mpsc::UnboundedSender<SnapshotResult>;

/// Consumer side of a listener
pub type SnapshotReceiver = mpsc::UnboundedReceiver<SnapshotResult>;

/// Create the channel connecting a backend listener to its subscription
pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    mpsc::unbounded_channel()
}

/// Handle that detaches a listener from its backend exactly once
pub struct ListenerRegistration {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerRegistration {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Detach the listener now
    pub fn release(mut self) {
        self.run();
    }

    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }

    fn run(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("released", &self.is_released())
            .finish()
    }
}

/// Stream of full snapshots at a store path
#[derive(Debug)]
pub struct Subscription {
    path: StorePath,
    receiver: SnapshotReceiver,
    registration: ListenerRegistration,
}

impl Subscription {
    pub fn new(path: StorePath, receiver: SnapshotReceiver, registration: ListenerRegistration) -> Self {
        Self {
            path,
            receiver,
            registration,
        }
    }

    /// Path the listener is attached to
    pub fn path(&self) -> &StorePath {
        &self.path
    }

    /// Wait for the next snapshot. `None` once the listener is gone.
    pub async fn next_snapshot(&mut self) -> Option<SnapshotResult> {
        self.receiver.recv().await
    }

    /// Detach the listener. Snapshots already queued are discarded.
    pub fn unsubscribe(self) {
        let Self {
            mut receiver,
            registration,
            ..
        } = self;
        registration.release();
        receiver.close();
    }

    /// Split into the snapshot receiver and the registration, so the
    /// listener can be detached from somewhere other than the reader.
    pub fn into_parts(self) -> (SnapshotReceiver, ListenerRegistration) {
        (self.receiver, self.registration)
    }
}

impl Stream for Subscription {
    type Item = SnapshotResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
