//! REST and event-stream backend
//!
//! This module talks to a hosted realtime database over its REST protocol.

pub mod client;
pub mod events;

pub use client::RestStore;
pub use events::{EventStreamParser, ServerEvent, StreamUpdate};
