//! In-memory realtime store
//!
//! This module provides a process-local backend used for tests, demos and
//! offline runs of the CLI.

pub mod push_id;
pub mod store;

pub use push_id::PushIdGenerator;
pub use store::{MemoryStore, Operation};
