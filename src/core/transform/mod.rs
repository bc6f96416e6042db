//! Snapshot transformation
//!
//! Reshapes nested store snapshots into the flat lists the repository exposes.

pub mod flatten;

pub use flatten::flatten_snapshot;
