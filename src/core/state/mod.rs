//! Reactive repository state
//!
//! - [`cells`] - Watch cells for hospitals, loading, error and selected year
//! - [`loading`] - Guards that keep the loading flag up while operations run

pub mod cells;
pub mod loading;

pub use cells::{HospitalList, HospitalState, StateView};
pub use loading::LoadingGuard;
