//! Hospital repository
//!
//! - [`hospitals`] - [`HospitalRepository`]: live listener plus add/update/delete
//! - [`options`] - [`RepositoryOptions`]: locale, default year, partition checks

pub mod hospitals;
pub mod options;

pub use hospitals::HospitalRepository;
pub use options::RepositoryOptions;
