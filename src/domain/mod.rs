//! Domain models and types for hospital-sync.
//!
//! The domain layer provides:
//! - **Strongly-typed keys** ([`HospitalId`], [`Year`])
//! - **Records** ([`Hospital`], [`NewHospital`])
//! - **Localized failure messages** ([`Locale`], [`OperationKind`])
//! - **Error types** ([`HospitalError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use hospital_sync::domain::{NewHospital, Year};
//! use serde_json::json;
//!
//! # fn example() -> hospital_sync::domain::Result<()> {
//! let record = NewHospital::from_value(json!({
//!     "YEAR": "2024",
//!     "name": "Seoul General",
//!     "capacity": 420
//! }))?;
//! assert_eq!(record.year, Year::new("2024").unwrap());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod hospital;
pub mod ids;
pub mod messages;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{HospitalError, StoreError};
pub use hospital::{Fields, Hospital, NewHospital, ID_FIELD, YEAR_FIELD};
pub use ids::{HospitalId, Year};
pub use messages::{Locale, OperationKind};
pub use result::Result;
