//! Result type alias for hospital-sync

use super::errors::HospitalError;

/// Result type alias that uses `HospitalError` as the error type.
///
/// # Examples
///
/// ```
/// use hospital_sync::domain::result::Result;
/// use hospital_sync::domain::errors::HospitalError;
///
/// fn failing_function() -> Result<()> {
///     Err(HospitalError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HospitalError>;
