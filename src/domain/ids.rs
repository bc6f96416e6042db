//! Domain identifier types with validation
//!
//! Hospital records are addressed by two keys: the year partition and the
//! store-assigned record id. Both end up as path segments in the backing
//! store, so both reject the characters the store reserves for paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters the realtime store does not accept inside a key
const RESERVED_KEY_CHARS: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// Year partition selected when nothing else is configured
pub const DEFAULT_YEAR: &str = "2024";

/// Check that a string is usable as a single path segment
fn validate_key(kind: &str, key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err(format!("{kind} cannot be empty"));
    }
    if let Some(c) = key
        .chars()
        .find(|c| RESERVED_KEY_CHARS.contains(c) || c.is_control())
    {
        return Err(format!("{kind} '{key}' contains reserved character {c:?}"));
    }
    Ok(())
}

/// Hospital record identifier
///
/// Assigned by the backing store when a record is appended (a push ID), so
/// callers normally obtain it from `add_hospital` or from a snapshot.
///
/// # Examples
///
/// ```
/// use hospital_sync::domain::ids::HospitalId;
///
/// let id = HospitalId::new("-NqA1b2c3d4e5f6g7h8i").unwrap();
/// assert_eq!(id.as_str(), "-NqA1b2c3d4e5f6g7h8i");
/// assert!(HospitalId::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HospitalId(String);

impl HospitalId {
    /// Creates a new HospitalId, rejecting empty ids and reserved characters
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_key("Hospital ID", &id)?;
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HospitalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for HospitalId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HospitalId> for String {
    fn from(id: HospitalId) -> Self {
        id.0
    }
}

impl AsRef<str> for HospitalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Year partition key
///
/// Kept as a string: the store uses it verbatim as the top-level key and no
/// numeric semantics are attached to it.
///
/// # Examples
///
/// ```
/// use hospital_sync::domain::ids::Year;
/// use std::str::FromStr;
///
/// let year = Year::from_str("2024").unwrap();
/// assert_eq!(year.to_string(), "2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Year(String);

impl Year {
    /// Creates a new Year, rejecting empty values and reserved characters
    pub fn new(year: impl Into<String>) -> Result<Self, String> {
        let year = year.into();
        validate_key("Year", &year)?;
        Ok(Self(year))
    }

    /// Returns the year as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for Year {
    fn default() -> Self {
        Self(DEFAULT_YEAR.to_string())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Year {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for String {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl AsRef<str> for Year {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
