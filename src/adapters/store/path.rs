//! Store paths
//!
//! A path addresses a node of the store's JSON tree as a list of key
//! segments. Hospital records only ever use three shapes:
//! `hospitals`, `hospitals/{year}` and `hospitals/{year}/{id}`.

use crate::domain::ids::{HospitalId, Year};
use crate::domain::StoreError;
use std::fmt;

/// Root key of the hospital collection
pub const HOSPITALS_ROOT: &str = "hospitals";

const RESERVED: [char; 5] = ['.', '#', '$', '[', ']'];

/// Path to a node in the realtime store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The root of the store
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a slash separated path. Leading, trailing and repeated slashes
    /// are ignored, so `"/hospitals//2024/"` equals `"hospitals/2024"`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` if a segment contains a reserved
    /// character.
    ///
    /// # Examples
    ///
    /// ```
    /// use hospital_sync::adapters::store::StorePath;
    ///
    /// let path = StorePath::parse("/hospitals/2024/").unwrap();
    /// assert_eq!(path.to_string(), "hospitals/2024");
    /// assert!(StorePath::parse("hospitals/20.24").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let mut parsed = Self::root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            parsed = parsed.child(segment)?;
        }
        Ok(parsed)
    }

    /// Path of a direct child
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` for empty segments or segments
    /// holding `/` or a reserved character.
    pub fn child(&self, segment: impl AsRef<str>) -> Result<Self, StoreError> {
        let segment = segment.as_ref();
        if segment.is_empty()
            || segment.contains('/')
            || segment.chars().any(|c| RESERVED.contains(&c) || c.is_control())
        {
            return Err(StoreError::InvalidPath(format!(
                "invalid key '{segment}' under '{self}'"
            )));
        }

        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// `hospitals`
    pub fn hospitals() -> Self {
        Self {
            segments: vec![HOSPITALS_ROOT.to_string()],
        }
    }

    /// `hospitals/{year}`
    pub fn partition(year: &Year) -> Self {
        Self {
            segments: vec![HOSPITALS_ROOT.to_string(), year.to_string()],
        }
    }

    /// `hospitals/{year}/{id}`
    pub fn record(year: &Year, id: &HospitalId) -> Self {
        Self {
            segments: vec![HOSPITALS_ROOT.to_string(), year.to_string(), id.to_string()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// True if `self` equals `other` or is one of its ancestors
    pub fn contains(&self, other: &StorePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// True if a write at `self` can change the value seen at `other`
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
