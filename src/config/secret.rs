//! Store credential held in memory
//!
//! `store.auth_token` is wrapped in `secrecy::Secret`, so it never shows up
//! in `Debug` output of the configuration, and the underlying string is
//! zeroed when dropped. The REST backend exposes it only to build the `auth`
//! query parameter.
//!
//! ```rust
//! use hospital_sync::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("db-secret".to_string());
//! assert_eq!(token.expose_secret().masked(), "<9 chars>");
//! assert!(!format!("{token:?}").contains("db-secret"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Token string, zeroed on drop
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl SecretValue {
    /// Printable hint of the secret: its length and last four characters
    ///
    /// Short secrets reveal nothing but their length.
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count < 12 {
            return format!("<{count} chars>");
        }
        let tail: String = self.0.chars().skip(count - 4).collect();
        format!("<{count} chars, ...{tail}>")
    }
}

/// The store auth token as configured
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain token, e.g. one read from an environment override
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
