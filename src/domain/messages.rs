//! User-facing error messages
//!
//! The repository never exposes store failure details through its error
//! cell. Each operation kind has one fixed message per locale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language of the messages placed in the error cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Korean
    #[default]
    Ko,
    /// English
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Ko => write!(f, "ko"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ko" => Ok(Locale::Ko),
            "en" => Ok(Locale::En),
            other => Err(format!("Unsupported locale '{other}'. Must be one of: ko, en")),
        }
    }
}

/// Kind of repository operation a message refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Load,
    Add,
    Update,
    Delete,
}

impl OperationKind {
    /// Fixed failure message for this operation in `locale`
    pub fn failure_message(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Ko, OperationKind::Load) => "데이터를 불러오는 중 오류가 발생했습니다.",
            (Locale::Ko, OperationKind::Add) => "병원을 추가하는 중 오류가 발생했습니다.",
            (Locale::Ko, OperationKind::Update) => "병원을 업데이트하는 중 오류가 발생했습니다.",
            (Locale::Ko, OperationKind::Delete) => "병원을 삭제하는 중 오류가 발생했습니다.",
            (Locale::En, OperationKind::Load) => "Failed to load data.",
            (Locale::En, OperationKind::Add) => "Failed to add the hospital.",
            (Locale::En, OperationKind::Update) => "Failed to update the hospital.",
            (Locale::En, OperationKind::Delete) => "Failed to delete the hospital.",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Load => "load",
            OperationKind::Add => "add",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        };
        f.write_str(name)
    }
}
