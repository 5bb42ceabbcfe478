//! Supported backend identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned while parsing a backend identifier string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service type: {0}")]
pub struct ParseServiceKindError(pub String);

/// The built-in task service backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// The card/board backend.
    Trello,
    /// The issue-tracker backend.
    Jira,
}

impl ServiceKind {
    /// Fixed preference order used for default-service fallback.
    pub const FALLBACK_ORDER: [Self; 2] = [Self::Trello, Self::Jira];

    /// Returns the canonical identifier string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trello => "trello",
            Self::Jira => "jira",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceKind {
    type Error = ParseServiceKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "trello" => Ok(Self::Trello),
            "jira" => Ok(Self::Jira),
            _ => Err(ParseServiceKindError(value.to_owned())),
        }
    }
}
