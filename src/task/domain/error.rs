//! Error types for task domain parsing.

use thiserror::Error;

/// Error returned while parsing a task status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a task list filter string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid task filter: {0}")]
pub struct ParseTaskFilterError(pub String);
