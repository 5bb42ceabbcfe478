//! Task status lifecycle and query filters.

use super::{ParseTaskFilterError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state task lifecycle status.
///
/// The status is derived from backend markers, never stored directly: a
/// completion marker reads as [`TaskStatus::Done`] regardless of any WIP
/// marker, a WIP marker alone reads as [`TaskStatus::Wip`], and the absence
/// of both reads as [`TaskStatus::Todo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is in progress.
    Wip,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Wip => "wip",
            Self::Done => "done",
        }
    }

    /// Derives a status from the two backend markers.
    ///
    /// Completion takes precedence over the WIP marker.
    #[must_use]
    pub const fn from_markers(wip: bool, completed: bool) -> Self {
        if completed {
            Self::Done
        } else if wip {
            Self::Wip
        } else {
            Self::Todo
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "todo" => Ok(Self::Todo),
            "wip" => Ok(Self::Wip),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Filter applied when listing the tasks of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    /// Every task regardless of status.
    All,
    /// Only tasks whose derived status is [`TaskStatus::Wip`].
    Wip,
    /// Only tasks whose derived status is [`TaskStatus::Done`].
    Done,
}

impl TaskFilter {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Wip => "wip",
            Self::Done => "done",
        }
    }

    /// Reports whether a task with the given status passes this filter.
    #[must_use]
    pub const fn includes(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Wip => matches!(status, TaskStatus::Wip),
            Self::Done => matches!(status, TaskStatus::Done),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskFilter {
    type Error = ParseTaskFilterError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "all" => Ok(Self::All),
            "wip" => Ok(Self::Wip),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskFilterError(value.to_owned())),
        }
    }
}
