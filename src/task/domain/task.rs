//! Task aggregate and list summaries.

use super::{Checklist, TaskStatus};
use serde::{Deserialize, Serialize};

/// A unit of work grouped under a project.
///
/// The title acts as the lookup key within a project; the system does not
/// enforce uniqueness, and lookups resolve to the first match in backend
/// order. The backend identifier is absent until the task has been created
/// remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: Option<String>,
    title: String,
    description: String,
    project_name: String,
    status: TaskStatus,
    checklists: Vec<Checklist>,
}

impl Task {
    /// Creates a task snapshot.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        project_name: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            project_name: project_name.into(),
            status,
            checklists: Vec::new(),
        }
    }

    /// Sets the backend-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replaces the attached checklists.
    #[must_use]
    pub fn with_checklists(mut self, checklists: impl IntoIterator<Item = Checklist>) -> Self {
        self.checklists = checklists.into_iter().collect();
        self
    }

    /// Returns the backend-assigned identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the name of the project the task belongs to.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Returns the derived status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the attached checklists in backend order.
    #[must_use]
    pub fn checklists(&self) -> &[Checklist] {
        &self.checklists
    }

    /// Returns the checklist with the given name, if any.
    #[must_use]
    pub fn checklist(&self, name: &str) -> Option<&Checklist> {
        self.checklists.iter().find(|list| list.name() == name)
    }

    /// Reports whether the task has been completed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.status, TaskStatus::Done)
    }

    /// Reports whether every attached checklist is fully checked off.
    #[must_use]
    pub fn all_checklists_complete(&self) -> bool {
        self.checklists.iter().all(Checklist::is_complete)
    }
}

/// A task entry as returned by project listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Derived status at listing time.
    pub status: TaskStatus,
    /// Backend-assigned identifier.
    pub id: String,
}
