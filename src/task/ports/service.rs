//! The uniform task-service contract every backend adapter implements.

use crate::task::domain::{ChecklistItem, Task, TaskStatus, TaskSummary};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Errors returned by task service operations.
///
/// Domain errors (not-found, invalid-status) propagate unwrapped so callers
/// can distinguish them; unexpected remote failures are always re-wrapped
/// into [`TaskServiceError::Connection`] at the adapter boundary, so this
/// taxonomy is the only error surface callers ever see.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskServiceError {
    /// No task with the given title exists in the project.
    #[error("Task '{title}' not found in project '{project}'.")]
    TaskNotFound {
        /// Project that was searched.
        project: String,
        /// Title that did not match.
        title: String,
    },

    /// No project container with the given name exists.
    #[error("Project '{0}' not found.")]
    ProjectNotFound(String),

    /// The task has no checklist of the well-known name.
    #[error("Checklist '{checklist}' not found for task '{title}'.")]
    ChecklistNotFound {
        /// Checklist name that was searched for.
        checklist: String,
        /// Task the checklist was expected on.
        title: String,
    },

    /// No matching (or no unchecked) checklist item exists.
    #[error("Checklist item '{item}' not found for task '{title}'.")]
    ChecklistItemNotFound {
        /// Item name that did not match, or `none` when all are checked.
        item: String,
        /// Task whose checklist was searched.
        title: String,
    },

    /// Every task in the project is in progress or done.
    #[error("No available tasks found in project '{0}'.")]
    NoAvailableTasks(String),

    /// The requested status is outside the todo/wip/done enum.
    #[error("Invalid task status '{0}'. Valid statuses are: todo, wip, done.")]
    InvalidTaskStatus(String),

    /// An unexpected remote failure, wrapped with backend context.
    #[error("Connection error with {backend} backend: {detail}")]
    Connection {
        /// Name of the backend that failed.
        backend: String,
        /// Original failure message.
        detail: String,
    },

    /// Backend construction failed due to bad or rejected credentials.
    #[error("Authentication failed with {backend} backend. Please check your credentials.")]
    Authentication {
        /// Name of the backend that rejected the credentials.
        backend: String,
    },
}

impl TaskServiceError {
    /// Builds a connection error for the given backend.
    pub fn connection(backend: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Connection {
            backend: backend.into(),
            detail: detail.into(),
        }
    }

    /// Builds a task-not-found error.
    pub fn task_not_found(project: impl Into<String>, title: impl Into<String>) -> Self {
        Self::TaskNotFound {
            project: project.into(),
            title: title.into(),
        }
    }
}

/// Uniform contract for task management backends.
///
/// Every operation returns the affected entity (or list) together with a
/// human-readable confirmation message, mirroring what the exposure layer
/// reports to callers. Implementations must honor the status derivation
/// rule (completion marker beats WIP marker), keep description updates
/// append-only, and restrict checklist access to the single well-known
/// checklist name.
#[async_trait]
pub trait TaskService: Send + Sync + std::fmt::Debug {
    /// Adds a new task to the project, creating the project container if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Connection`] when the backend call fails.
    async fn add_task(
        &self,
        project_name: &str,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<(Task, String)>;

    /// Returns the first task, in backend order, that is neither in
    /// progress nor done.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NoAvailableTasks`] when every task is in
    /// progress or done (or the project does not exist).
    async fn get_next_task(&self, project_name: &str) -> TaskServiceResult<(Task, String)>;

    /// Marks a task as in progress by applying the backend's WIP marker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the title does not
    /// match any task in the project.
    async fn mark_as_in_progress(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(Task, String)>;

    /// Marks a task as completed, clearing the WIP marker and setting the
    /// completion marker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the title does not
    /// match any task in the project.
    async fn mark_as_completed(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(Task, String)>;

    /// Appends a timestamped entry to the task description, preserving all
    /// prior content.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the title does not
    /// match any task in the project.
    async fn update_task_description(
        &self,
        project_name: &str,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<(Task, String)>;

    /// Appends items to the task's well-known checklist, creating the
    /// checklist when none exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the title does not
    /// match any task in the project.
    async fn update_task_with_checklist(
        &self,
        project_name: &str,
        title: &str,
        checklist_items: &[String],
    ) -> TaskServiceResult<(Task, String)>;

    /// Checks off the first checklist item matching the given name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::ChecklistNotFound`] when the task has no
    /// well-known checklist, or [`TaskServiceError::ChecklistItemNotFound`]
    /// when no item matches the name.
    async fn complete_checklist_item(
        &self,
        project_name: &str,
        title: &str,
        checklist_item_name: &str,
    ) -> TaskServiceResult<(Task, String)>;

    /// Returns the first unchecked checklist item in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::ChecklistNotFound`] when the task has no
    /// well-known checklist, or [`TaskServiceError::ChecklistItemNotFound`]
    /// when every item is already checked.
    async fn get_next_unchecked_checklist_item(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(ChecklistItem, String)>;

    /// Lists the project's tasks filtered by status.
    ///
    /// The filter is parsed from its string form; an unrecognized filter
    /// yields an empty listing rather than an error. An empty result is a
    /// valid success.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Connection`] when the backend call fails.
    async fn get_tasks(
        &self,
        project_name: &str,
        filter: &str,
    ) -> TaskServiceResult<(Vec<TaskSummary>, String)>;

    /// Returns the derived status of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the title does not
    /// match any task in the project.
    async fn get_task_status(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(TaskStatus, String)>;

    /// Forces a task to the requested status, clearing both markers before
    /// applying the target so repeated calls converge.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::InvalidTaskStatus`] when the status
    /// string is outside the enum (before any remote call), or
    /// [`TaskServiceError::TaskNotFound`] when the title does not match.
    async fn set_task_status(
        &self,
        project_name: &str,
        title: &str,
        status: &str,
    ) -> TaskServiceResult<(Task, String)>;

    /// Permanently removes every task in the project.
    ///
    /// A missing project is tolerated as a no-op with a "not found"
    /// message. No transactional guarantee is given; a partial failure
    /// leaves the remaining tasks deleted on retry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Connection`] when a backend call fails.
    async fn delete_all_tasks(&self, project_name: &str) -> TaskServiceResult<String>;
}
