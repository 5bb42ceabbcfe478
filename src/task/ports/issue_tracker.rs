//! Remote issue-tracker backend contract.
//!
//! Models the slice of an issue-tracker API the task service needs: issues
//! under a project key, subtasks under a parent issue, and workflow
//! transitions. Checklist items are represented as subtasks; workflow state
//! names carry the status.

use super::RemoteApiResult;
use async_trait::async_trait;

/// An issue as returned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIssue {
    /// Issue key, e.g. `PROJ-42`.
    pub key: String,
    /// Issue summary; maps to the task title.
    pub summary: String,
    /// Plain-text description (already flattened from the wire format).
    pub description: String,
    /// Current workflow state name, e.g. `In Progress`.
    pub state: String,
}

/// A workflow transition available on an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTransition {
    /// Transition identifier.
    pub id: String,
    /// Transition name.
    pub name: String,
    /// Name of the workflow state the transition leads to.
    pub to_state: String,
}

/// Issue-tracker API contract.
#[async_trait]
pub trait IssueTrackerApi: Send + Sync {
    /// Verifies the configured credentials against the tracker.
    async fn verify_credentials(&self) -> RemoteApiResult<()>;

    /// Creates a task-type issue under the project.
    async fn create_issue(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> RemoteApiResult<RemoteIssue>;

    /// Finds an issue by exact summary match.
    ///
    /// Duplicate summaries resolve to the first match in backend order.
    async fn find_issue(
        &self,
        project_key: &str,
        summary: &str,
    ) -> RemoteApiResult<Option<RemoteIssue>>;

    /// Lists the project's issues, optionally narrowed to one workflow
    /// state, in backend order (priority, then creation time).
    async fn list_issues(
        &self,
        project_key: &str,
        state: Option<&str>,
    ) -> RemoteApiResult<Vec<RemoteIssue>>;

    /// Replaces an issue description.
    async fn set_description(&self, issue_key: &str, description: &str) -> RemoteApiResult<()>;

    /// Returns the transitions currently available on an issue.
    async fn transitions(&self, issue_key: &str) -> RemoteApiResult<Vec<IssueTransition>>;

    /// Applies a transition to an issue.
    async fn apply_transition(&self, issue_key: &str, transition_id: &str) -> RemoteApiResult<()>;

    /// Creates a subtask under a parent issue.
    async fn create_subtask(
        &self,
        project_key: &str,
        parent_key: &str,
        summary: &str,
    ) -> RemoteApiResult<RemoteIssue>;

    /// Lists every subtask of a parent issue in creation order.
    async fn list_subtasks(&self, parent_key: &str) -> RemoteApiResult<Vec<RemoteIssue>>;

    /// Permanently deletes an issue together with its subtasks.
    async fn delete_issue(&self, issue_key: &str) -> RemoteApiResult<()>;
}
