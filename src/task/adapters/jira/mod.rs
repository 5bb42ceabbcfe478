//! Issue-tracker implementation of the task-service contract.
//!
//! Projects map to upper-cased project keys, tasks to task-type issues,
//! checklist items to subtask issues, and status to the issue's workflow
//! state. Transitions are discovered dynamically by target state name
//! rather than pre-created.

mod http;

pub use http::HttpIssueTrackerApi;

use crate::task::domain::{
    ChecklistItem, DEFAULT_CHECKLIST_NAME, TIMESTAMP_FORMAT, Task, TaskFilter, TaskStatus,
    TaskSummary, append_entry,
};
use crate::task::ports::{
    IssueTrackerApi, RemoteApiError, RemoteIssue, TaskService, TaskServiceError,
    TaskServiceResult,
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Backend name used in error and log context.
const BACKEND_NAME: &str = "JIRA";

/// Workflow state holding new issues.
const TODO_STATE: &str = "To Do";

/// Workflow state marking an issue in progress.
const WIP_STATE: &str = "In Progress";

/// Workflow state marking a finished issue.
const DONE_STATE: &str = "Done";

/// Task service over an issue-tracker backend.
pub struct JiraTaskService<A, C>
where
    A: IssueTrackerApi,
    C: Clock + Send + Sync,
{
    api: Arc<A>,
    clock: Arc<C>,
}

impl<A, C> std::fmt::Debug for JiraTaskService<A, C>
where
    A: IssueTrackerApi,
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraTaskService").finish_non_exhaustive()
    }
}

/// Wraps a remote failure into the backend connection error.
fn connection(context: &str, err: &RemoteApiError) -> TaskServiceError {
    TaskServiceError::connection(BACKEND_NAME, format!("{context}: {err}"))
}

/// Maps a workflow state name to the internal status.
///
/// Unknown states read as todo, mirroring how the tracker surfaces custom
/// states outside the three standard columns.
fn status_from_state(state: &str) -> TaskStatus {
    let normalized = state.to_ascii_lowercase();
    match normalized.as_str() {
        "in progress" => TaskStatus::Wip,
        "done" => TaskStatus::Done,
        _ => TaskStatus::Todo,
    }
}

/// Maps the internal status to its workflow state name.
const fn state_for_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => TODO_STATE,
        TaskStatus::Wip => WIP_STATE,
        TaskStatus::Done => DONE_STATE,
    }
}

/// Upper-cases a project name into its project key.
fn project_key(project_name: &str) -> String {
    project_name.to_uppercase()
}

impl<A, C> JiraTaskService<A, C>
where
    A: IssueTrackerApi,
    C: Clock + Send + Sync,
{
    /// Connects to the tracker, verifying the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Connection`] when the credential check
    /// fails.
    pub async fn connect(api: Arc<A>, clock: Arc<C>) -> TaskServiceResult<Self> {
        info!("verifying issue tracker credentials");
        api.verify_credentials()
            .await
            .map_err(|err| TaskServiceError::connection(BACKEND_NAME, err.to_string()))?;
        info!("issue tracker connection verified");
        Ok(Self { api, clock })
    }

    fn task_from_issue(project_name: &str, issue: &RemoteIssue) -> Task {
        Task::new(
            issue.summary.clone(),
            issue.description.clone(),
            project_name,
            status_from_state(&issue.state),
        )
        .with_id(issue.key.clone())
    }

    async fn find_issue(
        &self,
        project_name: &str,
        title: &str,
        context: &str,
    ) -> TaskServiceResult<RemoteIssue> {
        let key = project_key(project_name);
        self.api
            .find_issue(&key, title)
            .await
            .map_err(|err| connection(context, &err))?
            .ok_or_else(|| TaskServiceError::task_not_found(project_name, title))
    }

    async fn transition_to(
        &self,
        issue_key: &str,
        target_state: &str,
        context: &str,
    ) -> TaskServiceResult<()> {
        let transitions = self
            .api
            .transitions(issue_key)
            .await
            .map_err(|err| connection(context, &err))?;
        let transition = transitions
            .into_iter()
            .find(|transition| transition.to_state.eq_ignore_ascii_case(target_state))
            .ok_or_else(|| {
                TaskServiceError::connection(
                    BACKEND_NAME,
                    format!("No transition found to status '{target_state}' for issue {issue_key}"),
                )
            })?;
        debug!(issue_key, transition_id = %transition.id, target_state, "applying transition");
        self.api
            .apply_transition(issue_key, &transition.id)
            .await
            .map_err(|err| connection(context, &err))
    }

    async fn subtasks_or_checklist_error(
        &self,
        issue_key: &str,
        title: &str,
        context: &str,
    ) -> TaskServiceResult<Vec<RemoteIssue>> {
        let subtasks = self
            .api
            .list_subtasks(issue_key)
            .await
            .map_err(|err| connection(context, &err))?;
        if subtasks.is_empty() {
            return Err(TaskServiceError::ChecklistNotFound {
                checklist: DEFAULT_CHECKLIST_NAME.to_owned(),
                title: title.to_owned(),
            });
        }
        Ok(subtasks)
    }
}

#[async_trait]
impl<A, C> TaskService for JiraTaskService<A, C>
where
    A: IssueTrackerApi,
    C: Clock + Send + Sync,
{
    async fn add_task(
        &self,
        project_name: &str,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to create task";
        let key = project_key(project_name);
        info!(%project_name, title, "creating task");
        let issue = self
            .api
            .create_issue(&key, title, description)
            .await
            .map_err(|err| connection(context, &err))?;
        let message = format!("Task '{title}' created successfully with key {}", issue.key);
        Ok((Self::task_from_issue(project_name, &issue), message))
    }

    async fn get_next_task(&self, project_name: &str) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to get next task";
        let key = project_key(project_name);
        let issues = self
            .api
            .list_issues(&key, Some(TODO_STATE))
            .await
            .map_err(|err| connection(context, &err))?;
        let issue = issues
            .into_iter()
            .next()
            .ok_or_else(|| TaskServiceError::NoAvailableTasks(project_name.to_owned()))?;
        let message = format!("Next available task: {}", issue.summary);
        Ok((Self::task_from_issue(project_name, &issue), message))
    }

    async fn mark_as_in_progress(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to mark task as in progress";
        let issue = self.find_issue(project_name, title, context).await?;
        self.transition_to(&issue.key, WIP_STATE, context).await?;
        let task = Task::new(issue.summary.clone(), issue.description.clone(), project_name, TaskStatus::Wip)
            .with_id(issue.key.clone());
        Ok((task, format!("Task '{title}' marked as in progress")))
    }

    async fn mark_as_completed(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to mark task as completed";
        let issue = self.find_issue(project_name, title, context).await?;
        self.transition_to(&issue.key, DONE_STATE, context).await?;
        let task = Task::new(issue.summary.clone(), issue.description.clone(), project_name, TaskStatus::Done)
            .with_id(issue.key.clone());
        Ok((task, format!("Task '{title}' marked as completed")))
    }

    async fn update_task_description(
        &self,
        project_name: &str,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to update task description";
        let issue = self.find_issue(project_name, title, context).await?;
        let timestamp = self.clock.utc().format(TIMESTAMP_FORMAT).to_string();
        let updated = append_entry(&issue.description, description, &timestamp);
        self.api
            .set_description(&issue.key, &updated)
            .await
            .map_err(|err| connection(context, &err))?;
        let task = Task::new(issue.summary.clone(), updated, project_name, status_from_state(&issue.state))
            .with_id(issue.key.clone());
        Ok((task, format!("Task '{title}' description updated successfully")))
    }

    async fn update_task_with_checklist(
        &self,
        project_name: &str,
        title: &str,
        checklist_items: &[String],
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to update task with checklist";
        let key = project_key(project_name);
        let issue = self.find_issue(project_name, title, context).await?;
        for item in checklist_items {
            self.api
                .create_subtask(&key, &issue.key, item)
                .await
                .map_err(|err| connection(context, &err))?;
        }
        let message = format!(
            "Added {} checklist items as subtasks to '{title}'",
            checklist_items.len()
        );
        Ok((Self::task_from_issue(project_name, &issue), message))
    }

    async fn complete_checklist_item(
        &self,
        project_name: &str,
        title: &str,
        checklist_item_name: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to complete checklist item";
        info!(%project_name, title, checklist_item_name, "completing checklist item");
        let issue = self.find_issue(project_name, title, context).await?;
        let subtasks = self
            .subtasks_or_checklist_error(&issue.key, title, context)
            .await?;
        let subtask = subtasks
            .into_iter()
            .find(|subtask| subtask.summary == checklist_item_name)
            .ok_or_else(|| TaskServiceError::ChecklistItemNotFound {
                item: checklist_item_name.to_owned(),
                title: title.to_owned(),
            })?;
        self.transition_to(&subtask.key, DONE_STATE, context).await?;
        let message = format!("Checklist item '{checklist_item_name}' marked as completed");
        Ok((Self::task_from_issue(project_name, &issue), message))
    }

    async fn get_next_unchecked_checklist_item(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(ChecklistItem, String)> {
        let context = "Failed to get next unchecked checklist item";
        let issue = self.find_issue(project_name, title, context).await?;
        let subtasks = self
            .subtasks_or_checklist_error(&issue.key, title, context)
            .await?;
        let open = subtasks
            .into_iter()
            .find(|subtask| status_from_state(&subtask.state) != TaskStatus::Done)
            .ok_or_else(|| TaskServiceError::ChecklistItemNotFound {
                item: "none".to_owned(),
                title: title.to_owned(),
            })?;
        let message = format!(
            "Next unchecked checklist item for task '{title}': {}",
            open.summary
        );
        Ok((
            ChecklistItem::from_backend(open.summary.clone(), false, open.key.clone()),
            message,
        ))
    }

    async fn get_tasks(
        &self,
        project_name: &str,
        filter: &str,
    ) -> TaskServiceResult<(Vec<TaskSummary>, String)> {
        let context = "Failed to get tasks";
        let Ok(parsed) = TaskFilter::try_from(filter) else {
            let message =
                format!("Found 0 tasks in project '{project_name}' with filter '{filter}'");
            return Ok((Vec::new(), message));
        };
        let key = project_key(project_name);
        let state = match parsed {
            TaskFilter::All => None,
            TaskFilter::Wip => Some(WIP_STATE),
            TaskFilter::Done => Some(DONE_STATE),
        };
        let issues = self
            .api
            .list_issues(&key, state)
            .await
            .map_err(|err| connection(context, &err))?;
        let summaries: Vec<TaskSummary> = issues
            .iter()
            .map(|issue| TaskSummary {
                title: issue.summary.clone(),
                description: issue.description.clone(),
                status: status_from_state(&issue.state),
                id: issue.key.clone(),
            })
            .collect();
        let message = format!(
            "Found {} tasks in project '{project_name}' with filter '{parsed}'",
            summaries.len()
        );
        Ok((summaries, message))
    }

    async fn get_task_status(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(TaskStatus, String)> {
        let context = "Failed to get task status";
        let issue = self.find_issue(project_name, title, context).await?;
        let status = status_from_state(&issue.state);
        Ok((status, format!("Task '{title}' status: {status}")))
    }

    async fn set_task_status(
        &self,
        project_name: &str,
        title: &str,
        status: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let target = TaskStatus::try_from(status)
            .map_err(|err| TaskServiceError::InvalidTaskStatus(err.0))?;
        let context = "Failed to set task status";
        let issue = self.find_issue(project_name, title, context).await?;

        // The current workflow state is the only marker; skipping the
        // transition when it already matches keeps repeated calls safe.
        let target_state = state_for_status(target);
        if !issue.state.eq_ignore_ascii_case(target_state) {
            self.transition_to(&issue.key, target_state, context).await?;
        }
        let task = Task::new(issue.summary.clone(), issue.description.clone(), project_name, target)
            .with_id(issue.key.clone());
        Ok((task, format!("Task '{title}' status set to '{target}'")))
    }

    async fn delete_all_tasks(&self, project_name: &str) -> TaskServiceResult<String> {
        let context = "Failed to delete tasks";
        let key = project_key(project_name);
        let issues = self
            .api
            .list_issues(&key, None)
            .await
            .map_err(|err| connection(context, &err))?;
        let mut deleted = 0_usize;
        for issue in issues {
            self.api
                .delete_issue(&issue.key)
                .await
                .map_err(|err| connection(context, &err))?;
            deleted += 1;
        }
        info!(%project_name, deleted, "issues deleted");
        Ok(format!(
            "Deleted {deleted} tasks from project '{project_name}'"
        ))
    }
}
