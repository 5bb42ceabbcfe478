//! Thread-safe in-memory issue tracker for adapter tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::ports::{
    IssueTrackerApi, IssueTransition, RemoteApiError, RemoteApiResult, RemoteIssue,
};

/// Workflow states offered by the in-memory tracker.
const WORKFLOW: [(&str, &str); 3] = [("11", "To Do"), ("21", "In Progress"), ("31", "Done")];

/// Thread-safe in-memory implementation of [`IssueTrackerApi`].
///
/// Issues keep insertion order, standing in for the remote tracker's
/// priority-then-created listing order. Every issue always offers a
/// transition into each of the three workflow states.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueTracker {
    state: Arc<RwLock<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    issues: Vec<IssueState>,
    next_key: u64,
}

#[derive(Debug)]
struct IssueState {
    key: String,
    project: String,
    parent: Option<String>,
    summary: String,
    description: String,
    state: String,
}

impl IssueState {
    fn to_remote(&self) -> RemoteIssue {
        RemoteIssue {
            key: self.key.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            state: self.state.clone(),
        }
    }
}

fn poisoned(err: impl std::fmt::Display) -> RemoteApiError {
    RemoteApiError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryIssueTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state<R>(&self, reader: impl FnOnce(&TrackerState) -> R) -> RemoteApiResult<R> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(reader(&state))
    }

    fn write_state<R>(
        &self,
        writer: impl FnOnce(&mut TrackerState) -> RemoteApiResult<R>,
    ) -> RemoteApiResult<R> {
        let mut state = self.state.write().map_err(poisoned)?;
        writer(&mut state)
    }

    fn create(
        &self,
        project_key: &str,
        parent: Option<&str>,
        summary: &str,
        description: &str,
    ) -> RemoteApiResult<RemoteIssue> {
        self.write_state(|state| {
            state.next_key += 1;
            let issue = IssueState {
                key: format!("{project_key}-{}", state.next_key),
                project: project_key.to_owned(),
                parent: parent.map(str::to_owned),
                summary: summary.to_owned(),
                description: description.to_owned(),
                state: "To Do".to_owned(),
            };
            let remote = issue.to_remote();
            state.issues.push(issue);
            Ok(remote)
        })
    }
}

#[async_trait]
impl IssueTrackerApi for InMemoryIssueTracker {
    async fn verify_credentials(&self) -> RemoteApiResult<()> {
        Ok(())
    }

    async fn create_issue(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> RemoteApiResult<RemoteIssue> {
        self.create(project_key, None, summary, description)
    }

    async fn find_issue(
        &self,
        project_key: &str,
        summary: &str,
    ) -> RemoteApiResult<Option<RemoteIssue>> {
        self.read_state(|state| {
            state
                .issues
                .iter()
                .find(|issue| {
                    issue.project == project_key
                        && issue.parent.is_none()
                        && issue.summary == summary
                })
                .map(IssueState::to_remote)
        })
    }

    async fn list_issues(
        &self,
        project_key: &str,
        state_filter: Option<&str>,
    ) -> RemoteApiResult<Vec<RemoteIssue>> {
        self.read_state(|state| {
            state
                .issues
                .iter()
                .filter(|issue| issue.project == project_key && issue.parent.is_none())
                .filter(|issue| {
                    state_filter.is_none_or(|name| issue.state.eq_ignore_ascii_case(name))
                })
                .map(IssueState::to_remote)
                .collect()
        })
    }

    async fn set_description(&self, issue_key: &str, description: &str) -> RemoteApiResult<()> {
        self.write_state(|state| {
            let issue = state
                .issues
                .iter_mut()
                .find(|issue| issue.key == issue_key)
                .ok_or_else(|| {
                    RemoteApiError::backend(format!("issue '{issue_key}' not found"))
                })?;
            issue.description = description.to_owned();
            Ok(())
        })
    }

    async fn transitions(&self, issue_key: &str) -> RemoteApiResult<Vec<IssueTransition>> {
        self.read_state(|state| {
            state
                .issues
                .iter()
                .any(|issue| issue.key == issue_key)
                .then(|| {
                    WORKFLOW
                        .iter()
                        .map(|(id, name)| IssueTransition {
                            id: (*id).to_owned(),
                            name: (*name).to_owned(),
                            to_state: (*name).to_owned(),
                        })
                        .collect()
                })
        })?
        .ok_or_else(|| RemoteApiError::backend(format!("issue '{issue_key}' not found")))
    }

    async fn apply_transition(&self, issue_key: &str, transition_id: &str) -> RemoteApiResult<()> {
        let target = WORKFLOW
            .iter()
            .find(|(id, _)| *id == transition_id)
            .map(|(_, name)| (*name).to_owned())
            .ok_or_else(|| {
                RemoteApiError::backend(format!("unknown transition '{transition_id}'"))
            })?;
        self.write_state(|state| {
            let issue = state
                .issues
                .iter_mut()
                .find(|issue| issue.key == issue_key)
                .ok_or_else(|| {
                    RemoteApiError::backend(format!("issue '{issue_key}' not found"))
                })?;
            issue.state = target;
            Ok(())
        })
    }

    async fn create_subtask(
        &self,
        project_key: &str,
        parent_key: &str,
        summary: &str,
    ) -> RemoteApiResult<RemoteIssue> {
        self.create(project_key, Some(parent_key), summary, "")
    }

    async fn list_subtasks(&self, parent_key: &str) -> RemoteApiResult<Vec<RemoteIssue>> {
        self.read_state(|state| {
            state
                .issues
                .iter()
                .filter(|issue| issue.parent.as_deref() == Some(parent_key))
                .map(IssueState::to_remote)
                .collect()
        })
    }

    async fn delete_issue(&self, issue_key: &str) -> RemoteApiResult<()> {
        self.write_state(|state| {
            let found = state.issues.iter().any(|issue| issue.key == issue_key);
            if !found {
                return Err(RemoteApiError::backend(format!(
                    "issue '{issue_key}' not found"
                )));
            }
            state
                .issues
                .retain(|issue| issue.key != issue_key && issue.parent.as_deref() != Some(issue_key));
            Ok(())
        })
    }
}
