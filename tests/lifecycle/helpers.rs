//! Shared fixtures for task lifecycle integration tests.

use std::sync::Arc;

use eyre::{WrapErr as _, ensure};
use mockable::DefaultClock;
use taskbridge::task::adapters::jira::JiraTaskService;
use taskbridge::task::adapters::memory::{InMemoryCardBoard, InMemoryIssueTracker};
use taskbridge::task::adapters::trello::TrelloTaskService;
use taskbridge::task::domain::TaskStatus;
use taskbridge::task::ports::{TaskService, TaskServiceError};

/// Builds the card/board adapter over an empty in-memory board.
///
/// # Errors
///
/// Returns an error when the label bootstrap fails.
pub async fn trello_service() -> eyre::Result<Arc<dyn TaskService>> {
    let service =
        TrelloTaskService::connect(Arc::new(InMemoryCardBoard::new()), Arc::new(DefaultClock))
            .await
            .wrap_err("label bootstrap should succeed")?;
    Ok(Arc::new(service))
}

/// Builds the issue-tracker adapter over an empty in-memory tracker.
///
/// # Errors
///
/// Returns an error when the credential check fails.
pub async fn jira_service() -> eyre::Result<Arc<dyn TaskService>> {
    let service = JiraTaskService::connect(
        Arc::new(InMemoryIssueTracker::new()),
        Arc::new(DefaultClock),
    )
    .await
    .wrap_err("credential check should succeed")?;
    Ok(Arc::new(service))
}

async fn status_of(
    service: &Arc<dyn TaskService>,
    project: &str,
    title: &str,
) -> eyre::Result<TaskStatus> {
    let (status, _) = service
        .get_task_status(project, title)
        .await
        .wrap_err("status lookup should succeed")?;
    Ok(status)
}

/// Walks a task from creation through wip to done, asserting the derived
/// status after each step.
///
/// # Errors
///
/// Returns an error when an operation fails or a derived status is wrong.
pub async fn assert_status_lifecycle(
    service: &Arc<dyn TaskService>,
    project: &str,
) -> eyre::Result<()> {
    service
        .add_task(project, "T", "d")
        .await
        .wrap_err("task creation should succeed")?;
    ensure!(status_of(service, project, "T").await? == TaskStatus::Todo);

    service
        .mark_as_in_progress(project, "T")
        .await
        .wrap_err("transition should succeed")?;
    ensure!(status_of(service, project, "T").await? == TaskStatus::Wip);

    service
        .mark_as_completed(project, "T")
        .await
        .wrap_err("transition should succeed")?;
    ensure!(status_of(service, project, "T").await? == TaskStatus::Done);
    Ok(())
}

/// Walks a two-item checklist to exhaustion, asserting insertion order.
///
/// # Errors
///
/// Returns an error when an operation fails or items come back out of
/// order.
pub async fn assert_checklist_walk(
    service: &Arc<dyn TaskService>,
    project: &str,
) -> eyre::Result<()> {
    service
        .add_task(project, "T", "d")
        .await
        .wrap_err("task creation should succeed")?;
    service
        .update_task_with_checklist(project, "T", &["a".to_owned(), "b".to_owned()])
        .await
        .wrap_err("checklist creation should succeed")?;

    let (first, _) = service
        .get_next_unchecked_checklist_item(project, "T")
        .await
        .wrap_err("an item should be unchecked")?;
    ensure!(first.name() == "a", "expected 'a', got '{}'", first.name());

    service
        .complete_checklist_item(project, "T", "a")
        .await
        .wrap_err("completion should succeed")?;
    let (second, _) = service
        .get_next_unchecked_checklist_item(project, "T")
        .await
        .wrap_err("an item should be unchecked")?;
    ensure!(second.name() == "b", "expected 'b', got '{}'", second.name());

    service
        .complete_checklist_item(project, "T", "b")
        .await
        .wrap_err("completion should succeed")?;
    let exhausted = service.get_next_unchecked_checklist_item(project, "T").await;
    ensure!(
        matches!(
            exhausted,
            Err(TaskServiceError::ChecklistItemNotFound { .. })
        ),
        "all items are checked, lookup should fail"
    );
    Ok(())
}
