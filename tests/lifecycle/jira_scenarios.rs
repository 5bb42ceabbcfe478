//! Issue-tracker adapter walking the uniform contract.

use rstest::rstest;
use taskbridge::task::domain::TaskStatus;
use taskbridge::task::ports::{TaskService as _, TaskServiceError};

use super::helpers::{assert_checklist_walk, assert_status_lifecycle, jira_service};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_lifecycle_walks_todo_wip_done() {
    let service = jira_service().await.expect("service should construct");
    assert_status_lifecycle(&service, "ops")
        .await
        .expect("lifecycle should walk cleanly");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checklist_items_complete_in_insertion_order() {
    let service = jira_service().await.expect("service should construct");
    assert_checklist_walk(&service, "ops")
        .await
        .expect("checklist should walk in order");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_with_only_wip_and_done_tasks_have_no_next_task() {
    let service = jira_service().await.expect("service should construct");
    service
        .add_task("ops", "busy", "d")
        .await
        .expect("task creation should succeed");
    service
        .add_task("ops", "finished", "d")
        .await
        .expect("task creation should succeed");
    service
        .mark_as_in_progress("ops", "busy")
        .await
        .expect("transition should succeed");
    service
        .mark_as_completed("ops", "finished")
        .await
        .expect("transition should succeed");

    let result = service.get_next_task("ops").await;

    assert_eq!(
        result.expect_err("no task should qualify"),
        TaskServiceError::NoAvailableTasks("ops".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_status_leaves_the_task_unmodified() {
    let service = jira_service().await.expect("service should construct");
    service
        .add_task("ops", "T", "d")
        .await
        .expect("task creation should succeed");

    let result = service.set_task_status("ops", "T", "bogus").await;
    assert_eq!(
        result.expect_err("status should be rejected"),
        TaskServiceError::InvalidTaskStatus("bogus".to_owned())
    );

    let (status, _) = service
        .get_task_status("ops", "T")
        .await
        .expect("status lookup should succeed");
    assert_eq!(status, TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_status_converges_across_repeated_calls() {
    let service = jira_service().await.expect("service should construct");
    service
        .add_task("ops", "T", "d")
        .await
        .expect("task creation should succeed");

    for _ in 0..3 {
        service
            .set_task_status("ops", "T", "done")
            .await
            .expect("status set should succeed");
    }

    let (status, _) = service
        .get_task_status("ops", "T")
        .await
        .expect("status lookup should succeed");
    assert_eq!(status, TaskStatus::Done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_delete_then_list_is_an_empty_success() {
    let service = jira_service().await.expect("service should construct");
    service
        .add_task("ops", "one", "d")
        .await
        .expect("task creation should succeed");
    service
        .add_task("ops", "two", "d")
        .await
        .expect("task creation should succeed");

    let message = service
        .delete_all_tasks("ops")
        .await
        .expect("deletion should succeed");
    assert_eq!(message, "Deleted 2 tasks from project 'ops'");

    let (tasks, _) = service
        .get_tasks("ops", "all")
        .await
        .expect("listing should succeed");
    assert!(tasks.is_empty());
}
