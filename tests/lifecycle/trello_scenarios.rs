//! Card/board adapter walking the uniform contract.

use rstest::rstest;
use taskbridge::task::domain::TaskStatus;
use taskbridge::task::ports::{TaskService as _, TaskServiceError};

use super::helpers::{assert_checklist_walk, assert_status_lifecycle, trello_service};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_lifecycle_walks_todo_wip_done() {
    let service = trello_service().await.expect("service should construct");
    assert_status_lifecycle(&service, "Platform")
        .await
        .expect("lifecycle should walk cleanly");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checklist_items_complete_in_insertion_order() {
    let service = trello_service().await.expect("service should construct");
    assert_checklist_walk(&service, "Platform")
        .await
        .expect("checklist should walk in order");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_with_only_wip_and_done_tasks_have_no_next_task() {
    let service = trello_service().await.expect("service should construct");
    service
        .add_task("Platform", "busy", "d")
        .await
        .expect("task creation should succeed");
    service
        .add_task("Platform", "finished", "d")
        .await
        .expect("task creation should succeed");
    service
        .mark_as_in_progress("Platform", "busy")
        .await
        .expect("transition should succeed");
    service
        .mark_as_completed("Platform", "finished")
        .await
        .expect("transition should succeed");

    let result = service.get_next_task("Platform").await;

    assert_eq!(
        result.expect_err("no task should qualify"),
        TaskServiceError::NoAvailableTasks("Platform".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_status_leaves_the_task_unmodified() {
    let service = trello_service().await.expect("service should construct");
    service
        .add_task("Platform", "T", "d")
        .await
        .expect("task creation should succeed");

    let result = service.set_task_status("Platform", "T", "bogus").await;
    assert_eq!(
        result.expect_err("status should be rejected"),
        TaskServiceError::InvalidTaskStatus("bogus".to_owned())
    );

    let (status, _) = service
        .get_task_status("Platform", "T")
        .await
        .expect("status lookup should succeed");
    assert_eq!(status, TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_description_updates_keep_the_full_history() {
    let service = trello_service().await.expect("service should construct");
    service
        .add_task("Platform", "T", "")
        .await
        .expect("task creation should succeed");

    service
        .update_task_description("Platform", "T", "one")
        .await
        .expect("update should succeed");
    let (task, _) = service
        .update_task_description("Platform", "T", "two")
        .await
        .expect("update should succeed");

    let description = task.description();
    assert!(description.contains("one"));
    assert!(description.contains("two"));
    let one_at = description.find("one").expect("first entry present");
    let two_at = description.find("two").expect("second entry present");
    assert!(one_at < two_at);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_are_isolated_from_each_other() {
    let service = trello_service().await.expect("service should construct");
    service
        .add_task("Alpha", "shared-title", "d")
        .await
        .expect("task creation should succeed");
    service
        .add_task("Beta", "other", "d")
        .await
        .expect("task creation should succeed");

    let result = service.get_task_status("Beta", "shared-title").await;
    assert_eq!(
        result.expect_err("title lives in another project"),
        TaskServiceError::task_not_found("Beta", "shared-title")
    );

    let (alpha_tasks, _) = service
        .get_tasks("Alpha", "all")
        .await
        .expect("listing should succeed");
    assert_eq!(alpha_tasks.len(), 1);
}
