//! Unit tests for the card/board adapter against the in-memory board.

use std::sync::Arc;

use crate::task::adapters::memory::InMemoryCardBoard;
use crate::task::adapters::trello::TrelloTaskService;
use crate::task::domain::TaskStatus;
use crate::task::ports::{TaskService, TaskServiceError};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = TrelloTaskService<InMemoryCardBoard, DefaultClock>;

const PROJECT: &str = "Platform";

#[fixture]
async fn service() -> TestService {
    TrelloTaskService::connect(Arc::new(InMemoryCardBoard::new()), Arc::new(DefaultClock))
        .await
        .expect("label bootstrap should succeed")
}

async fn add_task(service: &TestService, title: &str) {
    service
        .add_task(PROJECT, title, "a task")
        .await
        .expect("task creation should succeed");
}

async fn status_of(service: &TestService, title: &str) -> TaskStatus {
    let (status, _) = service
        .get_task_status(PROJECT, title)
        .await
        .expect("status lookup should succeed");
    status
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn added_task_starts_as_todo(#[future(awt)] service: TestService) {
    let (task, message) = service
        .add_task(PROJECT, "T", "d")
        .await
        .expect("task creation should succeed");

    assert_eq!(task.status(), TaskStatus::Todo);
    assert!(task.id().is_some());
    assert_eq!(message, "Added new task 'T' to Platform");
    assert_eq!(status_of(&service, "T").await, TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_walks_todo_wip_done(#[future(awt)] service: TestService) {
    add_task(&service, "T").await;

    service
        .mark_as_in_progress(PROJECT, "T")
        .await
        .expect("transition should succeed");
    assert_eq!(status_of(&service, "T").await, TaskStatus::Wip);

    service
        .mark_as_completed(PROJECT, "T")
        .await
        .expect("transition should succeed");
    assert_eq!(status_of(&service, "T").await, TaskStatus::Done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_marker_beats_lingering_wip_marker(#[future(awt)] service: TestService) {
    add_task(&service, "T").await;
    service
        .mark_as_in_progress(PROJECT, "T")
        .await
        .expect("transition should succeed");
    service
        .set_task_status(PROJECT, "T", "done")
        .await
        .expect("status set should succeed");

    assert_eq!(status_of(&service, "T").await, TaskStatus::Done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_lookups_fail_typed(#[future(awt)] service: TestService) {
    add_task(&service, "present").await;

    let result = service.mark_as_in_progress(PROJECT, "absent").await;

    assert_eq!(
        result.expect_err("lookup should fail"),
        TaskServiceError::task_not_found(PROJECT, "absent")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn next_task_skips_wip_and_done(#[future(awt)] service: TestService) {
    add_task(&service, "first").await;
    add_task(&service, "second").await;
    add_task(&service, "third").await;
    service
        .mark_as_in_progress(PROJECT, "first")
        .await
        .expect("transition should succeed");
    service
        .mark_as_completed(PROJECT, "second")
        .await
        .expect("transition should succeed");

    let (task, _) = service
        .get_next_task(PROJECT)
        .await
        .expect("a task should be available");

    assert_eq!(task.title(), "third");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exhausted_project_has_no_available_tasks(#[future(awt)] service: TestService) {
    add_task(&service, "only").await;
    service
        .mark_as_completed(PROJECT, "only")
        .await
        .expect("transition should succeed");

    let result = service.get_next_task(PROJECT).await;

    assert_eq!(
        result.expect_err("no task should qualify"),
        TaskServiceError::NoAvailableTasks(PROJECT.to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_project_has_no_available_tasks(#[future(awt)] service: TestService) {
    let result = service.get_next_task("Nowhere").await;

    assert_eq!(
        result.expect_err("project is missing"),
        TaskServiceError::NoAvailableTasks("Nowhere".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_task_status_is_idempotent(#[future(awt)] service: TestService) {
    add_task(&service, "T").await;

    for _ in 0..2 {
        service
            .set_task_status(PROJECT, "T", "wip")
            .await
            .expect("status set should succeed");
    }
    assert_eq!(status_of(&service, "T").await, TaskStatus::Wip);

    for _ in 0..2 {
        service
            .set_task_status(PROJECT, "T", "done")
            .await
            .expect("status set should succeed");
    }
    assert_eq!(status_of(&service, "T").await, TaskStatus::Done);

    service
        .set_task_status(PROJECT, "T", "todo")
        .await
        .expect("status set should succeed");
    assert_eq!(status_of(&service, "T").await, TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bogus_status_is_rejected_before_any_change(#[future(awt)] service: TestService) {
    add_task(&service, "T").await;

    let result = service.set_task_status(PROJECT, "T", "bogus").await;

    assert_eq!(
        result.expect_err("status should be rejected"),
        TaskServiceError::InvalidTaskStatus("bogus".to_owned())
    );
    assert_eq!(status_of(&service, "T").await, TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn description_updates_append_with_timestamped_headers(
    #[future(awt)] service: TestService,
) {
    service
        .add_task(PROJECT, "T", "")
        .await
        .expect("task creation should succeed");

    let (first, _) = service
        .update_task_description(PROJECT, "T", "first entry")
        .await
        .expect("update should succeed");
    assert!(first.description().starts_with("--- Created on"));
    assert!(first.description().ends_with("first entry"));

    let (second, _) = service
        .update_task_description(PROJECT, "T", "second entry")
        .await
        .expect("update should succeed");
    assert!(second.description().starts_with(first.description()));
    assert!(second.description().contains("--- Updated on"));
    assert!(second.description().ends_with("second entry"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checklist_creation_then_append(#[future(awt)] service: TestService) {
    add_task(&service, "T").await;

    let (_, created_message) = service
        .update_task_with_checklist(PROJECT, "T", &["a".to_owned(), "b".to_owned()])
        .await
        .expect("checklist creation should succeed");
    assert!(created_message.contains("New checklist created"));

    let (task, appended_message) = service
        .update_task_with_checklist(PROJECT, "T", &["c".to_owned()])
        .await
        .expect("checklist append should succeed");
    assert!(appended_message.contains("Items appended"));

    let checklist = task.checklist("Checklist").expect("checklist attached");
    let names: Vec<&str> = checklist.items().iter().map(|item| item.name()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checklist_items_complete_in_order_until_exhausted(
    #[future(awt)] service: TestService,
) {
    add_task(&service, "T").await;
    service
        .update_task_with_checklist(PROJECT, "T", &["a".to_owned(), "b".to_owned()])
        .await
        .expect("checklist creation should succeed");

    let (item, _) = service
        .get_next_unchecked_checklist_item(PROJECT, "T")
        .await
        .expect("an item should be unchecked");
    assert_eq!(item.name(), "a");

    service
        .complete_checklist_item(PROJECT, "T", "a")
        .await
        .expect("completion should succeed");
    let (next, _) = service
        .get_next_unchecked_checklist_item(PROJECT, "T")
        .await
        .expect("an item should be unchecked");
    assert_eq!(next.name(), "b");

    service
        .complete_checklist_item(PROJECT, "T", "b")
        .await
        .expect("completion should succeed");
    let exhausted = service.get_next_unchecked_checklist_item(PROJECT, "T").await;
    assert!(matches!(
        exhausted.expect_err("all items are checked"),
        TaskServiceError::ChecklistItemNotFound { .. }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checklist_operations_require_the_well_known_checklist(
    #[future(awt)] service: TestService,
) {
    add_task(&service, "T").await;

    let result = service.complete_checklist_item(PROJECT, "T", "a").await;

    assert!(matches!(
        result.expect_err("no checklist exists"),
        TaskServiceError::ChecklistNotFound { .. }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_unknown_checklist_item_fails_typed(#[future(awt)] service: TestService) {
    add_task(&service, "T").await;
    service
        .update_task_with_checklist(PROJECT, "T", &["a".to_owned()])
        .await
        .expect("checklist creation should succeed");

    let result = service.complete_checklist_item(PROJECT, "T", "missing").await;

    assert!(matches!(
        result.expect_err("item does not exist"),
        TaskServiceError::ChecklistItemNotFound { item, .. } if item == "missing"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filtered_listings_are_subsets_of_the_full_listing(
    #[future(awt)] service: TestService,
) {
    add_task(&service, "todo-task").await;
    add_task(&service, "wip-task").await;
    add_task(&service, "done-task").await;
    service
        .mark_as_in_progress(PROJECT, "wip-task")
        .await
        .expect("transition should succeed");
    service
        .mark_as_completed(PROJECT, "done-task")
        .await
        .expect("transition should succeed");

    let (all, all_message) = service
        .get_tasks(PROJECT, "all")
        .await
        .expect("listing should succeed");
    let (wip, _) = service
        .get_tasks(PROJECT, "wip")
        .await
        .expect("listing should succeed");
    let (done, _) = service
        .get_tasks(PROJECT, "done")
        .await
        .expect("listing should succeed");

    assert_eq!(all.len(), 3);
    assert_eq!(all_message, "Found 3 task(s) in project 'Platform'.");
    for summary in &wip {
        assert_eq!(summary.status, TaskStatus::Wip);
        assert!(all.contains(summary));
    }
    for summary in &done {
        assert_eq!(summary.status, TaskStatus::Done);
        assert!(all.contains(summary));
    }
    assert_eq!(wip.len(), 1);
    assert_eq!(done.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_unknown_project_is_an_empty_success(#[future(awt)] service: TestService) {
    let (summaries, message) = service
        .get_tasks("Nowhere", "all")
        .await
        .expect("listing should succeed");

    assert!(summaries.is_empty());
    assert_eq!(message, "No tasks found in project 'Nowhere'.");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_with_unknown_filter_is_an_empty_success(#[future(awt)] service: TestService) {
    add_task(&service, "T").await;

    let (summaries, message) = service
        .get_tasks(PROJECT, "urgent")
        .await
        .expect("listing should succeed");

    assert!(summaries.is_empty());
    assert!(message.contains("filter 'urgent'"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_delete_empties_the_project(#[future(awt)] service: TestService) {
    add_task(&service, "one").await;
    add_task(&service, "two").await;

    let message = service
        .delete_all_tasks(PROJECT)
        .await
        .expect("deletion should succeed");
    assert_eq!(
        message,
        "All tasks in project 'Platform' have been deleted."
    );

    let (summaries, _) = service
        .get_tasks(PROJECT, "all")
        .await
        .expect("listing should succeed");
    assert!(summaries.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_delete_tolerates_missing_project(#[future(awt)] service: TestService) {
    let message = service
        .delete_all_tasks("Nowhere")
        .await
        .expect("deletion should succeed");

    assert_eq!(message, "Project 'Nowhere' not found.");
}
