//! Card/board implementation of the task-service contract.
//!
//! Projects map to lists on a single board, tasks to cards, the WIP marker
//! to a board label, and the completion marker to the card's due-complete
//! flag. The project list is re-resolved on every call; the only state kept
//! after construction is the immutable WIP label reference.

mod http;

pub use http::HttpCardBoardApi;

use crate::task::domain::{
    Checklist, ChecklistItem, DEFAULT_CHECKLIST_NAME, TIMESTAMP_FORMAT, Task, TaskFilter,
    TaskStatus, TaskSummary, append_entry,
};
use crate::task::ports::{
    BoardList, CardBoardApi, CardChecklist, CardLabel, CardRecord, RemoteApiError, TaskService,
    TaskServiceError, TaskServiceResult,
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Backend name used in error and log context.
const BACKEND_NAME: &str = "Trello";

/// Name of the label marking in-progress cards.
const WIP_LABEL_NAME: &str = "WIP";

/// Color assigned to the WIP label when it has to be created.
const WIP_LABEL_COLOR: &str = "blue";

/// Task service over a card/board backend.
pub struct TrelloTaskService<A, C>
where
    A: CardBoardApi,
    C: Clock + Send + Sync,
{
    api: Arc<A>,
    clock: Arc<C>,
    wip_label: CardLabel,
}

impl<A, C> std::fmt::Debug for TrelloTaskService<A, C>
where
    A: CardBoardApi,
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloTaskService")
            .field("wip_label", &self.wip_label)
            .finish_non_exhaustive()
    }
}

/// Wraps a remote failure into the backend connection error.
fn connection(context: &str, err: &RemoteApiError) -> TaskServiceError {
    TaskServiceError::connection(BACKEND_NAME, format!("{context}: {err}"))
}

impl<A, C> TrelloTaskService<A, C>
where
    A: CardBoardApi,
    C: Clock + Send + Sync,
{
    /// Connects to the board, ensuring the WIP label exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Connection`] when the label bootstrap
    /// fails.
    pub async fn connect(api: Arc<A>, clock: Arc<C>) -> TaskServiceResult<Self> {
        let wip_label = ensure_wip_label(&*api).await?;
        info!(label_id = %wip_label.id, "card board WIP label ready");
        Ok(Self {
            api,
            clock,
            wip_label,
        })
    }

    fn derive_status(&self, card: &CardRecord) -> TaskStatus {
        TaskStatus::from_markers(card.has_label(&self.wip_label.id), card.due_complete)
    }

    fn task_from_card(&self, project_name: &str, card: &CardRecord) -> Task {
        Task::new(
            card.name.clone(),
            card.description.clone(),
            project_name,
            self.derive_status(card),
        )
        .with_id(card.id.clone())
    }

    async fn find_list(
        &self,
        project_name: &str,
        context: &str,
    ) -> TaskServiceResult<Option<BoardList>> {
        let lists = self
            .api
            .lists()
            .await
            .map_err(|err| connection(context, &err))?;
        Ok(lists.into_iter().find(|list| list.name == project_name))
    }

    async fn find_or_create_list(
        &self,
        project_name: &str,
        context: &str,
    ) -> TaskServiceResult<BoardList> {
        if let Some(list) = self.find_list(project_name, context).await? {
            return Ok(list);
        }
        self.api
            .create_list(project_name)
            .await
            .map_err(|err| connection(context, &err))
    }

    async fn find_card(
        &self,
        project_name: &str,
        title: &str,
        context: &str,
    ) -> TaskServiceResult<CardRecord> {
        let list = self
            .find_list(project_name, context)
            .await?
            .ok_or_else(|| TaskServiceError::task_not_found(project_name, title))?;
        let cards = self
            .api
            .cards(&list.id)
            .await
            .map_err(|err| connection(context, &err))?;
        cards
            .into_iter()
            .find(|card| card.name == title)
            .ok_or_else(|| TaskServiceError::task_not_found(project_name, title))
    }

    async fn fetch_checklists(
        &self,
        card_id: &str,
        context: &str,
    ) -> TaskServiceResult<Vec<CardChecklist>> {
        self.api
            .checklists(card_id)
            .await
            .map_err(|err| connection(context, &err))
    }
}

/// Finds or creates the WIP label on the board.
async fn ensure_wip_label(api: &impl CardBoardApi) -> TaskServiceResult<CardLabel> {
    let bootstrap = async {
        let labels = api.labels().await?;
        match labels
            .into_iter()
            .find(|label| label.name == WIP_LABEL_NAME)
        {
            Some(label) => Ok(label),
            None => api.create_label(WIP_LABEL_NAME, WIP_LABEL_COLOR).await,
        }
    };
    bootstrap
        .await
        .map_err(|err| connection("Failed to create labels", &err))
}

/// Converts a fetched card checklist into its domain form.
fn checklist_from_card(checklist: &CardChecklist) -> Checklist {
    Checklist::new(
        checklist.name.clone(),
        checklist
            .items
            .iter()
            .map(|item| ChecklistItem::from_backend(item.name.clone(), item.checked, item.id.clone())),
    )
    .with_id(checklist.id.clone())
}

/// Builds the listing result message for the given filter and count.
fn listing_message(count: usize, filter: TaskFilter, project_name: &str) -> String {
    if count == 0 {
        match filter {
            TaskFilter::All => format!("No tasks found in project '{project_name}'."),
            TaskFilter::Wip => {
                format!("No work in progress tasks found in project '{project_name}'.")
            }
            TaskFilter::Done => format!("No completed tasks found in project '{project_name}'."),
        }
    } else {
        match filter {
            TaskFilter::All => format!("Found {count} task(s) in project '{project_name}'."),
            TaskFilter::Wip => {
                format!("Found {count} work in progress task(s) in project '{project_name}'.")
            }
            TaskFilter::Done => {
                format!("Found {count} completed task(s) in project '{project_name}'.")
            }
        }
    }
}

#[async_trait]
impl<A, C> TaskService for TrelloTaskService<A, C>
where
    A: CardBoardApi,
    C: Clock + Send + Sync,
{
    async fn add_task(
        &self,
        project_name: &str,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to add task";
        let list = self.find_or_create_list(project_name, context).await?;
        let card = self
            .api
            .create_card(&list.id, title, description)
            .await
            .map_err(|err| connection(context, &err))?;
        debug!(card_id = %card.id, %project_name, "card created");
        let task = self.task_from_card(project_name, &card);
        Ok((task, format!("Added new task '{title}' to {project_name}")))
    }

    async fn get_next_task(&self, project_name: &str) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to get next task";
        let list = self
            .find_list(project_name, context)
            .await?
            .ok_or_else(|| TaskServiceError::NoAvailableTasks(project_name.to_owned()))?;
        let cards = self
            .api
            .cards(&list.id)
            .await
            .map_err(|err| connection(context, &err))?;
        let card = cards
            .into_iter()
            .find(|card| !card.has_label(&self.wip_label.id) && !card.due_complete)
            .ok_or_else(|| TaskServiceError::NoAvailableTasks(project_name.to_owned()))?;
        let message = format!("Next available task: {} - {}", card.name, card.description);
        Ok((self.task_from_card(project_name, &card), message))
    }

    async fn mark_as_in_progress(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to mark task as in progress";
        let card = self.find_card(project_name, title, context).await?;
        self.api
            .add_label(&card.id, &self.wip_label.id)
            .await
            .map_err(|err| connection(context, &err))?;
        let task = Task::new(
            card.name.clone(),
            card.description.clone(),
            project_name,
            TaskStatus::from_markers(true, card.due_complete),
        )
        .with_id(card.id.clone());
        let message =
            format!("Task '{title}' in project '{project_name}' marked as in progress.");
        Ok((task, message))
    }

    async fn mark_as_completed(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to mark task as completed";
        let card = self.find_card(project_name, title, context).await?;
        if card.has_label(&self.wip_label.id) {
            self.api
                .remove_label(&card.id, &self.wip_label.id)
                .await
                .map_err(|err| connection(context, &err))?;
        }
        self.api
            .set_due_complete(&card.id, true)
            .await
            .map_err(|err| connection(context, &err))?;
        let task = Task::new(
            card.name.clone(),
            card.description.clone(),
            project_name,
            TaskStatus::Done,
        )
        .with_id(card.id.clone());
        let message = format!("Task '{title}' in project '{project_name}' has been completed.");
        Ok((task, message))
    }

    async fn update_task_description(
        &self,
        project_name: &str,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to update task description";
        let card = self.find_card(project_name, title, context).await?;
        let timestamp = self.clock.utc().format(TIMESTAMP_FORMAT).to_string();
        let updated = append_entry(&card.description, description, &timestamp);
        self.api
            .set_description(&card.id, &updated)
            .await
            .map_err(|err| connection(context, &err))?;
        let task = Task::new(card.name.clone(), updated, project_name, self.derive_status(&card))
            .with_id(card.id.clone());
        let message =
            format!("Description updated for task '{title}' in project '{project_name}'.");
        Ok((task, message))
    }

    async fn update_task_with_checklist(
        &self,
        project_name: &str,
        title: &str,
        checklist_items: &[String],
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to update task checklist";
        let card = self.find_card(project_name, title, context).await?;
        let checklists = self.fetch_checklists(&card.id, context).await?;
        let existing = checklists
            .iter()
            .find(|checklist| checklist.name == DEFAULT_CHECKLIST_NAME);

        let message = if let Some(checklist) = existing {
            for item in checklist_items {
                self.api
                    .add_checklist_item(&checklist.id, item)
                    .await
                    .map_err(|err| connection(context, &err))?;
            }
            format!(
                "Items appended to existing checklist in task '{title}' in project '{project_name}'."
            )
        } else {
            self.api
                .create_checklist(&card.id, DEFAULT_CHECKLIST_NAME, checklist_items)
                .await
                .map_err(|err| connection(context, &err))?;
            format!("New checklist created for task '{title}' in project '{project_name}'.")
        };

        let refreshed = self.fetch_checklists(&card.id, context).await?;
        let task = self
            .task_from_card(project_name, &card)
            .with_checklists(refreshed.iter().map(checklist_from_card));
        Ok((task, message))
    }

    async fn complete_checklist_item(
        &self,
        project_name: &str,
        title: &str,
        checklist_item_name: &str,
    ) -> TaskServiceResult<(Task, String)> {
        let context = "Failed to complete checklist item";
        let card = self.find_card(project_name, title, context).await?;
        let checklists = self.fetch_checklists(&card.id, context).await?;
        let checklist = checklists
            .iter()
            .find(|checklist| checklist.name == DEFAULT_CHECKLIST_NAME)
            .ok_or_else(|| TaskServiceError::ChecklistNotFound {
                checklist: DEFAULT_CHECKLIST_NAME.to_owned(),
                title: title.to_owned(),
            })?;
        let item = checklist
            .items
            .iter()
            .find(|item| item.name == checklist_item_name)
            .ok_or_else(|| TaskServiceError::ChecklistItemNotFound {
                item: checklist_item_name.to_owned(),
                title: title.to_owned(),
            })?;
        self.api
            .set_checklist_item(&card.id, &item.id, true)
            .await
            .map_err(|err| connection(context, &err))?;
        let refreshed = self.fetch_checklists(&card.id, context).await?;
        let task = self
            .task_from_card(project_name, &card)
            .with_checklists(refreshed.iter().map(checklist_from_card));
        let message = format!(
            "Checklist item '{checklist_item_name}' in task '{title}' in project '{project_name}' completed."
        );
        Ok((task, message))
    }

    async fn get_next_unchecked_checklist_item(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(ChecklistItem, String)> {
        let context = "Failed to get next unchecked checklist item";
        let card = self.find_card(project_name, title, context).await?;
        let checklists = self.fetch_checklists(&card.id, context).await?;
        let checklist = checklists
            .iter()
            .find(|checklist| checklist.name == DEFAULT_CHECKLIST_NAME)
            .ok_or_else(|| TaskServiceError::ChecklistNotFound {
                checklist: DEFAULT_CHECKLIST_NAME.to_owned(),
                title: title.to_owned(),
            })?;
        let item = checklist
            .items
            .iter()
            .find(|item| !item.checked)
            .ok_or_else(|| TaskServiceError::ChecklistItemNotFound {
                item: "none".to_owned(),
                title: title.to_owned(),
            })?;
        let message = format!(
            "Next unchecked checklist item for task '{title}': {}",
            item.name
        );
        Ok((
            ChecklistItem::from_backend(item.name.clone(), item.checked, item.id.clone()),
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
                format!("No tasks found with filter '{filter}' in project '{project_name}'.");
            return Ok((Vec::new(), message));
        };
        let Some(list) = self.find_list(project_name, context).await? else {
            return Ok((
                Vec::new(),
                format!("No tasks found in project '{project_name}'."),
            ));
        };
        let cards = self
            .api
            .cards(&list.id)
            .await
            .map_err(|err| connection(context, &err))?;
        let summaries: Vec<TaskSummary> = cards
            .iter()
            .filter_map(|card| {
                let status = self.derive_status(card);
                parsed.includes(status).then(|| TaskSummary {
                    title: card.name.clone(),
                    description: card.description.clone(),
                    status,
                    id: card.id.clone(),
                })
            })
            .collect();
        let message = listing_message(summaries.len(), parsed, project_name);
        Ok((summaries, message))
    }

    async fn get_task_status(
        &self,
        project_name: &str,
        title: &str,
    ) -> TaskServiceResult<(TaskStatus, String)> {
        let context = "Failed to get task status";
        let card = self.find_card(project_name, title, context).await?;
        let status = self.derive_status(&card);
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
        let card = self.find_card(project_name, title, context).await?;

        // Clear both markers so repeated calls converge on the same state.
        if card.has_label(&self.wip_label.id) {
            self.api
                .remove_label(&card.id, &self.wip_label.id)
                .await
                .map_err(|err| connection(context, &err))?;
        }
        if card.due_complete {
            self.api
                .set_due_complete(&card.id, false)
                .await
                .map_err(|err| connection(context, &err))?;
        }

        match target {
            TaskStatus::Wip => {
                self.api
                    .add_label(&card.id, &self.wip_label.id)
                    .await
                    .map_err(|err| connection(context, &err))?;
            }
            TaskStatus::Done => {
                self.api
                    .set_due_complete(&card.id, true)
                    .await
                    .map_err(|err| connection(context, &err))?;
            }
            TaskStatus::Todo => {}
        }

        let task = Task::new(card.name.clone(), card.description.clone(), project_name, target)
            .with_id(card.id.clone());
        Ok((task, format!("Task '{title}' status set to '{target}'")))
    }

    async fn delete_all_tasks(&self, project_name: &str) -> TaskServiceResult<String> {
        let context = "Failed to delete tasks";
        let Some(list) = self.find_list(project_name, context).await? else {
            return Ok(format!("Project '{project_name}' not found."));
        };
        let cards = self
            .api
            .cards(&list.id)
            .await
            .map_err(|err| connection(context, &err))?;
        let count = cards.len();
        for card in cards {
            self.api
                .delete_card(&card.id)
                .await
                .map_err(|err| connection(context, &err))?;
        }
        info!(%project_name, count, "cards deleted");
        Ok(format!(
            "All tasks in project '{project_name}' have been deleted."
        ))
    }
}
