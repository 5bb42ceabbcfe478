//! Thread-safe in-memory card board for adapter tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::task::ports::{
    BoardList, CardBoardApi, CardChecklist, CardChecklistItem, CardLabel, CardRecord,
    RemoteApiError, RemoteApiResult,
};

/// Thread-safe in-memory implementation of [`CardBoardApi`].
///
/// Lists, cards, labels, and checklist items keep insertion order, matching
/// the creation-order listing the remote board guarantees.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardBoard {
    state: Arc<RwLock<BoardState>>,
}

#[derive(Debug, Default)]
struct BoardState {
    lists: Vec<ListState>,
    labels: Vec<CardLabel>,
}

#[derive(Debug)]
struct ListState {
    id: String,
    name: String,
    cards: Vec<CardState>,
}

#[derive(Debug)]
struct CardState {
    id: String,
    name: String,
    description: String,
    label_ids: Vec<String>,
    due_complete: bool,
    checklists: Vec<CardChecklist>,
}

impl CardState {
    fn to_record(&self) -> CardRecord {
        CardRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            label_ids: self.label_ids.clone(),
            due_complete: self.due_complete,
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn poisoned(err: impl std::fmt::Display) -> RemoteApiError {
    RemoteApiError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryCardBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state<R>(&self, reader: impl FnOnce(&BoardState) -> R) -> RemoteApiResult<R> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(reader(&state))
    }

    fn write_state<R>(
        &self,
        writer: impl FnOnce(&mut BoardState) -> RemoteApiResult<R>,
    ) -> RemoteApiResult<R> {
        let mut state = self.state.write().map_err(poisoned)?;
        writer(&mut state)
    }
}

fn card_mut<'a>(state: &'a mut BoardState, card_id: &str) -> RemoteApiResult<&'a mut CardState> {
    state
        .lists
        .iter_mut()
        .flat_map(|list| list.cards.iter_mut())
        .find(|card| card.id == card_id)
        .ok_or_else(|| RemoteApiError::backend(format!("card '{card_id}' not found")))
}

#[async_trait]
impl CardBoardApi for InMemoryCardBoard {
    async fn lists(&self) -> RemoteApiResult<Vec<BoardList>> {
        self.read_state(|state| {
            state
                .lists
                .iter()
                .map(|list| BoardList {
                    id: list.id.clone(),
                    name: list.name.clone(),
                })
                .collect()
        })
    }

    async fn create_list(&self, name: &str) -> RemoteApiResult<BoardList> {
        self.write_state(|state| {
            let list = ListState {
                id: new_id(),
                name: name.to_owned(),
                cards: Vec::new(),
            };
            let created = BoardList {
                id: list.id.clone(),
                name: list.name.clone(),
            };
            state.lists.push(list);
            Ok(created)
        })
    }

    async fn cards(&self, list_id: &str) -> RemoteApiResult<Vec<CardRecord>> {
        self.read_state(|state| {
            state
                .lists
                .iter()
                .find(|list| list.id == list_id)
                .map(|list| list.cards.iter().map(CardState::to_record).collect())
        })?
        .ok_or_else(|| RemoteApiError::backend(format!("list '{list_id}' not found")))
    }

    async fn create_card(
        &self,
        list_id: &str,
        name: &str,
        description: &str,
    ) -> RemoteApiResult<CardRecord> {
        self.write_state(|state| {
            let list = state
                .lists
                .iter_mut()
                .find(|list| list.id == list_id)
                .ok_or_else(|| RemoteApiError::backend(format!("list '{list_id}' not found")))?;
            let card = CardState {
                id: new_id(),
                name: name.to_owned(),
                description: description.to_owned(),
                label_ids: Vec::new(),
                due_complete: false,
                checklists: Vec::new(),
            };
            let record = card.to_record();
            list.cards.push(card);
            Ok(record)
        })
    }

    async fn labels(&self) -> RemoteApiResult<Vec<CardLabel>> {
        self.read_state(|state| state.labels.clone())
    }

    async fn create_label(&self, name: &str, color: &str) -> RemoteApiResult<CardLabel> {
        self.write_state(|state| {
            let label = CardLabel {
                id: new_id(),
                name: name.to_owned(),
                color: color.to_owned(),
            };
            state.labels.push(label.clone());
            Ok(label)
        })
    }

    async fn add_label(&self, card_id: &str, label_id: &str) -> RemoteApiResult<()> {
        self.write_state(|state| {
            let card = card_mut(state, card_id)?;
            if !card.label_ids.iter().any(|id| id == label_id) {
                card.label_ids.push(label_id.to_owned());
            }
            Ok(())
        })
    }

    async fn remove_label(&self, card_id: &str, label_id: &str) -> RemoteApiResult<()> {
        self.write_state(|state| {
            let card = card_mut(state, card_id)?;
            card.label_ids.retain(|id| id != label_id);
            Ok(())
        })
    }

    async fn set_due_complete(&self, card_id: &str, complete: bool) -> RemoteApiResult<()> {
        self.write_state(|state| {
            card_mut(state, card_id)?.due_complete = complete;
            Ok(())
        })
    }

    async fn set_description(&self, card_id: &str, description: &str) -> RemoteApiResult<()> {
        self.write_state(|state| {
            card_mut(state, card_id)?.description = description.to_owned();
            Ok(())
        })
    }

    async fn checklists(&self, card_id: &str) -> RemoteApiResult<Vec<CardChecklist>> {
        self.write_state(|state| Ok(card_mut(state, card_id)?.checklists.clone()))
    }

    async fn create_checklist(
        &self,
        card_id: &str,
        name: &str,
        items: &[String],
    ) -> RemoteApiResult<CardChecklist> {
        self.write_state(|state| {
            let card = card_mut(state, card_id)?;
            let checklist = CardChecklist {
                id: new_id(),
                name: name.to_owned(),
                items: items
                    .iter()
                    .map(|item| CardChecklistItem {
                        id: new_id(),
                        name: item.clone(),
                        checked: false,
                    })
                    .collect(),
            };
            card.checklists.push(checklist.clone());
            Ok(checklist)
        })
    }

    async fn add_checklist_item(
        &self,
        checklist_id: &str,
        name: &str,
    ) -> RemoteApiResult<CardChecklistItem> {
        self.write_state(|state| {
            let checklist = state
                .lists
                .iter_mut()
                .flat_map(|list| list.cards.iter_mut())
                .flat_map(|card| card.checklists.iter_mut())
                .find(|checklist| checklist.id == checklist_id)
                .ok_or_else(|| {
                    RemoteApiError::backend(format!("checklist '{checklist_id}' not found"))
                })?;
            let item = CardChecklistItem {
                id: new_id(),
                name: name.to_owned(),
                checked: false,
            };
            checklist.items.push(item.clone());
            Ok(item)
        })
    }

    async fn set_checklist_item(
        &self,
        card_id: &str,
        item_id: &str,
        checked: bool,
    ) -> RemoteApiResult<()> {
        self.write_state(|state| {
            let card = card_mut(state, card_id)?;
            let item = card
                .checklists
                .iter_mut()
                .flat_map(|checklist| checklist.items.iter_mut())
                .find(|item| item.id == item_id)
                .ok_or_else(|| {
                    RemoteApiError::backend(format!("checklist item '{item_id}' not found"))
                })?;
            item.checked = checked;
            Ok(())
        })
    }

    async fn delete_card(&self, card_id: &str) -> RemoteApiResult<()> {
        self.write_state(|state| {
            for list in &mut state.lists {
                let before = list.cards.len();
                list.cards.retain(|card| card.id != card_id);
                if list.cards.len() != before {
                    return Ok(());
                }
            }
            Err(RemoteApiError::backend(format!(
                "card '{card_id}' not found"
            )))
        })
    }
}
