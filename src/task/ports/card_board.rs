//! Remote card/board backend contract.
//!
//! Models the slice of a card-board API the task service needs: lists on a
//! single pre-selected board, cards within a list, board labels, and card
//! checklists. Implementations are bound to one board at construction time.

use super::RemoteApiResult;
use async_trait::async_trait;

/// A list (project container) on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardList {
    /// Backend-assigned list identifier.
    pub id: String,
    /// List name; maps 1:1 to a project name.
    pub name: String,
}

/// A label defined on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLabel {
    /// Backend-assigned label identifier.
    pub id: String,
    /// Label name.
    pub name: String,
    /// Label color.
    pub color: String,
}

/// A card (task) within a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// Backend-assigned card identifier.
    pub id: String,
    /// Card name; maps to the task title.
    pub name: String,
    /// Card description.
    pub description: String,
    /// Identifiers of the labels attached to the card.
    pub label_ids: Vec<String>,
    /// Completion marker.
    pub due_complete: bool,
}

impl CardRecord {
    /// Reports whether the given label is attached to this card.
    #[must_use]
    pub fn has_label(&self, label_id: &str) -> bool {
        self.label_ids.iter().any(|id| id == label_id)
    }
}

/// A checklist item on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardChecklistItem {
    /// Backend-assigned item identifier.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Whether the item has been checked off.
    pub checked: bool,
}

/// A checklist on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardChecklist {
    /// Backend-assigned checklist identifier.
    pub id: String,
    /// Checklist name.
    pub name: String,
    /// Items in insertion order.
    pub items: Vec<CardChecklistItem>,
}

/// Card/board API contract, scoped to one board.
#[async_trait]
pub trait CardBoardApi: Send + Sync {
    /// Returns every list on the board, in board order.
    async fn lists(&self) -> RemoteApiResult<Vec<BoardList>>;

    /// Creates a new list on the board.
    async fn create_list(&self, name: &str) -> RemoteApiResult<BoardList>;

    /// Returns the cards of a list in list order (creation order).
    async fn cards(&self, list_id: &str) -> RemoteApiResult<Vec<CardRecord>>;

    /// Creates a card at the bottom of a list.
    async fn create_card(
        &self,
        list_id: &str,
        name: &str,
        description: &str,
    ) -> RemoteApiResult<CardRecord>;

    /// Returns every label defined on the board.
    async fn labels(&self) -> RemoteApiResult<Vec<CardLabel>>;

    /// Creates a label on the board.
    async fn create_label(&self, name: &str, color: &str) -> RemoteApiResult<CardLabel>;

    /// Attaches a label to a card. Attaching an already-attached label is a
    /// backend-tolerated no-op.
    async fn add_label(&self, card_id: &str, label_id: &str) -> RemoteApiResult<()>;

    /// Detaches a label from a card.
    async fn remove_label(&self, card_id: &str, label_id: &str) -> RemoteApiResult<()>;

    /// Sets or clears the card's completion marker.
    async fn set_due_complete(&self, card_id: &str, complete: bool) -> RemoteApiResult<()>;

    /// Replaces the card description.
    async fn set_description(&self, card_id: &str, description: &str) -> RemoteApiResult<()>;

    /// Returns the card's checklists with their items in insertion order.
    async fn checklists(&self, card_id: &str) -> RemoteApiResult<Vec<CardChecklist>>;

    /// Creates a checklist on a card with the given items, in order.
    async fn create_checklist(
        &self,
        card_id: &str,
        name: &str,
        items: &[String],
    ) -> RemoteApiResult<CardChecklist>;

    /// Appends an unchecked item to a checklist.
    async fn add_checklist_item(
        &self,
        checklist_id: &str,
        name: &str,
    ) -> RemoteApiResult<CardChecklistItem>;

    /// Sets the checked state of a checklist item.
    async fn set_checklist_item(
        &self,
        card_id: &str,
        item_id: &str,
        checked: bool,
    ) -> RemoteApiResult<()>;

    /// Permanently deletes a card.
    async fn delete_card(&self, card_id: &str) -> RemoteApiResult<()>;
}
