//! Checklists and checklist items attached to tasks.

use serde::{Deserialize, Serialize};

/// A single entry in a task checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    name: String,
    checked: bool,
    id: Option<String>,
}

impl ChecklistItem {
    /// Creates an unchecked item with no backend identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked: false,
            id: None,
        }
    }

    /// Reconstructs an item from backend data.
    #[must_use]
    pub fn from_backend(name: impl Into<String>, checked: bool, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked,
            id: Some(id.into()),
        }
    }

    /// Returns the item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the item has been checked off.
    #[must_use]
    pub const fn checked(&self) -> bool {
        self.checked
    }

    /// Returns the backend-assigned identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Marks the item as checked. Items are never unchecked.
    pub const fn check(&mut self) {
        self.checked = true;
    }
}

/// An ordered collection of checklist items under a named checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    name: String,
    items: Vec<ChecklistItem>,
    id: Option<String>,
}

impl Checklist {
    /// Creates a checklist with the given items, in order.
    #[must_use]
    pub fn new(name: impl Into<String>, items: impl IntoIterator<Item = ChecklistItem>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().collect(),
            id: None,
        }
    }

    /// Sets the backend-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the checklist name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Returns the backend-assigned identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Appends a new unchecked item and returns a copy of it.
    pub fn add_item(&mut self, name: impl Into<String>) -> ChecklistItem {
        let item = ChecklistItem::new(name);
        self.items.push(item.clone());
        item
    }

    /// Checks the first item with the given name.
    ///
    /// Returns `false` when no item matches. Duplicate names resolve to the
    /// first occurrence in insertion order.
    pub fn complete_item(&mut self, name: &str) -> bool {
        self.items
            .iter_mut()
            .find(|item| item.name == name)
            .is_some_and(|item| {
                item.check();
                true
            })
    }

    /// Returns the first unchecked item in insertion order, if any.
    #[must_use]
    pub fn next_unchecked_item(&self) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| !item.checked)
    }

    /// Reports whether every item has been checked off.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.items.iter().all(ChecklistItem::checked)
    }
}
