//! Board-level types: Item, Column, Attachment, ColumnOrder

use super::ids::{ColumnId, ItemId};
use serde::{Deserialize, Serialize};

/// A project/task card on the board.
///
/// Only `id`, `column_id` and `position` matter to ordering. The rest is
/// carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub column_id: ColumnId,
    /// Rank within the column. Not required to be contiguous or unique;
    /// re-derived from declared order on every commit.
    #[serde(default)]
    pub position: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Item {
    /// Create a new item at the head of the given column
    pub fn new(title: impl Into<String>, column_id: impl Into<ColumnId>) -> Self {
        Self {
            id: ItemId::new(),
            column_id: column_id.into(),
            position: 0,
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Override the generated id
    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// A file or link attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// A column defines a workflow stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub order: usize,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
        }
    }

    /// The stock columns for a new board
    pub fn defaults() -> Vec<Column> {
        vec![
            Column::new("todo", "To Do", 0),
            Column::new("doing", "Doing", 1),
            Column::new("done", "Done", 2),
        ]
    }
}

/// One entry of a declared column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOrder {
    pub id: ColumnId,
    pub order: usize,
}
