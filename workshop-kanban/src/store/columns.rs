//! Column Registry: the left-to-right column sequence.

use crate::types::{Column, ColumnId, ColumnOrder};

/// Columns kept sorted by `order`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl ColumnRegistry {
    /// Build a registry, sorting by `order`. Duplicate orders keep their
    /// input sequence.
    pub fn new(mut columns: Vec<Column>) -> Self {
        columns.sort_by_key(|c| c.order);
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn get(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ColumnId) -> bool {
        self.get(id).is_some()
    }

    /// Index of a column in display order
    pub fn index_of(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    pub fn ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    pub fn snapshot(&self) -> Vec<Column> {
        self.columns.clone()
    }

    pub fn replace_all(&mut self, columns: Vec<Column>) {
        *self = Self::new(columns);
    }

    /// Array move of the column at `from` to `to`, then renumber `order` to
    /// `0..n` so no duplicates survive. Returns false when nothing moved.
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.columns.len() || to >= self.columns.len() {
            return false;
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.order = index;
        }
    }

    /// The current order as a persistence payload
    pub fn orders(&self) -> Vec<ColumnOrder> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, c)| ColumnOrder {
                id: c.id.clone(),
                order: index,
            })
            .collect()
    }
}
