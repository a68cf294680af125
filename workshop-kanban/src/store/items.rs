//! Item Store: the in-memory ordered list of project records.

use crate::types::{ColumnId, Item, ItemId};
use indexmap::IndexMap;
use tracing::debug;

/// Ordered collection of items for one open board.
///
/// The array order is only a tie-breaker. The order of a container is its
/// items stable-sorted by `position`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from fetched items, keeping their order
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append an item to the array
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Replace every item, as after a refetch
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Copy of the raw array
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }

    /// Items of a column in display order
    pub fn container_items(&self, column: &ColumnId) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| &item.column_id == column)
            .collect();
        // sort_by_key is stable, so array order breaks position ties
        items.sort_by_key(|item| item.position);
        items
    }

    /// Ids of a column in display order
    pub fn container_ids(&self, column: &ColumnId) -> Vec<ItemId> {
        self.container_items(column)
            .into_iter()
            .map(|item| item.id.clone())
            .collect()
    }

    /// Move an item to a column and position without touching anything else
    pub fn set_placement(&mut self, id: &ItemId, column: &ColumnId, position: i64) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.column_id = column.clone();
                item.position = position;
                true
            }
            None => false,
        }
    }

    /// Make `ids` the order of `column`: every listed item joins the column and
    /// positions are re-derived as `0..n`.
    pub fn apply_container_order(&mut self, column: &ColumnId, ids: &[ItemId]) {
        for (index, id) in ids.iter().enumerate() {
            if !self.set_placement(id, column, index as i64) {
                debug!(item = %id, column = %column, "skipping unknown item in declared order");
            }
        }
    }

    /// Re-derive every column's positions as `0..n`, keeping display order
    pub fn normalize_positions(&mut self) {
        let mut columns: IndexMap<ColumnId, Vec<usize>> = IndexMap::new();
        for (index, item) in self.items.iter().enumerate() {
            columns.entry(item.column_id.clone()).or_default().push(index);
        }
        for indices in columns.into_values() {
            let mut ranked: Vec<(i64, usize)> = indices
                .into_iter()
                .map(|index| (self.items[index].position, index))
                .collect();
            // array index breaks position ties, as in container_items
            ranked.sort_unstable();
            for (position, (_, index)) in ranked.into_iter().enumerate() {
                self.items[index].position = position as i64;
            }
        }
    }

    /// Remove `id` from the array and re-insert it immediately before
    /// `follower`, or at the end when there is no follower.
    pub fn splice_before(&mut self, id: &ItemId, follower: Option<&ItemId>) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let item = self.items.remove(from);
        let at = follower
            .and_then(|f| self.index_of(f))
            .unwrap_or(self.items.len());
        self.items.insert(at, item);
        true
    }
}
