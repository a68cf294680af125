//! Reorder Engine
//!
//! Turns drag transitions into item placement and column order changes.
//! It runs in two modes:
//!
//! - **preview** on every hover change. Only a move into a *different*
//!   container touches the store, and only the dragged item's `column_id` and
//!   `position`. Nothing is persisted.
//! - **commit** on drop. The destination order is built as a sequence of ids,
//!   applied to the store, and returned as [`PersistInstruction`]s for the
//!   caller to hand to the persistence layer.
//!
//! Anything that cannot be resolved (unknown ids, a drop outside every
//! target, a drop onto the dragged entity itself) is a no-op that puts the
//! dragged item back where it started.

mod resolve;

pub use resolve::{move_index, resolve_container, target_index};

use crate::drag::Dragged;
use crate::persist::PersistInstruction;
use crate::store::{ColumnRegistry, ItemStore};
use crate::types::{ColumnId, EntityKind, ItemId, Placement, Target};
use tracing::{debug, info};

/// Borrow of one board's item and column state
pub struct ReorderEngine<'a> {
    items: &'a mut ItemStore,
    columns: &'a mut ColumnRegistry,
}

impl<'a> ReorderEngine<'a> {
    pub fn new(items: &'a mut ItemStore, columns: &'a mut ColumnRegistry) -> Self {
        Self { items, columns }
    }

    fn container_of(&self, id: &str, kind: EntityKind) -> Option<ColumnId> {
        resolve_container(&*self.items, &*self.columns, id, kind)
    }

    /// Reflow the dragged item into the hovered container.
    ///
    /// Returns true when the store changed. Same-container hovers and column
    /// drags never change it.
    pub fn preview(&mut self, dragged: &Dragged, over: &Target) -> bool {
        if dragged.kind != EntityKind::Item || dragged.id == over.id {
            return false;
        }
        let Some(active) = self.container_of(&dragged.id, EntityKind::Item) else {
            return false;
        };
        let Some(over_container) = self.container_of(&over.id, over.kind) else {
            return false;
        };
        if active == over_container {
            return false;
        }

        let new_position = match over.kind {
            EntityKind::Column => self.items.container_items(&over_container).len() as i64 + 1,
            EntityKind::Item => {
                let over_index = self
                    .items
                    .container_items(&over_container)
                    .iter()
                    .position(|item| item.id.as_str() == over.id)
                    .unwrap_or(0);
                let below = usize::from(over.placement == Placement::After);
                (over_index + below) as i64
            }
        };

        debug!(
            item = %dragged.id,
            from = %active,
            to = %over_container,
            position = new_position,
            "preview move across containers"
        );
        self.items
            .set_placement(&ItemId::from(dragged.id.as_str()), &over_container, new_position)
    }

    /// Finalize a drop. `drop` is the target under the pointer at release,
    /// `None` when released outside every target.
    pub fn commit(&mut self, dragged: &Dragged, drop: Option<&Target>) -> Vec<PersistInstruction> {
        let Some(drop) = drop else {
            debug!(id = %dragged.id, "dropped outside any target");
            self.restore_origin(dragged);
            return Vec::new();
        };
        if drop.id == dragged.id {
            debug!(id = %dragged.id, "self-drop");
            self.restore_origin(dragged);
            return Vec::new();
        }

        match dragged.kind {
            EntityKind::Column => self.commit_column(dragged, drop),
            EntityKind::Item => self.commit_item(dragged, drop),
        }
    }

    /// Put a dragged item back at its pre-drag placement, undoing previews
    pub fn restore_origin(&mut self, dragged: &Dragged) {
        if let Some(origin) = &dragged.origin {
            self.items.set_placement(
                &ItemId::from(dragged.id.as_str()),
                &origin.column,
                origin.position,
            );
        }
    }

    fn commit_column(&mut self, dragged: &Dragged, drop: &Target) -> Vec<PersistInstruction> {
        let Some(from) = self.columns.index_of(&ColumnId::from(dragged.id.as_str())) else {
            return Vec::new();
        };
        let Some(to) = self
            .container_of(&drop.id, drop.kind)
            .and_then(|column| self.columns.index_of(&column))
        else {
            return Vec::new();
        };

        if !self.columns.move_column(from, to) {
            return Vec::new();
        }
        info!(column = %dragged.id, from, to, "column reordered");
        vec![PersistInstruction::ColumnOrder {
            columns: self.columns.orders(),
        }]
    }

    fn commit_item(&mut self, dragged: &Dragged, drop: &Target) -> Vec<PersistInstruction> {
        let id = ItemId::from(dragged.id.as_str());
        let Some(active) = self.container_of(&dragged.id, EntityKind::Item) else {
            return Vec::new();
        };
        let Some(destination) = self.container_of(&drop.id, drop.kind) else {
            debug!(id = %dragged.id, over = %drop.id, "drop target did not resolve");
            self.restore_origin(dragged);
            return Vec::new();
        };
        let source = dragged
            .origin
            .as_ref()
            .map(|origin| origin.column.clone())
            .unwrap_or(active);

        let mut sequence = self.items.container_ids(&destination);
        let index = match sequence.iter().position(|other| other == &id) {
            // array move within the column the drag started in
            Some(from) if source == destination => {
                let to = move_index(&sequence, from, drop);
                let moved = sequence.remove(from);
                sequence.insert(to, moved);
                to
            }
            _ => {
                sequence.retain(|other| other != &id);
                let index = target_index(&sequence, drop);
                sequence.insert(index, id.clone());
                index
            }
        };
        let follower = sequence.get(index + 1).cloned();

        self.items.apply_container_order(&destination, &sequence);
        self.items.splice_before(&id, follower.as_ref());

        info!(
            item = %id,
            from = %source,
            to = %destination,
            index,
            "item placed"
        );
        let mut instructions = vec![PersistInstruction::ContainerOrder {
            column: destination.clone(),
            items: sequence,
        }];

        if source != destination {
            let remaining = self.items.container_ids(&source);
            self.items.apply_container_order(&source, &remaining);
            instructions.push(PersistInstruction::ContainerOrder {
                column: source,
                items: remaining,
            });
        }
        instructions
    }
}
