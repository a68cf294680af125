//! BoardSession - one open board view
//!
//! The session owns the board's item and column state, its drag session, and
//! the persistence queue. UI event handlers call into it synchronously; the
//! only asynchronous edges are loading and waiting on the queue.

use crate::config::BoardConfig;
use crate::drag::{DragSession, Dragged, Origin};
use crate::error::Result;
use crate::persist::{PersistInstruction, PersistQueue, PersistStats, PersistenceGateway};
use crate::reorder::ReorderEngine;
use crate::store::{ColumnRegistry, ItemStore};
use crate::types::{Column, ColumnId, EntityKind, Item, ItemId, Target};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State and event hooks for one open board
pub struct BoardSession {
    items: ItemStore,
    columns: ColumnRegistry,
    drag: DragSession,
    gateway: Arc<dyn PersistenceGateway>,
    queue: PersistQueue,
}

impl BoardSession {
    /// Fetch projects and columns and open a session over them
    pub async fn load(gateway: Arc<dyn PersistenceGateway>, config: &BoardConfig) -> Result<Self> {
        let columns = gateway.fetch_columns().await?;
        let items = gateway.fetch_projects().await?;
        info!(items = items.len(), columns = columns.len(), "board loaded");
        Ok(Self::from_parts(items, columns, gateway, config.coalesce))
    }

    /// Open a session over already-fetched state. Must be called within a
    /// Tokio runtime.
    pub fn from_parts(
        items: Vec<Item>,
        columns: Vec<Column>,
        gateway: Arc<dyn PersistenceGateway>,
        coalesce: bool,
    ) -> Self {
        let mut items = ItemStore::from_items(items);
        items.normalize_positions();
        let queue = PersistQueue::spawn(gateway.clone(), coalesce);
        Self {
            items,
            columns: ColumnRegistry::new(columns),
            drag: DragSession::new(),
            gateway,
            queue,
        }
    }

    /// Refetch everything, discarding optimistic state the store never
    /// accepted. Any drag in progress is dropped.
    pub async fn reload(&mut self) -> Result<()> {
        let stats = self.queue.flush().await;
        if stats.failed > 0 {
            warn!(failed = stats.failed, "reconciling after failed writes");
        }
        let columns = self.gateway.fetch_columns().await?;
        let items = self.gateway.fetch_projects().await?;
        self.drag.clear();
        self.columns.replace_all(columns);
        self.items.replace_all(items);
        self.items.normalize_positions();
        info!(items = self.items.len(), "board reloaded");
        Ok(())
    }

    // =========================================================================
    // Event hooks
    // =========================================================================

    /// Start dragging an item or column. Ignored while another drag is active.
    pub fn begin_drag(&mut self, id: &str, kind: EntityKind) -> bool {
        let origin = match kind {
            EntityKind::Item => self.items.get(&ItemId::from(id)).map(|item| Origin {
                column: item.column_id.clone(),
                position: item.position,
            }),
            EntityKind::Column => None,
        };
        self.drag.begin(id, kind, origin)
    }

    /// Pointer moved over a target. Records it and reflows the dragged item
    /// if the target is in another container. Returns true when the store
    /// changed.
    pub fn update_hover(&mut self, target: Target) -> bool {
        if !self.drag.update_hover(target.clone()) {
            return false;
        }
        let Some(dragged) = self.drag.dragged().cloned() else {
            return false;
        };
        ReorderEngine::new(&mut self.items, &mut self.columns).preview(&dragged, &target)
    }

    /// Pointer left every target
    pub fn leave_hover(&mut self) {
        self.drag.leave_hover();
    }

    /// Drop onto `drop` (or outside every target with `None`). Applies the
    /// result locally, queues its persistence, and clears the drag. Returns
    /// the queued instructions.
    pub fn commit_drag(&mut self, drop: Option<Target>) -> Vec<PersistInstruction> {
        let Some(finished) = self.drag.take() else {
            debug!("commit without an active drag");
            return Vec::new();
        };
        let instructions = ReorderEngine::new(&mut self.items, &mut self.columns)
            .commit(&finished.dragged, drop.as_ref());
        for instruction in &instructions {
            if !self.queue.submit(instruction.clone()) {
                warn!(key = ?instruction.key(), "persistence worker stopped, instruction dropped");
            }
        }
        instructions
    }

    /// Drop on the last hovered target
    pub fn commit_at_hover(&mut self) -> Vec<PersistInstruction> {
        let hover = self.drag.hover().cloned();
        self.commit_drag(hover)
    }

    /// Abandon the drag, restoring the pre-drag placement
    pub fn cancel_drag(&mut self) {
        if let Some(finished) = self.drag.take() {
            debug!(id = %finished.dragged.id, "drag cancelled");
            ReorderEngine::new(&mut self.items, &mut self.columns).restore_origin(&finished.dragged);
        }
    }

    // =========================================================================
    // Read-only views
    // =========================================================================

    /// Items ordered by column order, then position. Items whose column is
    /// unknown come last.
    pub fn items(&self) -> Vec<Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by_key(|item| {
            (
                self.columns.index_of(&item.column_id).unwrap_or(usize::MAX),
                item.position,
            )
        });
        items.into_iter().cloned().collect()
    }

    /// Columns in display order
    pub fn columns(&self) -> Vec<Column> {
        self.columns.snapshot()
    }

    /// Items of one column in display order
    pub fn container_items(&self, column: &ColumnId) -> Vec<Item> {
        self.items
            .container_items(column)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn item_store(&self) -> &ItemStore {
        &self.items
    }

    pub fn column_registry(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn dragged(&self) -> Option<&Dragged> {
        self.drag.dragged()
    }

    pub fn hover(&self) -> Option<&Target> {
        self.drag.hover()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Wait for every queued write
    pub async fn flush(&self) -> PersistStats {
        self.queue.flush().await
    }

    /// Drain the queue and close the session
    pub async fn close(self) -> PersistStats {
        self.queue.shutdown().await
    }
}
