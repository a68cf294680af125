//! In-memory gateway that records every call.

use super::{PersistInstruction, PersistenceGateway};
use crate::error::{KanbanError, Result};
use crate::types::{Column, ColumnId, ColumnOrder, Item, ItemId};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct MemoryState {
    items: Vec<Item>,
    columns: Vec<Column>,
    calls: Vec<PersistInstruction>,
    fetches: usize,
    fail_remaining: usize,
    failing: bool,
}

impl MemoryState {
    fn take_failure(&mut self) -> bool {
        if self.failing {
            return true;
        }
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            return true;
        }
        false
    }
}

/// Gateway backed by plain vectors. Writes are applied like a relational
/// store would: a container order sets `column_id` and `position` of every
/// listed row.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryGateway {
    pub fn new(items: Vec<Item>, columns: Vec<Column>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                items,
                columns,
                ..Default::default()
            }),
            latency: None,
        }
    }

    /// Delay every write, to widen the window in which commits pile up
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fail the next `count` writes
    pub fn fail_next(&self, count: usize) {
        self.state().fail_remaining = count;
    }

    /// Fail every write until turned off
    pub fn set_failing(&self, failing: bool) {
        self.state().failing = failing;
    }

    /// Every write that reached the gateway, including failed ones, in order
    pub fn calls(&self) -> Vec<PersistInstruction> {
        self.state().calls.clone()
    }

    /// Number of `fetch_projects` calls served
    pub fn fetch_count(&self) -> usize {
        self.state().fetches
    }

    /// The last sequence declared for a column
    pub fn last_container_order(&self, column: &ColumnId) -> Option<Vec<ItemId>> {
        self.state().calls.iter().rev().find_map(|call| match call {
            PersistInstruction::ContainerOrder { column: c, items } if c == column => {
                Some(items.clone())
            }
            _ => None,
        })
    }

    /// Current stored items
    pub fn items(&self) -> Vec<Item> {
        self.state().items.clone()
    }

    /// Current stored columns
    pub fn columns(&self) -> Vec<Column> {
        self.state().columns.clone()
    }

    /// Mutate stored rows directly, as another client would
    pub fn update_items(&self, f: impl FnOnce(&mut Vec<Item>)) {
        f(&mut self.state().items);
    }

    async fn record(&self, call: PersistInstruction) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state();
        state.calls.push(call.clone());
        if state.take_failure() {
            return Err(KanbanError::persistence("simulated storage failure"));
        }
        match call {
            PersistInstruction::ContainerOrder { column, items } => {
                for (index, id) in items.iter().enumerate() {
                    if let Some(row) = state.items.iter_mut().find(|row| &row.id == id) {
                        row.column_id = column.clone();
                        row.position = index as i64;
                    }
                }
            }
            PersistInstruction::ColumnOrder { columns } => {
                for entry in &columns {
                    if let Some(row) = state.columns.iter_mut().find(|row| row.id == entry.id) {
                        row.order = entry.order;
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn fetch_projects(&self) -> Result<Vec<Item>> {
        let mut state = self.state();
        state.fetches += 1;
        Ok(state.items.clone())
    }

    async fn fetch_columns(&self) -> Result<Vec<Column>> {
        Ok(self.state().columns.clone())
    }

    async fn set_container_order(&self, column: &ColumnId, items: &[ItemId]) -> Result<()> {
        self.record(PersistInstruction::ContainerOrder {
            column: column.clone(),
            items: items.to_vec(),
        })
        .await
    }

    async fn set_column_order(&self, columns: &[ColumnOrder]) -> Result<()> {
        self.record(PersistInstruction::ColumnOrder {
            columns: columns.to_vec(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> MemoryGateway {
        MemoryGateway::new(
            vec![
                Item::new("A", "x").with_id("a"),
                Item::new("B", "x").with_id("b").with_position(1),
            ],
            Column::defaults(),
        )
    }

    #[tokio::test]
    async fn test_container_order_moves_rows() {
        let gateway = gateway();
        let column = ColumnId::from("done");
        gateway
            .set_container_order(&column, &[ItemId::from("b")])
            .await
            .unwrap();

        let b = gateway
            .items()
            .into_iter()
            .find(|i| i.id.as_str() == "b")
            .unwrap();
        assert_eq!(b.column_id, column);
        assert_eq!(b.position, 0);
        assert_eq!(
            gateway.last_container_order(&column),
            Some(vec![ItemId::from("b")])
        );
    }

    #[tokio::test]
    async fn test_fail_next_then_recover() {
        let gateway = gateway();
        gateway.fail_next(1);
        let column = ColumnId::from("x");

        let first = gateway.set_container_order(&column, &[]).await;
        assert!(matches!(first, Err(KanbanError::Persistence { .. })));
        assert!(gateway.set_container_order(&column, &[]).await.is_ok());
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_column_order_updates_rows() {
        let gateway = gateway();
        gateway
            .set_column_order(&[ColumnOrder {
                id: ColumnId::from("done"),
                order: 0,
            }])
            .await
            .unwrap();
        let done = gateway
            .columns()
            .into_iter()
            .find(|c| c.id.as_str() == "done")
            .unwrap();
        assert_eq!(done.order, 0);
    }
}
