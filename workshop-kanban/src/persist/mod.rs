//! Persistence Gateway
//!
//! The engine never talks to storage directly. Commits produce
//! [`PersistInstruction`]s, full last-writer-wins declarations of an order,
//! which a [`PersistQueue`] applies through a [`PersistenceGateway`].

mod file;
mod memory;
mod queue;

pub use file::{BoardLock, JsonFileGateway};
pub use memory::MemoryGateway;
pub use queue::{PersistQueue, PersistStats};

use crate::error::Result;
use crate::types::{Column, ColumnId, ColumnOrder, Item, ItemId};
use async_trait::async_trait;
use serde::Serialize;

/// Backing store for a board
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Initial load of every project
    async fn fetch_projects(&self) -> Result<Vec<Item>>;

    /// Every column definition
    async fn fetch_columns(&self) -> Result<Vec<Column>>;

    /// Declare the authoritative order of one container
    async fn set_container_order(&self, column: &ColumnId, items: &[ItemId]) -> Result<()>;

    /// Declare the authoritative order of all columns
    async fn set_column_order(&self, columns: &[ColumnOrder]) -> Result<()>;
}

/// One order declaration emitted by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersistInstruction {
    ContainerOrder { column: ColumnId, items: Vec<ItemId> },
    ColumnOrder { columns: Vec<ColumnOrder> },
}

/// What an instruction overwrites; two instructions with the same key
/// supersede each other
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PersistKey {
    Container(ColumnId),
    Columns,
}

impl PersistInstruction {
    pub fn key(&self) -> PersistKey {
        match self {
            Self::ContainerOrder { column, .. } => PersistKey::Container(column.clone()),
            Self::ColumnOrder { .. } => PersistKey::Columns,
        }
    }

    /// Send this declaration through a gateway
    pub async fn apply(&self, gateway: &dyn PersistenceGateway) -> Result<()> {
        match self {
            Self::ContainerOrder { column, items } => {
                gateway.set_container_order(column, items).await
            }
            Self::ColumnOrder { columns } => gateway.set_column_order(columns).await,
        }
    }
}
