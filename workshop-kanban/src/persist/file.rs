//! JsonFileGateway - file-backed board storage
//!
//! A board is a directory holding two JSON documents:
//!
//! ```text
//! board/
//! ├── columns.json    # Column definitions
//! ├── projects.json   # Every item, in array order
//! └── .lock           # Advisory lock for read-modify-write
//! ```
//!
//! Writes go through a temp file and a rename so readers never see a torn
//! document.

use super::PersistenceGateway;
use crate::error::{KanbanError, Result};
use crate::types::{Column, ColumnId, ColumnOrder, Item, ItemId};
use async_trait::async_trait;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Gateway over one board directory
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    root: PathBuf,
}

impl JsonFileGateway {
    /// Create a gateway for the given board directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn columns_path(&self) -> PathBuf {
        self.root.join("columns.json")
    }

    pub fn projects_path(&self) -> PathBuf {
        self.root.join("projects.json")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    /// Check if the board is initialized
    pub fn is_initialized(&self) -> bool {
        self.columns_path().exists()
    }

    // =========================================================================
    // Board setup
    // =========================================================================

    /// Create a board with the given columns and no items.
    ///
    /// Fails with `AlreadyExists` unless `force` is set.
    pub async fn init(&self, columns: &[Column], force: bool) -> Result<()> {
        if self.is_initialized() && !force {
            return Err(KanbanError::AlreadyExists {
                path: self.root.clone(),
            });
        }
        fs::create_dir_all(&self.root).await?;
        let _lock = self.lock().await?;
        write_json(&self.columns_path(), &columns).await?;
        write_json(&self.projects_path(), &Vec::<Item>::new()).await?;
        info!(path = %self.root.display(), columns = columns.len(), "board initialized");
        Ok(())
    }

    /// Append an item to the end of its column
    pub async fn add_item(&self, mut item: Item) -> Result<Item> {
        let _lock = self.lock().await?;
        let columns: Vec<Column> = self.read(&self.columns_path()).await?;
        if !columns.iter().any(|c| c.id == item.column_id) {
            return Err(KanbanError::ColumnNotFound {
                id: item.column_id.to_string(),
            });
        }

        let mut items: Vec<Item> = self.read(&self.projects_path()).await?;
        if items.iter().any(|i| i.id == item.id) {
            return Err(KanbanError::duplicate_id("item", item.id.as_str()));
        }
        item.position = items
            .iter()
            .filter(|i| i.column_id == item.column_id)
            .map(|i| i.position + 1)
            .max()
            .unwrap_or(0);
        items.push(item.clone());
        write_json(&self.projects_path(), &items).await?;
        debug!(item = %item.id, column = %item.column_id, "item added");
        Ok(item)
    }

    // =========================================================================
    // Locking and I/O
    // =========================================================================

    /// Acquire the board lock (non-blocking)
    pub async fn lock(&self) -> Result<BoardLock> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(BoardLock { file }),
            Err(_) => Err(KanbanError::LockBusy),
        }
    }

    async fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        if !self.is_initialized() {
            return Err(KanbanError::NotInitialized {
                path: self.root.clone(),
            });
        }
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl PersistenceGateway for JsonFileGateway {
    async fn fetch_projects(&self) -> Result<Vec<Item>> {
        self.read(&self.projects_path()).await
    }

    async fn fetch_columns(&self) -> Result<Vec<Column>> {
        self.read(&self.columns_path()).await
    }

    async fn set_container_order(&self, column: &ColumnId, order: &[ItemId]) -> Result<()> {
        let _lock = self.lock().await?;
        let mut items: Vec<Item> = self.read(&self.projects_path()).await?;
        for (index, id) in order.iter().enumerate() {
            let item = items
                .iter_mut()
                .find(|i| &i.id == id)
                .ok_or_else(|| KanbanError::ItemNotFound { id: id.to_string() })?;
            item.column_id = column.clone();
            item.position = index as i64;
        }
        write_json(&self.projects_path(), &items).await?;
        debug!(column = %column, count = order.len(), "container order written");
        Ok(())
    }

    async fn set_column_order(&self, orders: &[ColumnOrder]) -> Result<()> {
        let _lock = self.lock().await?;
        let mut columns: Vec<Column> = self.read(&self.columns_path()).await?;
        for entry in orders {
            let column = columns
                .iter_mut()
                .find(|c| c.id == entry.id)
                .ok_or_else(|| KanbanError::ColumnNotFound {
                    id: entry.id.to_string(),
                })?;
            column.order = entry.order;
        }
        columns.sort_by_key(|c| c.order);
        write_json(&self.columns_path(), &columns).await?;
        debug!(count = orders.len(), "column order written");
        Ok(())
    }
}

/// RAII lock guard - releases on drop
pub struct BoardLock {
    file: std::fs::File,
}

impl Drop for BoardLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Serialize as pretty JSON and write atomically
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    atomic_write(path, content.as_bytes()).await
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}
