//! Drag-and-drop reorder engine for the workshop kanban board
//!
//! This crate keeps an in-memory board (projects grouped into columns) consistent
//! with a persisted, per-column ordering while the user drags cards and columns
//! around. Moves are reflected optimistically before the backing store confirms
//! them.
//!
//! ## Overview
//!
//! - **Item Store / Column Registry** - the board's items and columns, in memory
//! - **Drag Session** - what is being dragged and what it hovers
//! - **Reorder Engine** - *preview* on hover, *commit* on drop
//! - **Persistence Gateway** - the backing store, reached through a
//!   single-flight queue that never blocks the next gesture
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workshop_kanban::{BoardConfig, BoardSession, EntityKind, JsonFileGateway, Target};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoardConfig::load()?;
//! let gateway = Arc::new(JsonFileGateway::new(&config.data_dir));
//! let mut session = BoardSession::load(gateway, &config).await?;
//!
//! // Drag a card and drop it below another one
//! session.begin_drag("01J0CARD", EntityKind::Item);
//! session.update_hover(Target::item("01J0OTHER").after());
//! session.commit_at_hover();
//!
//! let stats = session.flush().await;
//! println!("applied {} writes", stats.applied);
//! # Ok(())
//! # }
//! ```
//!
//! Order is declared per container as a full sequence of ids. Numeric
//! positions are a derived cache, renumbered on every commit.

mod config;
pub mod drag;
mod error;
pub mod persist;
pub mod reorder;
mod session;
pub mod store;
pub mod types;

pub use config::{BoardConfig, ENV_PREFIX};
pub use drag::{DragSession, Dragged, Origin};
pub use error::{KanbanError, Result};
pub use persist::{
    JsonFileGateway, MemoryGateway, PersistInstruction, PersistQueue, PersistStats,
    PersistenceGateway,
};
pub use reorder::ReorderEngine;
pub use session::BoardSession;
pub use store::{ColumnRegistry, ItemStore};

// Re-export commonly used types
pub use types::{
    Attachment, Column, ColumnId, ColumnOrder, EntityKind, Item, ItemId, Placement, Rect, Target,
};
