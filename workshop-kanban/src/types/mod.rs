//! Core types for the workshop board

mod board;
mod ids;
mod target;

// Re-export all types
pub use board::{Attachment, Column, ColumnOrder, Item};
pub use ids::{ColumnId, ItemId};
pub use target::{EntityKind, Placement, Rect, Target};
