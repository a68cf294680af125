//! In-memory board state: items and columns

mod columns;
mod items;

pub use columns::ColumnRegistry;
pub use items::ItemStore;
