//! Container resolution and target index computation, shared by preview and
//! commit.

use crate::store::{ColumnRegistry, ItemStore};
use crate::types::{ColumnId, EntityKind, ItemId, Placement, Target};

/// The container of an id: the column itself when the id names a column,
/// otherwise the column of the item with that id.
pub fn resolve_container(
    items: &ItemStore,
    columns: &ColumnRegistry,
    id: &str,
    kind: EntityKind,
) -> Option<ColumnId> {
    match kind {
        EntityKind::Column => {
            let id = ColumnId::from(id);
            columns.contains(&id).then_some(id)
        }
        EntityKind::Item => items
            .get(&ItemId::from(id))
            .map(|item| item.column_id.clone()),
    }
}

/// Insertion index for a drop onto `target`, given the destination sequence
/// with the dragged item already excluded. Column targets append.
pub fn target_index(sequence: &[ItemId], target: &Target) -> usize {
    let index = match target.kind {
        EntityKind::Column => sequence.len(),
        EntityKind::Item => match sequence.iter().position(|id| id.as_str() == target.id) {
            Some(over) => match target.placement {
                Placement::Before => over,
                Placement::After => over + 1,
            },
            None => sequence.len(),
        },
    };
    index.min(sequence.len())
}

/// Destination index for an array move of the item at `from` within
/// `sequence`, the container's order with the dragged item still in it.
///
/// The item takes the slot of the hovered item. A moving-down item already
/// lands below its target, so the lower half only adds one when moving up.
/// Column targets move to the end.
pub fn move_index(sequence: &[ItemId], from: usize, target: &Target) -> usize {
    let last = sequence.len().saturating_sub(1);
    let to = match target.kind {
        EntityKind::Column => last,
        EntityKind::Item => match sequence.iter().position(|id| id.as_str() == target.id) {
            Some(over) if over < from && target.placement == Placement::After => over + 1,
            Some(over) => over,
            None => last,
        },
    };
    to.min(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, Item};

    fn board() -> (ItemStore, ColumnRegistry) {
        let items = ItemStore::from_items(vec![
            Item::new("A", "x").with_id("a"),
            Item::new("B", "y").with_id("b"),
        ]);
        let columns = ColumnRegistry::new(vec![Column::new("x", "X", 0), Column::new("y", "Y", 1)]);
        (items, columns)
    }

    fn seq(ids: &[&str]) -> Vec<ItemId> {
        ids.iter().map(|id| ItemId::from(*id)).collect()
    }

    #[test]
    fn test_resolve_column_and_item() {
        let (items, columns) = board();
        assert_eq!(
            resolve_container(&items, &columns, "y", EntityKind::Column),
            Some(ColumnId::from("y"))
        );
        assert_eq!(
            resolve_container(&items, &columns, "a", EntityKind::Item),
            Some(ColumnId::from("x"))
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let (items, columns) = board();
        assert_eq!(resolve_container(&items, &columns, "nope", EntityKind::Column), None);
        assert_eq!(resolve_container(&items, &columns, "nope", EntityKind::Item), None);
        // a column id is not an item id
        assert_eq!(resolve_container(&items, &columns, "x", EntityKind::Item), None);
    }

    #[test]
    fn test_target_index_before_and_after() {
        let sequence = seq(&["b", "c"]);
        assert_eq!(target_index(&sequence, &Target::item("c")), 1);
        assert_eq!(target_index(&sequence, &Target::item("c").after()), 2);
        assert_eq!(target_index(&sequence, &Target::item("b")), 0);
    }

    #[test]
    fn test_target_index_column_appends() {
        assert_eq!(target_index(&seq(&["b", "c"]), &Target::column("y")), 2);
        assert_eq!(target_index(&[], &Target::column("y")), 0);
    }

    #[test]
    fn test_target_index_missing_item_appends() {
        assert_eq!(target_index(&seq(&["b"]), &Target::item("ghost")), 1);
    }

    #[test]
    fn test_move_index_downward_takes_target_slot() {
        let sequence = seq(&["a", "b", "c", "d"]);
        assert_eq!(move_index(&sequence, 0, &Target::item("c")), 2);
        assert_eq!(move_index(&sequence, 0, &Target::item("d")), 3);
        assert_eq!(move_index(&sequence, 0, &Target::item("b").after()), 1);
        assert_eq!(move_index(&sequence, 0, &Target::item("d").after()), 3);
    }

    #[test]
    fn test_move_index_upward_respects_placement() {
        let sequence = seq(&["a", "b", "c", "d"]);
        assert_eq!(move_index(&sequence, 3, &Target::item("a")), 0);
        assert_eq!(move_index(&sequence, 3, &Target::item("a").after()), 1);
        assert_eq!(move_index(&sequence, 3, &Target::item("c").after()), 3);
    }

    #[test]
    fn test_move_index_column_moves_to_end() {
        let sequence = seq(&["a", "b", "c"]);
        assert_eq!(move_index(&sequence, 0, &Target::column("x")), 2);
        assert_eq!(move_index(&seq(&["a"]), 0, &Target::column("x")), 0);
    }
}
