//! Property-based tests for the ordering invariant
//!
//! After any sequence of gestures has been flushed, the order shown for every
//! column must match what the gateway stores for it.

use proptest::prelude::*;
use std::sync::Arc;
use workshop_kanban::{
    BoardSession, Column, ColumnId, EntityKind, Item, MemoryGateway, Target,
};

const COLUMNS: [&str; 3] = ["c0", "c1", "c2"];
const ITEMS: [&str; 6] = ["i0", "i1", "i2", "i3", "i4", "i5"];

#[derive(Debug, Clone)]
enum Release {
    AtHover,
    Onto(usize, bool),
    Outside,
    Cancel,
}

#[derive(Debug, Clone)]
struct Gesture {
    dragged: usize,
    hovers: Vec<(usize, bool)>,
    release: Release,
}

/// Entity index: items first, then columns
fn entity(index: usize) -> (&'static str, EntityKind) {
    if index < ITEMS.len() {
        (ITEMS[index], EntityKind::Item)
    } else {
        (COLUMNS[index - ITEMS.len()], EntityKind::Column)
    }
}

fn target(index: usize, after: bool) -> Target {
    let (id, kind) = entity(index);
    let target = match kind {
        EntityKind::Item => Target::item(id),
        EntityKind::Column => Target::column(id),
    };
    if after {
        target.after()
    } else {
        target
    }
}

fn entity_index() -> impl Strategy<Value = usize> {
    0..ITEMS.len() + COLUMNS.len()
}

fn release() -> impl Strategy<Value = Release> {
    prop_oneof![
        3 => Just(Release::AtHover),
        3 => (entity_index(), any::<bool>()).prop_map(|(i, after)| Release::Onto(i, after)),
        1 => Just(Release::Outside),
        1 => Just(Release::Cancel),
    ]
}

fn gesture() -> impl Strategy<Value = Gesture> {
    (
        entity_index(),
        prop::collection::vec((entity_index(), any::<bool>()), 0..4),
        release(),
    )
        .prop_map(|(dragged, hovers, release)| Gesture {
            dragged,
            hovers,
            release,
        })
}

fn gateway() -> Arc<MemoryGateway> {
    let columns = COLUMNS
        .iter()
        .enumerate()
        .map(|(order, id)| Column::new(*id, id.to_uppercase(), order))
        .collect();
    let items = ITEMS
        .iter()
        .enumerate()
        .map(|(n, id)| {
            Item::new(format!("Project {id}"), COLUMNS[n % COLUMNS.len()])
                .with_id(*id)
                .with_position((n / COLUMNS.len()) as i64)
        })
        .collect();
    Arc::new(MemoryGateway::new(items, columns))
}

fn session_order(session: &BoardSession, column: &str) -> Vec<String> {
    session
        .container_items(&ColumnId::from(column))
        .iter()
        .map(|item| item.id.to_string())
        .collect()
}

fn stored_order(gateway: &MemoryGateway, column: &str) -> Vec<String> {
    let mut rows: Vec<Item> = gateway
        .items()
        .into_iter()
        .filter(|item| item.column_id.as_str() == column)
        .collect();
    rows.sort_by_key(|item| item.position);
    rows.iter().map(|item| item.id.to_string()).collect()
}

fn play(session: &mut BoardSession, gesture: &Gesture) {
    let (id, kind) = entity(gesture.dragged);
    session.begin_drag(id, kind);
    for (over, after) in &gesture.hovers {
        session.update_hover(target(*over, *after));
    }
    match gesture.release {
        Release::AtHover => {
            session.commit_at_hover();
        }
        Release::Onto(over, after) => {
            session.commit_drag(Some(target(over, after)));
        }
        Release::Outside => {
            session.commit_drag(None);
        }
        Release::Cancel => session.cancel_drag(),
    }
}

proptest! {
    /// Property: once the queue is flushed, local and stored order agree for
    /// every column, and no item is lost or duplicated.
    #[test]
    fn test_flushed_order_matches_gateway(
        gestures in prop::collection::vec(gesture(), 1..12),
        coalesce in any::<bool>(),
    ) {
        let result: Result<(), TestCaseError> = tokio_test::block_on(async {
            let gateway = gateway();
            let mut session = BoardSession::from_parts(
                gateway.items(),
                gateway.columns(),
                gateway.clone(),
                coalesce,
            );

            for gesture in &gestures {
                play(&mut session, gesture);
            }
            let stats = session.flush().await;
            prop_assert_eq!(stats.failed, 0);
            prop_assert!(session.dragged().is_none());
            prop_assert_eq!(session.item_store().len(), ITEMS.len());

            for column in COLUMNS {
                let local = session_order(&session, column);
                if let Some(declared) = gateway.last_container_order(&ColumnId::from(column)) {
                    let declared: Vec<String> = declared.iter().map(|id| id.to_string()).collect();
                    prop_assert_eq!(&local, &declared);
                }
                prop_assert_eq!(&local, &stored_order(&gateway, column));
            }

            let local_columns: Vec<String> =
                session.columns().iter().map(|c| c.id.to_string()).collect();
            let mut stored_columns = gateway.columns();
            stored_columns.sort_by_key(|c| c.order);
            let stored_columns: Vec<String> =
                stored_columns.iter().map(|c| c.id.to_string()).collect();
            prop_assert_eq!(local_columns, stored_columns);

            Ok(())
        });
        result?;
    }
}
