//! Single-flight persistence queue.
//!
//! Commits hand their instructions to [`PersistQueue::submit`], which never
//! blocks. One background task applies them in commit order, so two rapid
//! drags can no longer race each other at the backing store. With coalescing
//! on, instructions still waiting when the worker picks up a batch collapse to
//! the newest one per key.
//!
//! Failures are logged and counted. There is no retry and no rollback: the
//! in-memory board keeps its optimistic state until the next reload.

use super::{PersistInstruction, PersistKey, PersistenceGateway};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Running totals of the worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistStats {
    /// Instructions the gateway accepted
    pub applied: usize,
    /// Instructions the gateway rejected
    pub failed: usize,
    /// Instructions dropped because a newer one for the same key was waiting
    pub coalesced: usize,
}

enum Message {
    Apply(PersistInstruction),
    Flush(oneshot::Sender<PersistStats>),
}

/// Handle to the background persistence worker
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<Message>,
    worker: JoinHandle<PersistStats>,
}

impl PersistQueue {
    /// Spawn the worker. Must be called within a Tokio runtime.
    pub fn spawn(gateway: Arc<dyn PersistenceGateway>, coalesce: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(gateway, rx, coalesce));
        Self { tx, worker }
    }

    /// Queue an instruction. Returns false if the worker is gone.
    pub fn submit(&self, instruction: PersistInstruction) -> bool {
        trace!(?instruction, "queued");
        self.tx.send(Message::Apply(instruction)).is_ok()
    }

    /// Wait until everything submitted so far has been applied
    pub async fn flush(&self) -> PersistStats {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Message::Flush(done)).is_err() {
            return PersistStats::default();
        }
        wait.await.unwrap_or_default()
    }

    /// Drain the queue and stop the worker
    pub async fn shutdown(self) -> PersistStats {
        drop(self.tx);
        match self.worker.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("persistence worker ended abnormally: {}", e);
                PersistStats::default()
            }
        }
    }
}

async fn run(
    gateway: Arc<dyn PersistenceGateway>,
    mut rx: mpsc::UnboundedReceiver<Message>,
    coalesce: bool,
) -> PersistStats {
    let mut stats = PersistStats::default();

    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = rx.try_recv() {
            batch.push(next);
        }

        let mut waiters = Vec::new();
        let mut ordered = Vec::new();
        let mut latest: IndexMap<PersistKey, PersistInstruction> = IndexMap::new();
        for message in batch {
            match message {
                Message::Apply(instruction) if coalesce => {
                    if latest.insert(instruction.key(), instruction).is_some() {
                        stats.coalesced += 1;
                    }
                }
                Message::Apply(instruction) => ordered.push(instruction),
                Message::Flush(done) => waiters.push(done),
            }
        }
        if coalesce {
            ordered.extend(latest.into_values());
        }

        for instruction in ordered {
            match instruction.apply(gateway.as_ref()).await {
                Ok(()) => {
                    stats.applied += 1;
                    debug!(key = ?instruction.key(), "persisted");
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(key = ?instruction.key(), "persistence failed, keeping local state: {}", e);
                }
            }
        }

        for done in waiters {
            let _ = done.send(stats);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryGateway;
    use crate::types::{Column, ColumnId, Item, ItemId};
    use std::time::Duration;

    fn order(column: &str, ids: &[&str]) -> PersistInstruction {
        PersistInstruction::ContainerOrder {
            column: ColumnId::from(column),
            items: ids.iter().map(|id| ItemId::from(*id)).collect(),
        }
    }

    fn gateway() -> Arc<MemoryGateway> {
        Arc::new(MemoryGateway::new(
            vec![Item::new("A", "x").with_id("a"), Item::new("B", "x").with_id("b")],
            Column::defaults(),
        ))
    }

    #[tokio::test]
    async fn test_applies_in_submit_order() {
        let gateway = gateway();
        let queue = PersistQueue::spawn(gateway.clone(), false);

        queue.submit(order("x", &["a", "b"]));
        queue.submit(order("x", &["b", "a"]));
        let stats = queue.flush().await;

        assert_eq!(stats.applied, 2);
        assert_eq!(stats.coalesced, 0);
        assert_eq!(gateway.calls(), vec![order("x", &["a", "b"]), order("x", &["b", "a"])]);
    }

    #[tokio::test]
    async fn test_flush_with_nothing_queued() {
        let queue = PersistQueue::spawn(gateway(), true);
        assert_eq!(queue.flush().await, PersistStats::default());
    }

    #[tokio::test]
    async fn test_coalesces_pending_declarations_per_key() {
        let gateway = Arc::new(
            MemoryGateway::new(vec![], Column::defaults()).with_latency(Duration::from_millis(50)),
        );
        let queue = PersistQueue::spawn(gateway.clone(), true);

        // The first instruction occupies the worker; the rest pile up behind it.
        queue.submit(order("x", &["a"]));
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.submit(order("x", &["a", "b"]));
        queue.submit(order("y", &["c"]));
        queue.submit(order("x", &["b", "a"]));
        let stats = queue.flush().await;

        assert_eq!(stats.coalesced, 1);
        assert_eq!(stats.applied, 3);
        assert_eq!(
            gateway.last_container_order(&ColumnId::from("x")),
            Some(vec![ItemId::from("b"), ItemId::from("a")])
        );
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_retried() {
        let gateway = gateway();
        gateway.fail_next(1);
        let queue = PersistQueue::spawn(gateway.clone(), false);

        queue.submit(order("x", &["a"]));
        queue.submit(order("y", &["b"]));
        let stats = queue.flush().await;

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.applied, 1);
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_drains() {
        let gateway = gateway();
        let queue = PersistQueue::spawn(gateway.clone(), true);
        queue.submit(order("x", &["b", "a"]));
        let stats = queue.shutdown().await;
        assert_eq!(stats.applied, 1);
        assert_eq!(gateway.calls().len(), 1);
    }
}
