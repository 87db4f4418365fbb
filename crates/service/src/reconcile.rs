use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::store::EntityStore;

/// Background task that periodically replays journaled local-only writes.
/// Each tick is a single reconcile attempt; a still-unreachable remote just
/// means the journal waits for the next tick.
pub fn spawn_reconciler(store: Arc<EntityStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if store.pending_writes().await == 0 {
                continue;
            }
            match store.reconcile().await {
                Ok(0) => {}
                Ok(flushed) => info!(flushed, "reconciled local-only writes"),
                Err(e) => debug!(error = %e, "reconcile attempt failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::PersistenceBridge;
    use crate::routing::IssueRouter;
    use crate::test_support::{MemoryKvStore, MemoryRemote};
    use models::{ApplianceStatus, NewAppliance};

    #[tokio::test]
    async fn reconciler_flushes_once_remote_recovers() -> Result<(), anyhow::Error> {
        let remote = MemoryRemote::shared();
        remote.set_down(true);
        let bridge =
            Arc::new(PersistenceBridge::new(Some(remote.clone()), MemoryKvStore::shared()).await);
        let store = EntityStore::open(bridge, IssueRouter::first_match(), None).await;

        store
            .create_appliance(NewAppliance {
                name: "Lobby Printer".into(),
                kind: "Printer".into(),
                room: "100".into(),
                floor: "1".into(),
                status: ApplianceStatus::Working,
            })
            .await?;
        assert_eq!(store.pending_writes().await, 1);

        let handle = spawn_reconciler(store.clone(), Duration::from_millis(10));
        remote.set_down(false);

        // give the ticker a few rounds to notice
        for _ in 0..50 {
            if store.pending_writes().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(store.pending_writes().await, 0);
        assert_eq!(remote.records(models::EntityKind::Appliance).len(), 1);
        Ok(())
    }
}
