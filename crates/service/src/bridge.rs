use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::remote::RemoteStore;
use crate::storage::LocalStore;
use models::{Draft, EntityKind, Record};

/// Durable-storage key for the journal of writes that only landed locally.
const PENDING_KEY: &str = "pendingWrites";

/// Where a write actually landed. Surfaced to callers so the UI can mark
/// records that have not reached the server yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Persisted {
    Remote,
    LocalOnly,
}

#[derive(Clone, Debug)]
pub struct WriteOutcome<T> {
    pub record: T,
    pub persisted: Persisted,
}

/// A write that fell back to local storage, queued for replay once the
/// remote API is reachable again.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PendingWrite {
    Create { kind: EntityKind, record: Value },
    Update { kind: EntityKind, id: String, fields: Value },
    Delete { kind: EntityKind, id: String },
}

/// Decides where each read and write lands: the remote API when reachable,
/// the durable local store otherwise. Remote failure is absorbed, never
/// surfaced to the mutation caller; the outcome marker and the pending
/// journal make the divergence visible instead of silent.
pub struct PersistenceBridge {
    remote: Option<Arc<dyn RemoteStore>>,
    local: Arc<dyn LocalStore>,
    /// Last locally-assigned id, bumped monotonically so rapid creates in
    /// the same millisecond still get distinct ids within the session.
    id_clock: Mutex<i64>,
    pending: Mutex<Vec<PendingWrite>>,
}

impl PersistenceBridge {
    /// Build a bridge. `remote: None` runs local-only, the sole-path mode
    /// the backend server itself uses.
    pub async fn new(remote: Option<Arc<dyn RemoteStore>>, local: Arc<dyn LocalStore>) -> Self {
        let pending = match local.get(PENDING_KEY).await {
            Some(raw) => serde_json::from_str::<Vec<PendingWrite>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "corrupt pending-writes journal; starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self {
            remote,
            local,
            id_clock: Mutex::new(0),
            pending: Mutex::new(pending),
        }
    }

    /// Load a collection: remote list first, then the local snapshot, then
    /// the fixed seed set (which is persisted so the next cold start finds
    /// the identical data). Never fails; the worst case is an empty seed.
    pub async fn load<T: Record>(&self) -> Vec<T> {
        if let Some(remote) = &self.remote {
            match remote.list(T::KIND).await {
                Ok(values) => {
                    let parsed: Result<Vec<T>, _> =
                        values.into_iter().map(serde_json::from_value).collect();
                    match parsed {
                        Ok(records) => return records,
                        Err(e) => {
                            warn!(kind = %T::KIND, error = %e, "malformed remote list; falling back to local")
                        }
                    }
                }
                Err(e) => {
                    debug!(kind = %T::KIND, error = %e, "remote list failed; falling back to local")
                }
            }
        }

        if let Some(raw) = self.local.get(T::KIND.collection_key()).await {
            match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(records) => return records,
                Err(e) => warn!(kind = %T::KIND, error = %e, "corrupt local snapshot; reseeding"),
            }
        }

        let seed = T::seed();
        if let Err(e) = self.persist_collection(&seed).await {
            warn!(kind = %T::KIND, error = %e, "failed to persist seed collection");
        }
        seed
    }

    /// Create a record. On the remote path the server-assigned id and
    /// timestamps win verbatim; on the local path the bridge synthesizes
    /// both and persists the full updated collection snapshot.
    pub async fn create<D: Draft>(
        &self,
        draft: D,
        current: &[D::Record],
    ) -> Result<WriteOutcome<D::Record>, ServiceError> {
        let fields =
            serde_json::to_value(&draft).map_err(|e| ServiceError::Storage(e.to_string()))?;

        if let Some(remote) = &self.remote {
            match remote.create(D::Record::KIND, fields).await {
                Ok(value) => match serde_json::from_value::<D::Record>(value) {
                    Ok(record) => {
                        return Ok(WriteOutcome { record, persisted: Persisted::Remote })
                    }
                    Err(e) => {
                        warn!(kind = %D::Record::KIND, error = %e, "malformed remote create response; falling back to local")
                    }
                },
                Err(e) => {
                    debug!(kind = %D::Record::KIND, error = %e, "remote create failed; falling back to local")
                }
            }
        }

        let record = draft.into_record(self.next_id().await, Utc::now());
        let mut snapshot = current.to_vec();
        snapshot.push(record.clone());
        self.persist_with_journal(
            &snapshot,
            PendingWrite::Create {
                kind: D::Record::KIND,
                record: serde_json::to_value(&record)
                    .map_err(|e| ServiceError::Storage(e.to_string()))?,
            },
        )
        .await;
        Ok(WriteOutcome { record, persisted: Persisted::LocalOnly })
    }

    /// Persist an update. `merged` is the collection with the patch already
    /// applied; it becomes the local snapshot on the fallback path.
    pub async fn update<T: Record>(
        &self,
        id: &str,
        fields: Value,
        merged: &[T],
    ) -> Result<Persisted, ServiceError> {
        if let Some(remote) = &self.remote {
            match remote.update(T::KIND, id, fields.clone()).await {
                Ok(()) => return Ok(Persisted::Remote),
                Err(e) => {
                    debug!(kind = %T::KIND, id, error = %e, "remote update failed; falling back to local")
                }
            }
        }

        self.persist_with_journal(
            merged,
            PendingWrite::Update { kind: T::KIND, id: id.to_string(), fields },
        )
        .await;
        Ok(Persisted::LocalOnly)
    }

    /// Persist a delete. `remaining` is the collection without the record.
    pub async fn delete<T: Record>(
        &self,
        id: &str,
        remaining: &[T],
    ) -> Result<Persisted, ServiceError> {
        if let Some(remote) = &self.remote {
            match remote.delete(T::KIND, id).await {
                Ok(()) => return Ok(Persisted::Remote),
                Err(e) => {
                    debug!(kind = %T::KIND, id, error = %e, "remote delete failed; falling back to local")
                }
            }
        }

        self.persist_with_journal(
            remaining,
            PendingWrite::Delete { kind: T::KIND, id: id.to_string() },
        )
        .await;
        Ok(Persisted::LocalOnly)
    }

    /// Replay journaled local-only writes against the remote API, oldest
    /// first, stopping at the first failure. Returns how many were flushed.
    pub async fn reconcile(&self) -> Result<usize, ServiceError> {
        let Some(remote) = &self.remote else { return Ok(0) };

        let mut journal = self.pending.lock().await;
        let mut flushed = 0usize;
        while let Some(entry) = journal.first().cloned() {
            let attempt = match &entry {
                PendingWrite::Create { kind, record } => {
                    remote.create(*kind, record.clone()).await.map(|_| ())
                }
                PendingWrite::Update { kind, id, fields } => {
                    remote.update(*kind, id, fields.clone()).await
                }
                PendingWrite::Delete { kind, id } => remote.delete(*kind, id).await,
            };
            match attempt {
                Ok(()) => {
                    journal.remove(0);
                    flushed += 1;
                }
                Err(e) => {
                    debug!(error = %e, remaining = journal.len(), "reconcile halted; remote still failing");
                    break;
                }
            }
        }

        if flushed > 0 {
            self.persist_pending(&journal).await;
        }
        Ok(flushed)
    }

    /// Number of writes still waiting for the remote API.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn persist_collection<T: Record>(&self, records: &[T]) -> Result<(), ServiceError> {
        let raw =
            serde_json::to_string(records).map_err(|e| ServiceError::Storage(e.to_string()))?;
        self.local.set(T::KIND.collection_key(), raw).await
    }

    /// Local-fallback bookkeeping: snapshot the collection and journal the
    /// write. Storage failures are absorbed; the in-memory state stays the
    /// session's source of truth either way.
    async fn persist_with_journal<T: Record>(&self, snapshot: &[T], entry: PendingWrite) {
        if let Err(e) = self.persist_collection(snapshot).await {
            warn!(kind = %T::KIND, error = %e, "failed to persist local snapshot");
        }
        let mut journal = self.pending.lock().await;
        journal.push(entry);
        self.persist_pending(&journal).await;
    }

    async fn persist_pending(&self, journal: &[PendingWrite]) {
        match serde_json::to_string(journal) {
            Ok(raw) => {
                if let Err(e) = self.local.set(PENDING_KEY, raw).await {
                    warn!(error = %e, "failed to persist pending-writes journal");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize pending-writes journal"),
        }
    }

    /// Time-based id, unique within the session via a monotonic bump. Not
    /// globally unique; server-assigned ids win whenever remote is up.
    async fn next_id(&self) -> String {
        let mut last = self.id_clock.lock().await;
        let next = Utc::now().timestamp_millis().max(*last + 1);
        *last = next;
        next.to_string()
    }
}
