use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ModelError;
use crate::kind::EntityKind;

/// A persisted portal entity.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Fixed starter data materialized when neither backend has a collection.
    fn seed() -> Vec<Self>;
}

/// Creation input for a record: every field except id and timestamps.
///
/// The bridge serializes the draft verbatim for the remote create call; on
/// the local fallback path it assigns id and timestamps itself via
/// `into_record`.
pub trait Draft: Serialize + Clone + Send + Sync + 'static {
    type Record: Record;

    fn validate(&self) -> Result<(), ModelError>;

    fn into_record(self, id: String, now: DateTime<Utc>) -> Self::Record;
}
