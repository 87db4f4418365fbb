use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use models::EntityKind;

pub mod http;

pub use http::HttpRemoteStore;

/// The network-backed persistence surface, one CRUD set per entity kind plus
/// the issue notification hook. Every exchange is JSON-shaped; any non-success
/// response is an error the bridge will absorb.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>, ServiceError>;

    async fn create(&self, kind: EntityKind, fields: Value) -> Result<Value, ServiceError>;

    async fn update(&self, kind: EntityKind, id: &str, fields: Value) -> Result<(), ServiceError>;

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ServiceError>;

    async fn notify(&self, issue_id: &str) -> Result<(), ServiceError>;
}
