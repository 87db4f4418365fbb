use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod json_kv_store;

pub use json_kv_store::JsonKvStore;

/// Durable on-device key-value storage, the fallback half of the bridge.
/// One fixed key per entity collection plus the pending-writes journal.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError>;
}
