use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;
use crate::storage::LocalStore;

/// JSON file-backed key-value store.
///
/// Persists a `HashMap<String, String>` to a single JSON file and serves the
/// durable-local half of the persistence bridge. Collection snapshots and the
/// pending-writes journal live here, each under its fixed key.
#[derive(Clone)]
pub struct JsonKvStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    file_path: PathBuf,
}

impl JsonKvStore {
    /// Initialize the store from a path. Creates the file with an empty map
    /// if missing; unreadable content is absorbed and treated as empty.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<String, String> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<String, String> = HashMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl LocalStore for JsonKvStore {
    async fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), value);
        drop(map);
        self.save().await
    }
}
