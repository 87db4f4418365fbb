//! In-memory doubles for the storage and remote seams, shared by the unit
//! tests across this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::notify::Notifier;
use crate::remote::RemoteStore;
use crate::storage::LocalStore;
use models::EntityKind;

/// `LocalStore` held entirely in memory, standing in for the JSON file.
#[derive(Default)]
pub struct MemoryKvStore {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl LocalStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.map.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.map.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// `RemoteStore` backed by in-memory collections, with a switch to simulate
/// the API being unreachable. Create assigns `r{n}` ids and stamps both
/// timestamps, mirroring what the real server does. Locks are std mutexes
/// never held across an await.
pub struct MemoryRemote {
    down: AtomicBool,
    collections: Mutex<HashMap<EntityKind, Vec<Value>>>,
    next_id: AtomicU64,
    notified: Mutex<Vec<String>>,
}

impl MemoryRemote {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self {
            down: AtomicBool::new(false),
            collections: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            notified: Mutex::new(Vec::new()),
        })
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn records(&self, kind: EntityKind) -> Vec<Value> {
        self.lock_collections().get(&kind).cloned().unwrap_or_default()
    }

    pub fn notified(&self) -> Vec<String> {
        self.notified.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_collections(&self) -> std::sync::MutexGuard<'_, HashMap<EntityKind, Vec<Value>>> {
        self.collections.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_up(&self) -> Result<(), ServiceError> {
        if self.down.load(Ordering::SeqCst) {
            Err(ServiceError::Remote("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>, ServiceError> {
        self.check_up()?;
        Ok(self.lock_collections().get(&kind).cloned().unwrap_or_default())
    }

    async fn create(&self, kind: EntityKind, fields: Value) -> Result<Value, ServiceError> {
        self.check_up()?;
        let mut record = fields;
        let Some(map) = record.as_object_mut() else {
            return Err(ServiceError::Remote("create body must be an object".into()));
        };
        let id = format!("r{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        map.insert("id".into(), json!(id));
        map.insert("createdAt".into(), json!(now));
        map.insert("updatedAt".into(), json!(now));
        self.lock_collections().entry(kind).or_default().push(record.clone());
        Ok(record)
    }

    async fn update(&self, kind: EntityKind, id: &str, fields: Value) -> Result<(), ServiceError> {
        self.check_up()?;
        let mut collections = self.lock_collections();
        let records = collections.entry(kind).or_default();
        let Some(record) = records.iter_mut().find(|r| r["id"] == id) else {
            return Err(ServiceError::Remote(format!("status 404 Not Found: no {kind} {id}")));
        };
        if let (Some(target), Some(patch)) = (record.as_object_mut(), fields.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ServiceError> {
        self.check_up()?;
        let mut collections = self.lock_collections();
        let records = collections.entry(kind).or_default();
        let before = records.len();
        records.retain(|r| r["id"] != id);
        if records.len() == before {
            return Err(ServiceError::Remote(format!("status 404 Not Found: no {kind} {id}")));
        }
        Ok(())
    }

    async fn notify(&self, issue_id: &str) -> Result<(), ServiceError> {
        self.check_up()?;
        self.notified.lock().unwrap_or_else(|e| e.into_inner()).push(issue_id.to_string());
        Ok(())
    }
}

/// Notifier that only counts invocations.
#[derive(Default)]
pub struct CountingNotifier {
    count: AtomicUsize,
}

impl CountingNotifier {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, _issue_id: &str) -> Result<(), ServiceError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
