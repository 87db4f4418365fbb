//! Session data layer for the facilities portal.
//! - `EntityStore` is the in-memory source of truth per entity kind.
//! - `PersistenceBridge` lands every write remotely when it can and on the
//!   durable local store when it cannot, keeping a journal of local-only
//!   writes so they can be reconciled later.
//! - Trait seams (`RemoteStore`, `LocalStore`, `Notifier`) keep transport
//!   and storage swappable; production impls use reqwest and a JSON file.

pub mod bridge;
pub mod errors;
pub mod notify;
pub mod reconcile;
pub mod remote;
pub mod routing;
pub mod storage;
pub mod store;

#[cfg(test)]
pub mod test_support;

pub use bridge::{PersistenceBridge, Persisted, WriteOutcome};
pub use errors::ServiceError;
pub use notify::{Notifier, RemoteNotifier};
pub use reconcile::spawn_reconciler;
pub use remote::{HttpRemoteStore, RemoteStore};
pub use routing::{IssueRouter, RoutingPolicy};
pub use storage::{JsonKvStore, LocalStore};
pub use store::EntityStore;
