use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::bridge::{PersistenceBridge, Persisted, WriteOutcome};
use crate::errors::ServiceError;
use crate::notify::Notifier;
use crate::routing::IssueRouter;
use models::{
    Appliance, ApplianceSnapshot, ApplianceUpdate, Draft, Issue, IssueReport, IssueStatus,
    IssueUpdate, NewAppliance, NewIssue, NewServiceProvider, Record, ServiceProvider,
    ServiceProviderUpdate,
};

/// The session's source of truth for the three entity collections.
///
/// Collections live in memory behind read-write locks; every mutation is
/// validated, pushed through the persistence bridge, then applied in memory.
/// Reads never touch storage.
pub struct EntityStore {
    bridge: Arc<PersistenceBridge>,
    router: IssueRouter,
    notifier: Option<Arc<dyn Notifier>>,
    providers: RwLock<Vec<ServiceProvider>>,
    appliances: RwLock<Vec<Appliance>>,
    issues: RwLock<Vec<Issue>>,
}

impl EntityStore {
    /// Open a session: load all three collections through the bridge.
    pub async fn open(
        bridge: Arc<PersistenceBridge>,
        router: IssueRouter,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Arc<Self> {
        let providers = bridge.load::<ServiceProvider>().await;
        let appliances = bridge.load::<Appliance>().await;
        let issues = bridge.load::<Issue>().await;
        info!(
            providers = providers.len(),
            appliances = appliances.len(),
            issues = issues.len(),
            "entity store loaded"
        );
        Arc::new(Self {
            bridge,
            router,
            notifier,
            providers: RwLock::new(providers),
            appliances: RwLock::new(appliances),
            issues: RwLock::new(issues),
        })
    }

    pub async fn service_providers(&self) -> Vec<ServiceProvider> {
        self.providers.read().await.clone()
    }

    pub async fn appliances(&self) -> Vec<Appliance> {
        self.appliances.read().await.clone()
    }

    pub async fn issues(&self) -> Vec<Issue> {
        self.issues.read().await.clone()
    }

    pub async fn find_service_provider(&self, id: &str) -> Option<ServiceProvider> {
        self.providers.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn find_appliance(&self, id: &str) -> Option<Appliance> {
        self.appliances.read().await.iter().find(|a| a.id == id).cloned()
    }

    pub async fn find_issue(&self, id: &str) -> Option<Issue> {
        self.issues.read().await.iter().find(|i| i.id == id).cloned()
    }

    pub async fn create_service_provider(
        &self,
        draft: NewServiceProvider,
    ) -> Result<WriteOutcome<ServiceProvider>, ServiceError> {
        let outcome = self.create_in(&self.providers, draft).await?;
        info!(id = %outcome.record.id, persisted = ?outcome.persisted, "created service provider");
        Ok(outcome)
    }

    pub async fn update_service_provider(
        &self,
        id: &str,
        patch: ServiceProviderUpdate,
    ) -> Result<WriteOutcome<ServiceProvider>, ServiceError> {
        let fields = to_fields(&patch)?;
        self.update_in(&self.providers, id, fields, |record: &mut ServiceProvider| {
            patch.apply(record)
        })
        .await
    }

    pub async fn delete_service_provider(&self, id: &str) -> Result<Persisted, ServiceError> {
        self.delete_in(&self.providers, id).await
    }

    pub async fn create_appliance(
        &self,
        draft: NewAppliance,
    ) -> Result<WriteOutcome<Appliance>, ServiceError> {
        let outcome = self.create_in(&self.appliances, draft).await?;
        info!(id = %outcome.record.id, persisted = ?outcome.persisted, "created appliance");
        Ok(outcome)
    }

    pub async fn update_appliance(
        &self,
        id: &str,
        patch: ApplianceUpdate,
    ) -> Result<WriteOutcome<Appliance>, ServiceError> {
        let fields = to_fields(&patch)?;
        self.update_in(&self.appliances, id, fields, |record: &mut Appliance| {
            patch.apply(record)
        })
        .await
    }

    pub async fn delete_appliance(&self, id: &str) -> Result<Persisted, ServiceError> {
        self.delete_in(&self.appliances, id).await
    }

    /// Plain issue creation with a caller-supplied snapshot. No routing and
    /// no notification; see [`EntityStore::report_issue`] for the full flow.
    pub async fn create_issue(&self, draft: NewIssue) -> Result<WriteOutcome<Issue>, ServiceError> {
        let outcome = self.create_in(&self.issues, draft).await?;
        info!(id = %outcome.record.id, persisted = ?outcome.persisted, "created issue");
        Ok(outcome)
    }

    /// Report an issue against an appliance: resolve the appliance snapshot,
    /// route to a provider, create the record, then fire the notification
    /// hook exactly once when a provider matched. Notification failure is
    /// logged and absorbed; the issue is already created.
    pub async fn report_issue(
        &self,
        report: IssueReport,
    ) -> Result<WriteOutcome<Issue>, ServiceError> {
        let appliance = self.find_appliance(&report.appliance_id).await.ok_or_else(|| {
            ServiceError::Validation(format!("unknown appliance '{}'", report.appliance_id))
        })?;
        let provider = self.match_provider(&appliance.kind).await;

        let draft = NewIssue {
            appliance: ApplianceSnapshot::of(&appliance),
            description: report.description,
            status: IssueStatus::Reported,
            priority: report.priority,
            reported_by: report.reported_by,
            service_provider: provider.as_ref().map(|p| p.name.clone()),
        };
        let outcome = self.create_issue(draft).await?;

        if let (Some(provider), Some(notifier)) = (provider, &self.notifier) {
            if let Err(e) = notifier.notify(&outcome.record.id).await {
                warn!(issue_id = %outcome.record.id, provider = %provider.name, error = %e, "issue notification failed");
            }
        }
        Ok(outcome)
    }

    /// Update an issue; `updated_at` is stamped here and is strictly greater
    /// than its previous value even within one clock millisecond.
    pub async fn update_issue(
        &self,
        id: &str,
        patch: IssueUpdate,
    ) -> Result<WriteOutcome<Issue>, ServiceError> {
        let fields = to_fields(&patch)?;
        self.update_in(&self.issues, id, fields, |record: &mut Issue| {
            patch.apply(record);
            let now = Utc::now();
            record.updated_at = if now > record.updated_at {
                now
            } else {
                record.updated_at + Duration::milliseconds(1)
            };
        })
        .await
    }

    pub async fn delete_issue(&self, id: &str) -> Result<Persisted, ServiceError> {
        self.delete_in(&self.issues, id).await
    }

    /// Provider for an appliance type under the configured routing policy.
    pub async fn match_provider(&self, appliance_type: &str) -> Option<ServiceProvider> {
        let providers = self.providers.read().await;
        self.router.select(&providers, appliance_type).cloned()
    }

    /// Replay journaled local-only writes; returns how many were flushed.
    pub async fn reconcile(&self) -> Result<usize, ServiceError> {
        self.bridge.reconcile().await
    }

    pub async fn pending_writes(&self) -> usize {
        self.bridge.pending_len().await
    }

    async fn create_in<D: Draft>(
        &self,
        collection: &RwLock<Vec<D::Record>>,
        draft: D,
    ) -> Result<WriteOutcome<D::Record>, ServiceError> {
        draft.validate()?;
        let current = collection.read().await.clone();
        let outcome = self.bridge.create(draft, &current).await?;
        collection.write().await.push(outcome.record.clone());
        Ok(outcome)
    }

    async fn update_in<T: Record>(
        &self,
        collection: &RwLock<Vec<T>>,
        id: &str,
        fields: Value,
        apply: impl FnOnce(&mut T),
    ) -> Result<WriteOutcome<T>, ServiceError> {
        let mut merged = collection.read().await.clone();
        let Some(record) = merged.iter_mut().find(|r| r.id() == id) else {
            return Err(ServiceError::not_found(T::KIND, id));
        };
        apply(record);
        let updated = record.clone();
        let persisted = self.bridge.update(id, fields, &merged).await?;
        *collection.write().await = merged;
        Ok(WriteOutcome { record: updated, persisted })
    }

    async fn delete_in<T: Record>(
        &self,
        collection: &RwLock<Vec<T>>,
        id: &str,
    ) -> Result<Persisted, ServiceError> {
        let current = collection.read().await.clone();
        let before = current.len();
        let remaining: Vec<T> = current.into_iter().filter(|r| r.id() != id).collect();
        if remaining.len() == before {
            return Err(ServiceError::not_found(T::KIND, id));
        }
        let persisted = self.bridge.delete::<T>(id, &remaining).await?;
        *collection.write().await = remaining;
        info!(kind = %T::KIND, id, persisted = ?persisted, "deleted record");
        Ok(persisted)
    }
}

fn to_fields<P: serde::Serialize>(patch: &P) -> Result<Value, ServiceError> {
    serde_json::to_value(patch).map_err(|e| ServiceError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingPolicy;
    use crate::test_support::{CountingNotifier, MemoryKvStore, MemoryRemote};
    use models::{ApplianceStatus, IssuePriority, IssueStatus};

    async fn local_only_store(
        local: Arc<MemoryKvStore>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Arc<EntityStore> {
        let bridge = Arc::new(PersistenceBridge::new(None, local).await);
        EntityStore::open(bridge, IssueRouter::first_match(), notifier).await
    }

    fn report(appliance_id: &str) -> IssueReport {
        IssueReport {
            appliance_id: appliance_id.into(),
            description: "Not working".into(),
            priority: IssuePriority::Medium,
            reported_by: "Jane Smith".into(),
        }
    }

    #[tokio::test]
    async fn cold_start_seeds_all_collections() -> Result<(), anyhow::Error> {
        let store = local_only_store(MemoryKvStore::shared(), None).await;
        assert_eq!(store.service_providers().await.len(), 2);
        assert_eq!(store.appliances().await.len(), 3);
        assert_eq!(store.issues().await.len(), 1);

        let issue = &store.issues().await[0];
        assert_eq!(issue.appliance.appliance_name, "Break Room Microwave");
        assert_eq!(issue.service_provider.as_deref(), Some("ElectroRepair Pro"));
        Ok(())
    }

    #[tokio::test]
    async fn session_data_survives_restart() -> Result<(), anyhow::Error> {
        let local = MemoryKvStore::shared();
        let store = local_only_store(local.clone(), None).await;
        let outcome = store
            .create_appliance(NewAppliance {
                name: "Lobby Printer".into(),
                kind: "Printer".into(),
                room: "100".into(),
                floor: "1".into(),
                status: ApplianceStatus::Working,
            })
            .await?;
        assert_eq!(outcome.persisted, Persisted::LocalOnly);

        let reopened = local_only_store(local, None).await;
        assert_eq!(reopened.appliances().await.len(), 4);
        assert!(reopened.find_appliance(&outcome.record.id).await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn validation_rejected_before_persistence() -> Result<(), anyhow::Error> {
        let local = MemoryKvStore::shared();
        let store = local_only_store(local.clone(), None).await;
        let result = store
            .create_service_provider(NewServiceProvider {
                name: "".into(),
                email: "ops@fixit.example".into(),
                phone: "".into(),
                address: "".into(),
                appliance_types: vec![],
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Model(_))));
        assert_eq!(store.service_providers().await.len(), 2);
        assert_eq!(store.pending_writes().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_and_unknown_id_is_not_found() -> Result<(), anyhow::Error> {
        let store = local_only_store(MemoryKvStore::shared(), None).await;

        let patch = ApplianceUpdate {
            status: Some(ApplianceStatus::Maintenance),
            ..Default::default()
        };
        let outcome = store.update_appliance("2", patch.clone()).await?;
        assert_eq!(outcome.record.status, ApplianceStatus::Maintenance);
        assert_eq!(outcome.record.name, "Break Room Microwave");

        let missing = store.update_appliance("999", patch).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn delete_then_update_is_not_found() -> Result<(), anyhow::Error> {
        let store = local_only_store(MemoryKvStore::shared(), None).await;
        store.delete_appliance("3").await?;
        assert_eq!(store.appliances().await.len(), 2);

        let result = store
            .update_appliance("3", ApplianceUpdate { room: Some("300".into()), ..Default::default() })
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));

        let again = store.delete_appliance("3").await;
        assert!(matches!(again, Err(ServiceError::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn issue_updated_at_strictly_increases() -> Result<(), anyhow::Error> {
        let store = local_only_store(MemoryKvStore::shared(), None).await;
        let first = store
            .update_issue("1", IssueUpdate { status: Some(IssueStatus::InProgress), ..Default::default() })
            .await?;
        let second = store
            .update_issue("1", IssueUpdate { status: Some(IssueStatus::Resolved), ..Default::default() })
            .await?;
        assert!(second.record.updated_at > first.record.updated_at);
        assert_eq!(second.record.created_at, first.record.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn report_routes_and_notifies_exactly_once() -> Result<(), anyhow::Error> {
        let notifier = CountingNotifier::shared();
        let store =
            local_only_store(MemoryKvStore::shared(), Some(notifier.clone())).await;

        // seed appliance "2" is a Microwave, serviced by ElectroRepair Pro
        let outcome = store.report_issue(report("2")).await?;
        assert_eq!(outcome.record.service_provider.as_deref(), Some("ElectroRepair Pro"));
        assert_eq!(outcome.record.status, IssueStatus::Reported);
        assert_eq!(outcome.record.appliance.room, "105");
        assert_eq!(notifier.count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn report_without_matching_provider_skips_notification() -> Result<(), anyhow::Error> {
        let notifier = CountingNotifier::shared();
        let store =
            local_only_store(MemoryKvStore::shared(), Some(notifier.clone())).await;

        let toaster = store
            .create_appliance(NewAppliance {
                name: "Break Room Toaster".into(),
                kind: "Toaster".into(),
                room: "105".into(),
                floor: "1".into(),
                status: ApplianceStatus::Working,
            })
            .await?;

        let outcome = store.report_issue(report(&toaster.record.id)).await?;
        assert!(outcome.record.service_provider.is_none());
        assert_eq!(notifier.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn report_for_unknown_appliance_is_rejected() -> Result<(), anyhow::Error> {
        let store = local_only_store(MemoryKvStore::shared(), None).await;
        let result = store.report_issue(report("999")).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(store.issues().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn round_robin_alternates_between_matching_providers() -> Result<(), anyhow::Error> {
        let bridge = Arc::new(PersistenceBridge::new(None, MemoryKvStore::shared()).await);
        let store = EntityStore::open(
            bridge,
            IssueRouter::new(RoutingPolicy::RoundRobin),
            None,
        )
        .await;

        // second provider also servicing computers, alongside seed TechFix
        store
            .create_service_provider(NewServiceProvider {
                name: "ByteWorks".into(),
                email: "help@byteworks.example".into(),
                phone: "+1 (555) 444-5555".into(),
                address: "9 Circuit Ave".into(),
                appliance_types: vec!["Computer".into()],
            })
            .await?;

        // seed appliance "1" is a Computer
        let first = store.report_issue(report("1")).await?;
        let second = store.report_issue(report("1")).await?;
        assert_ne!(first.record.service_provider, second.record.service_provider);
        Ok(())
    }

    #[tokio::test]
    async fn remote_recovery_reconciles_offline_writes() -> Result<(), anyhow::Error> {
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
        store
            .create_appliance(NewAppliance {
                name: "Mail Room Printer".into(),
                kind: "Printer".into(),
                room: "102".into(),
                floor: "1".into(),
                status: ApplianceStatus::Working,
            })
            .await?;
        assert_eq!(store.pending_writes().await, 2);

        remote.set_down(false);
        assert_eq!(store.reconcile().await?, 2);
        assert_eq!(store.pending_writes().await, 0);
        assert_eq!(remote.records(models::EntityKind::Appliance).len(), 2);
        Ok(())
    }
}
