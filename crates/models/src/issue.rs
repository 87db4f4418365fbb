use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::appliance::Appliance;
use crate::errors::ModelError;
use crate::kind::EntityKind;
use crate::record::{Draft, Record};
use crate::seed;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Reported,
    InProgress,
    Resolved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IssuePriority::Low => "low",
            IssuePriority::Medium => "medium",
            IssuePriority::High => "high",
        };
        f.write_str(label)
    }
}

/// Point-in-time copy of the appliance identity embedded in an issue at
/// creation. Deliberately not a live reference: renaming or deleting the
/// appliance later must not rewrite history, and a dangling `appliance_id`
/// is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceSnapshot {
    pub appliance_id: String,
    pub appliance_name: String,
    pub room: String,
    pub floor: String,
}

impl ApplianceSnapshot {
    pub fn of(appliance: &Appliance) -> Self {
        Self {
            appliance_id: appliance.id.clone(),
            appliance_name: appliance.name.clone(),
            room: appliance.room.clone(),
            floor: appliance.floor.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    #[serde(flatten)]
    pub appliance: ApplianceSnapshot,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub reported_by: String,
    /// Provider name snapshot taken when the issue was routed; not a
    /// reference, so renaming the provider leaves this untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Issue {
    const KIND: EntityKind = EntityKind::Issue;

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed::issues()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    #[serde(flatten)]
    pub appliance: ApplianceSnapshot,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub reported_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
}

fn default_status() -> IssueStatus {
    IssueStatus::Reported
}

impl Draft for NewIssue {
    type Record = Issue;

    fn validate(&self) -> Result<(), ModelError> {
        if self.appliance.appliance_id.trim().is_empty() {
            return Err(ModelError::Validation("issue appliance reference required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(ModelError::Validation("issue description required".into()));
        }
        if self.reported_by.trim().is_empty() {
            return Err(ModelError::Validation("issue reporter required".into()));
        }
        Ok(())
    }

    fn into_record(self, id: String, now: DateTime<Utc>) -> Issue {
        Issue {
            id,
            appliance: self.appliance,
            description: self.description,
            status: self.status,
            priority: self.priority,
            reported_by: self.reported_by,
            service_provider: self.service_provider,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What a staff member fills in when reporting an issue; the store resolves
/// the appliance snapshot and provider routing from this.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    pub appliance_id: String,
    pub description: String,
    pub priority: IssuePriority,
    pub reported_by: String,
}

/// Partial update; absent fields are left untouched (shallow merge).
/// `updated_at` is stamped by the store, not supplied by the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<IssuePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
}

impl IssueUpdate {
    pub fn apply(&self, record: &mut Issue) {
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
        if let Some(provider) = &self.service_provider {
            record.service_provider = Some(provider.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliance::ApplianceStatus;

    fn appliance() -> Appliance {
        Appliance {
            id: "2".into(),
            name: "Break Room Microwave".into(),
            kind: "Microwave".into(),
            room: "105".into(),
            floor: "1".into(),
            status: ApplianceStatus::Faulty,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_flattens_on_wire() {
        let new = NewIssue {
            appliance: ApplianceSnapshot::of(&appliance()),
            description: "No heat".into(),
            status: IssueStatus::Reported,
            priority: IssuePriority::Medium,
            reported_by: "John Doe".into(),
            service_provider: None,
        };
        let json = serde_json::to_value(&new).expect("serialize");
        assert_eq!(json["applianceId"], "2");
        assert_eq!(json["applianceName"], "Break Room Microwave");
        assert_eq!(json["room"], "105");
        assert!(json.get("appliance").is_none());
        assert!(json.get("serviceProvider").is_none());
    }

    #[test]
    fn status_wire_values() {
        assert_eq!(serde_json::to_string(&IssueStatus::InProgress).unwrap(), "\"in-progress\"");
        assert_eq!(serde_json::to_string(&IssueStatus::Reported).unwrap(), "\"reported\"");
        assert_eq!(serde_json::to_string(&IssuePriority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn snapshot_survives_appliance_rename() {
        let mut a = appliance();
        let new = NewIssue {
            appliance: ApplianceSnapshot::of(&a),
            description: "No heat".into(),
            status: IssueStatus::Reported,
            priority: IssuePriority::Medium,
            reported_by: "John Doe".into(),
            service_provider: None,
        };
        let issue = new.into_record("9".into(), Utc::now());
        a.name = "Renamed".into();
        assert_eq!(issue.appliance.appliance_name, "Break Room Microwave");
    }

    #[test]
    fn missing_description_rejected() {
        let new = NewIssue {
            appliance: ApplianceSnapshot::of(&appliance()),
            description: "   ".into(),
            status: IssueStatus::Reported,
            priority: IssuePriority::Low,
            reported_by: "John Doe".into(),
            service_provider: None,
        };
        assert!(new.validate().is_err());
    }
}
