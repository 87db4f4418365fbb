use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::kind::EntityKind;
use crate::record::{Draft, Record};
use crate::seed;

/// Operational state of an appliance. Free-standing: not derived from the
/// issues reported against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplianceStatus {
    Working,
    Faulty,
    Maintenance,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    pub id: String,
    pub name: String,
    /// Type label, e.g. "Printer"; matched against provider appliance types.
    #[serde(rename = "type")]
    pub kind: String,
    pub room: String,
    pub floor: String,
    pub status: ApplianceStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for Appliance {
    const KIND: EntityKind = EntityKind::Appliance;

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed::appliances()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppliance {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub room: String,
    pub floor: String,
    pub status: ApplianceStatus,
}

impl Draft for NewAppliance {
    type Record = Appliance;

    fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("appliance name required".into()));
        }
        if self.kind.trim().is_empty() {
            return Err(ModelError::Validation("appliance type required".into()));
        }
        if self.room.trim().is_empty() || self.floor.trim().is_empty() {
            return Err(ModelError::Validation("appliance location required".into()));
        }
        Ok(())
    }

    fn into_record(self, id: String, now: DateTime<Utc>) -> Appliance {
        Appliance {
            id,
            name: self.name,
            kind: self.kind,
            room: self.room,
            floor: self.floor,
            status: self.status,
            created_at: now,
        }
    }
}

/// Partial update; absent fields are left untouched (shallow merge).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplianceStatus>,
}

impl ApplianceUpdate {
    pub fn apply(&self, record: &mut Appliance) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(kind) = &self.kind {
            record.kind = kind.clone();
        }
        if let Some(room) = &self.room {
            record.room = room.clone();
        }
        if let Some(floor) = &self.floor {
            record.floor = floor.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}
