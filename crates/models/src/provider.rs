use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::kind::EntityKind;
use crate::record::{Draft, Record};
use crate::seed;

/// A repair company that services one or more appliance types. The
/// `appliance_types` labels drive issue routing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub appliance_types: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ServiceProvider {
    /// Whether this provider services the given appliance type label.
    pub fn services(&self, appliance_type: &str) -> bool {
        self.appliance_types.iter().any(|t| t == appliance_type)
    }
}

impl Record for ServiceProvider {
    const KIND: EntityKind = EntityKind::ServiceProvider;

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed::service_providers()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceProvider {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub appliance_types: Vec<String>,
}

impl Draft for NewServiceProvider {
    type Record = ServiceProvider;

    fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("provider name required".into()));
        }
        if !self.email.contains('@') {
            return Err(ModelError::Validation("invalid provider email".into()));
        }
        Ok(())
    }

    fn into_record(self, id: String, now: DateTime<Utc>) -> ServiceProvider {
        ServiceProvider {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            appliance_types: self.appliance_types,
            created_at: now,
        }
    }
}

/// Partial update; absent fields are left untouched (shallow merge).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance_types: Option<Vec<String>>,
}

impl ServiceProviderUpdate {
    pub fn apply(&self, record: &mut ServiceProvider) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            record.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            record.address = address.clone();
        }
        if let Some(types) = &self.appliance_types {
            record.appliance_types = types.clone();
        }
    }
}
