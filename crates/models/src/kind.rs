use serde::{Deserialize, Serialize};
use std::fmt;

/// The three entity collections the portal manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    ServiceProvider,
    Appliance,
    Issue,
}

impl EntityKind {
    /// Fixed durable-storage key for the collection snapshot.
    pub fn collection_key(&self) -> &'static str {
        match self {
            EntityKind::ServiceProvider => "serviceProviders",
            EntityKind::Appliance => "appliances",
            EntityKind::Issue => "issues",
        }
    }

    /// REST path segment under the API root.
    pub fn api_path(&self) -> &'static str {
        match self {
            EntityKind::ServiceProvider => "service-providers",
            EntityKind::Appliance => "appliances",
            EntityKind::Issue => "issues",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::ServiceProvider => "service provider",
            EntityKind::Appliance => "appliance",
            EntityKind::Issue => "issue",
        };
        f.write_str(name)
    }
}
