pub mod appliance;
pub mod errors;
pub mod issue;
pub mod kind;
pub mod provider;
pub mod record;
pub mod seed;

pub use appliance::{Appliance, ApplianceStatus, ApplianceUpdate, NewAppliance};
pub use issue::{
    ApplianceSnapshot, Issue, IssuePriority, IssueReport, IssueStatus, IssueUpdate, NewIssue,
};
pub use kind::EntityKind;
pub use provider::{NewServiceProvider, ServiceProvider, ServiceProviderUpdate};
pub use record::{Draft, Record};
