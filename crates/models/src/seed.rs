//! Fixed starter data, created and persisted the first time a session finds
//! both backends empty. Ids and timestamps are constant so a second cold
//! start reconstructs an identical collection.

use chrono::{DateTime, Utc};

use crate::appliance::{Appliance, ApplianceStatus};
use crate::issue::{ApplianceSnapshot, Issue, IssuePriority, IssueStatus};
use crate::provider::ServiceProvider;

fn seeded_at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

pub fn service_providers() -> Vec<ServiceProvider> {
    vec![
        ServiceProvider {
            id: "1".into(),
            name: "TechFix Solutions".into(),
            email: "contact@techfix.com".into(),
            phone: "+1 (555) 123-4567".into(),
            address: "123 Tech Street, City, State 12345".into(),
            appliance_types: vec!["Computer".into(), "Printer".into(), "Projector".into()],
            created_at: seeded_at(1_705_276_800), // 2024-01-15
        },
        ServiceProvider {
            id: "2".into(),
            name: "ElectroRepair Pro".into(),
            email: "service@electrorepair.com".into(),
            phone: "+1 (555) 987-6543".into(),
            address: "456 Electric Ave, City, State 12345".into(),
            appliance_types: vec![
                "Air Conditioner".into(),
                "Refrigerator".into(),
                "Microwave".into(),
            ],
            created_at: seeded_at(1_705_708_800), // 2024-01-20
        },
    ]
}

pub fn appliances() -> Vec<Appliance> {
    vec![
        Appliance {
            id: "1".into(),
            name: "Conference Room Computer".into(),
            kind: "Computer".into(),
            room: "101".into(),
            floor: "1".into(),
            status: ApplianceStatus::Working,
            created_at: seeded_at(1_706_140_800), // 2024-01-25
        },
        Appliance {
            id: "2".into(),
            name: "Break Room Microwave".into(),
            kind: "Microwave".into(),
            room: "105".into(),
            floor: "1".into(),
            status: ApplianceStatus::Faulty,
            created_at: seeded_at(1_706_227_200), // 2024-01-26
        },
        Appliance {
            id: "3".into(),
            name: "Office Printer".into(),
            kind: "Printer".into(),
            room: "201".into(),
            floor: "2".into(),
            status: ApplianceStatus::Working,
            created_at: seeded_at(1_706_313_600), // 2024-01-27
        },
    ]
}

pub fn issues() -> Vec<Issue> {
    let reported = seeded_at(1_706_400_000); // 2024-01-28
    vec![Issue {
        id: "1".into(),
        appliance: ApplianceSnapshot {
            appliance_id: "2".into(),
            appliance_name: "Break Room Microwave".into(),
            room: "105".into(),
            floor: "1".into(),
        },
        description: "Microwave is not heating food properly. The turntable also makes strange noises when rotating.".into(),
        status: IssueStatus::Reported,
        priority: IssuePriority::Medium,
        reported_by: "John Doe".into(),
        service_provider: Some("ElectroRepair Pro".into()),
        created_at: reported,
        updated_at: reported,
    }]
}
