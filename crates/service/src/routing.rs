use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

use crate::errors::ServiceError;
use models::ServiceProvider;

/// How an issue is assigned to a provider among those servicing the
/// appliance type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// First provider in collection order. Matches the historical behavior.
    #[default]
    FirstMatch,
    /// Rotate through matching providers, one cursor per appliance type.
    RoundRobin,
}

impl FromStr for RoutingPolicy {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-match" => Ok(RoutingPolicy::FirstMatch),
            "round-robin" => Ok(RoutingPolicy::RoundRobin),
            other => Err(ServiceError::Validation(format!("unknown routing policy '{other}'"))),
        }
    }
}

/// Picks the provider for a newly reported issue.
///
/// Round-robin cursors are per appliance type and in-memory only; a restart
/// starts the rotation over, which is acceptable for a fairness hint.
pub struct IssueRouter {
    policy: RoutingPolicy,
    cursors: Mutex<HashMap<String, usize>>,
}

impl IssueRouter {
    pub fn new(policy: RoutingPolicy) -> Self {
        Self { policy, cursors: Mutex::new(HashMap::new()) }
    }

    pub fn first_match() -> Self {
        Self::new(RoutingPolicy::FirstMatch)
    }

    /// Select a provider servicing `appliance_type`, or `None` when nobody
    /// does. Matching ignores provider order only under round-robin.
    pub fn select<'a>(
        &self,
        providers: &'a [ServiceProvider],
        appliance_type: &str,
    ) -> Option<&'a ServiceProvider> {
        let matches: Vec<&ServiceProvider> =
            providers.iter().filter(|p| p.services(appliance_type)).collect();
        if matches.is_empty() {
            return None;
        }
        match self.policy {
            RoutingPolicy::FirstMatch => Some(matches[0]),
            RoutingPolicy::RoundRobin => {
                let mut cursors = self.cursors.lock().unwrap_or_else(|e| e.into_inner());
                let cursor = cursors.entry(appliance_type.to_string()).or_insert(0);
                let picked = matches[*cursor % matches.len()];
                *cursor = cursor.wrapping_add(1);
                Some(picked)
            }
        }
    }
}
