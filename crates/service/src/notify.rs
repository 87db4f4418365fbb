use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::remote::RemoteStore;

/// Side-effect hook fired once after an issue is created with a matched
/// provider. Failures are logged by the caller, never propagated into the
/// creation result.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, issue_id: &str) -> Result<(), ServiceError>;
}

/// Notifier that delegates to the remote API's notification endpoint.
pub struct RemoteNotifier {
    remote: Arc<dyn RemoteStore>,
}

impl RemoteNotifier {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl Notifier for RemoteNotifier {
    async fn notify(&self, issue_id: &str) -> Result<(), ServiceError> {
        self.remote.notify(issue_id).await
    }
}
