use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::remote::RemoteStore;
use models::EntityKind;

/// reqwest-backed `RemoteStore` speaking to the portal REST API, e.g.
/// `http://localhost:3001/api`.
pub struct HttpRemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Remote(e.to_string()))?;
        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), client })
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind.api_path())
    }

    fn record_url(&self, kind: EntityKind, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.api_path(), id)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ServiceError::Remote(format!("status {status}: {body}")))
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>, ServiceError> {
        let resp = self
            .client
            .get(self.collection_url(kind))
            .send()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))?;
        Self::check(resp)
            .await?
            .json::<Vec<Value>>()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))
    }

    async fn create(&self, kind: EntityKind, fields: Value) -> Result<Value, ServiceError> {
        let resp = self
            .client
            .post(self.collection_url(kind))
            .json(&fields)
            .send()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))?;
        Self::check(resp)
            .await?
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))
    }

    async fn update(&self, kind: EntityKind, id: &str, fields: Value) -> Result<(), ServiceError> {
        let resp = self
            .client
            .put(self.record_url(kind, id))
            .json(&fields)
            .send()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))?;
        Self::check(resp).await.map(|_| ())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ServiceError> {
        let resp = self
            .client
            .delete(self.record_url(kind, id))
            .send()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))?;
        Self::check(resp).await.map(|_| ())
    }

    async fn notify(&self, issue_id: &str) -> Result<(), ServiceError> {
        let url = format!("{}/issues/{}/notify", self.base_url, issue_id);
        let resp = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))?;
        Self::check(resp).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_composed_per_kind() -> Result<(), ServiceError> {
        let store = HttpRemoteStore::new("http://localhost:3001/api/", Duration::from_secs(5))?;
        assert_eq!(
            store.collection_url(EntityKind::ServiceProvider),
            "http://localhost:3001/api/service-providers"
        );
        assert_eq!(
            store.record_url(EntityKind::Appliance, "7"),
            "http://localhost:3001/api/appliances/7"
        );
        Ok(())
    }
}
