use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3001, worker_threads: Some(4) }
    }
}

/// Remote portal API reachable from the client tier. When `base_url` is empty
/// the bridge runs in local-only mode.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: String::new(), timeout_secs: default_api_timeout() }
    }
}

fn default_api_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

fn default_data_dir() -> String { "data".to_string() }

/// How an issue is routed when several providers service the appliance type.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_routing_policy")]
    pub policy: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { policy: default_routing_policy() }
    }
}

fn default_routing_policy() -> String { "first-match".to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.api.normalize_from_env();
        self.storage.normalize();
        self.routing.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl ApiConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML wins; the env var fills the gap when the file omits it.
        if self.base_url.trim().is_empty() {
            if let Ok(url) = std::env::var("PORTAL_API_URL") {
                self.base_url = url;
            }
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_api_timeout();
        }
    }

    /// Remote base URL, if one is configured.
    pub fn remote_url(&self) -> Option<&str> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }
}

impl RoutingConfig {
    pub fn validate(&self) -> Result<()> {
        match self.policy.as_str() {
            "first-match" | "round-robin" => Ok(()),
            other => Err(anyhow!("routing.policy must be first-match or round-robin, got {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults validate");
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.storage.data_dir, "data");
        assert_eq!(cfg.routing.policy, "first-match");
        assert!(cfg.api.remote_url().is_none());
    }

    #[test]
    fn rejects_unknown_routing_policy() {
        let mut cfg = AppConfig::default();
        cfg.routing.policy = "least-loaded".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn parses_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [api]
            base_url = "http://localhost:3001/api"

            [routing]
            policy = "round-robin"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.api.remote_url(), Some("http://localhost:3001/api"));
        assert_eq!(cfg.routing.policy, "round-robin");
    }
}
