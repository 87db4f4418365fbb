use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::mailer::LogMailer;
use crate::routes;
use crate::state::ServerState;
use service::{EntityStore, IssueRouter, JsonKvStore, PersistenceBridge, RoutingPolicy};

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_config() -> anyhow::Result<configs::AppConfig> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "no usable config file; running with defaults");
            let mut cfg = configs::AppConfig::default();
            cfg.normalize_and_validate()?;
            Ok(cfg)
        }
    }
}

/// Public entry: build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;
    common::env::ensure_env("frontend", &cfg.storage.data_dir).await?;

    // Durable store behind the portal API; the server itself never talks to
    // a further remote, so the bridge runs local-only.
    let kv_path = Path::new(&cfg.storage.data_dir).join("portal.json");
    let local = JsonKvStore::new(kv_path).await?;
    let bridge = Arc::new(PersistenceBridge::new(None, local).await);

    let policy: RoutingPolicy = cfg.routing.policy.parse()?;
    let store = EntityStore::open(bridge, IssueRouter::new(policy), None).await;

    let state = ServerState { store, mailer: Arc::new(LogMailer) };

    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting portal server");
    println!("starting portal server at {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
