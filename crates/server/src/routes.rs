use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::state::ServerState;

pub mod appliances;
pub mod issues;
pub mod providers;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "OK"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: static frontend, health, swagger UI
/// and the portal API.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));

    let api = Router::new()
        .route("/service-providers", get(providers::list).post(providers::create))
        .route("/service-providers/:id", put(providers::update).delete(providers::delete))
        .route("/appliances", get(appliances::list).post(appliances::create))
        .route("/appliances/:id", put(appliances::update).delete(appliances::delete))
        .route("/issues", get(issues::list).post(issues::create))
        .route("/issues/:id", put(issues::update).delete(issues::delete))
        .route("/issues/:id/notify", post(issues::notify));

    Router::new()
        .route("/health", get(health))
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
        )
        .nest("/api", api)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
