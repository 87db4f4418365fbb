use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use models::{NewServiceProvider, ServiceProvider, ServiceProviderUpdate};

#[utoipa::path(
    get, path = "/api/service-providers", tag = "service-providers",
    responses((status = 200, description = "List OK"))
)]
pub async fn list(State(state): State<ServerState>) -> Json<Vec<ServiceProvider>> {
    Json(state.store.service_providers().await)
}

#[utoipa::path(
    post, path = "/api/service-providers", tag = "service-providers",
    request_body = crate::openapi::NewServiceProviderDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewServiceProvider>,
) -> Result<Json<ServiceProvider>, JsonApiError> {
    let outcome = state.store.create_service_provider(input).await?;
    Ok(Json(outcome.record))
}

#[utoipa::path(
    put, path = "/api/service-providers/{id}", tag = "service-providers",
    params(("id" = String, Path, description = "Service provider ID")),
    request_body = crate::openapi::ServiceProviderUpdateDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<ServiceProviderUpdate>,
) -> Result<Json<ServiceProvider>, JsonApiError> {
    let outcome = state.store.update_service_provider(&id, input).await?;
    Ok(Json(outcome.record))
}

#[utoipa::path(
    delete, path = "/api/service-providers/{id}", tag = "service-providers",
    params(("id" = String, Path, description = "Service provider ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    state.store.delete_service_provider(&id).await?;
    info!(%id, "service provider deleted");
    Ok(StatusCode::NO_CONTENT)
}
