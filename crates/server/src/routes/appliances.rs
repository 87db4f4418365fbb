use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use models::{Appliance, ApplianceUpdate, NewAppliance};

#[utoipa::path(
    get, path = "/api/appliances", tag = "appliances",
    responses((status = 200, description = "List OK"))
)]
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Appliance>> {
    Json(state.store.appliances().await)
}

#[utoipa::path(
    post, path = "/api/appliances", tag = "appliances",
    request_body = crate::openapi::NewApplianceDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewAppliance>,
) -> Result<Json<Appliance>, JsonApiError> {
    let outcome = state.store.create_appliance(input).await?;
    Ok(Json(outcome.record))
}

#[utoipa::path(
    put, path = "/api/appliances/{id}", tag = "appliances",
    params(("id" = String, Path, description = "Appliance ID")),
    request_body = crate::openapi::ApplianceUpdateDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<ApplianceUpdate>,
) -> Result<Json<Appliance>, JsonApiError> {
    let outcome = state.store.update_appliance(&id, input).await?;
    Ok(Json(outcome.record))
}

#[utoipa::path(
    delete, path = "/api/appliances/{id}", tag = "appliances",
    params(("id" = String, Path, description = "Appliance ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    state.store.delete_appliance(&id).await?;
    info!(%id, "appliance deleted");
    Ok(StatusCode::NO_CONTENT)
}
