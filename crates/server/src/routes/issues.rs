use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::JsonApiError;
use crate::mailer::compose_issue_email;
use crate::state::ServerState;
use models::{Issue, IssueUpdate, NewIssue, ServiceProvider};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
}

#[utoipa::path(
    get, path = "/api/issues", tag = "issues",
    responses((status = 200, description = "List OK"))
)]
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Issue>> {
    Json(state.store.issues().await)
}

#[utoipa::path(
    post, path = "/api/issues", tag = "issues",
    request_body = crate::openapi::NewIssueDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewIssue>,
) -> Result<Json<Issue>, JsonApiError> {
    let outcome = state.store.create_issue(input).await?;
    Ok(Json(outcome.record))
}

#[utoipa::path(
    put, path = "/api/issues/{id}", tag = "issues",
    params(("id" = String, Path, description = "Issue ID")),
    request_body = crate::openapi::IssueUpdateDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<IssueUpdate>,
) -> Result<Json<Issue>, JsonApiError> {
    let outcome = state.store.update_issue(&id, input).await?;
    Ok(Json(outcome.record))
}

#[utoipa::path(
    delete, path = "/api/issues/{id}", tag = "issues",
    params(("id" = String, Path, description = "Issue ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    state.store.delete_issue(&id).await?;
    info!(%id, "issue deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/api/issues/{id}/notify", tag = "issues",
    params(("id" = String, Path, description = "Issue ID")),
    responses(
        (status = 200, description = "Notification handled; body says whether a provider was notified"),
        (status = 404, description = "Issue Not Found"),
        (status = 502, description = "Notification Failed")
    )
)]
pub async fn notify(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<NotifyResponse>, JsonApiError> {
    let Some(issue) = state.store.find_issue(&id).await else {
        return Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("issue '{id}' not found")),
        ));
    };

    let Some(provider) = resolve_provider(&state, &issue).await else {
        warn!(issue_id = %id, "no provider matched for issue notification");
        return Ok(Json(NotifyResponse { notified: false, service_provider: None }));
    };

    let email = compose_issue_email(&issue, &provider);
    state.mailer.send(&email).await.map_err(|e| {
        JsonApiError::new(StatusCode::BAD_GATEWAY, "Notification Failed", Some(e.to_string()))
    })?;
    info!(issue_id = %id, provider = %provider.name, "issue notification sent");
    Ok(Json(NotifyResponse { notified: true, service_provider: Some(provider.name) }))
}

/// The provider named on the issue wins; otherwise fall back to routing by
/// the appliance's current type. Both can miss, e.g. after a provider was
/// deleted, and that is a `notified: false` outcome rather than an error.
async fn resolve_provider(state: &ServerState, issue: &Issue) -> Option<ServiceProvider> {
    if let Some(name) = &issue.service_provider {
        let named = state
            .store
            .service_providers()
            .await
            .into_iter()
            .find(|p| &p.name == name);
        if named.is_some() {
            return named;
        }
    }
    let appliance = state.store.find_appliance(&issue.appliance.appliance_id).await?;
    state.store.match_provider(&appliance.kind).await
}
