//! HTTP routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use listwarden_domain::{BlacklistDraft, ModerationRequest, RequestId, WhitelistDraft};

use crate::api::auth::AdminAuth;
use crate::app::App;
use crate::infrastructure::ports::{BlacklistRow, WhitelistRow};
use crate::use_cases::moderation::SubmitError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route("/whitelist", get(read_whitelist).post(submit_whitelist))
        .route("/blacklist", get(read_blacklist).post(submit_blacklist))
        .route("/gamesdetect", get(read_gamesdetect))
        .route("/pending", get(list_pending))
        .route("/moderate/{request_id}", axum::routing::post(moderate))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// List reads
// =============================================================================

async fn read_whitelist(State(app): State<Arc<App>>) -> Json<Vec<WhitelistRow>> {
    let rows = app.store.fetch_whitelist().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Whitelist read failed, returning empty list");
        Vec::new()
    });
    Json(rows)
}

async fn read_blacklist(State(app): State<Arc<App>>) -> Json<Vec<BlacklistRow>> {
    let rows = app.store.fetch_blacklist().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Blacklist read failed, returning empty list");
        Vec::new()
    });
    Json(rows)
}

async fn read_gamesdetect(State(app): State<Arc<App>>) -> Result<Json<serde_json::Value>, ApiError> {
    let listing = app
        .detect
        .fetch_detectable()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    Ok(Json(listing))
}

// =============================================================================
// Submissions
// =============================================================================

#[derive(Debug, Serialize)]
struct SubmitResponse {
    detail: &'static str,
    id: RequestId,
}

async fn submit_whitelist(
    State(app): State<Arc<App>>,
    Json(draft): Json<WhitelistDraft>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let id = app.queue.submit_whitelist(draft).await?;
    Ok(Json(SubmitResponse {
        detail: "Request submitted for moderation",
        id,
    }))
}

async fn submit_blacklist(
    State(app): State<Arc<App>>,
    Json(draft): Json<BlacklistDraft>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let id = app.queue.submit_blacklist(draft).await?;
    Ok(Json(SubmitResponse {
        detail: "Request submitted for moderation",
        id,
    }))
}

// =============================================================================
// Moderation
// =============================================================================

async fn list_pending(
    State(app): State<Arc<App>>,
    _admin: AdminAuth,
) -> Json<Vec<ModerationRequest>> {
    Json(app.queue.list_pending().await)
}

#[derive(Debug, Deserialize)]
struct ModerateParams {
    #[serde(default = "default_approved")]
    approved: bool,
}

fn default_approved() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct ModerateResponse {
    detail: &'static str,
    approved: bool,
}

async fn moderate(
    State(app): State<Arc<App>>,
    _admin: AdminAuth,
    Path(request_id): Path<String>,
    Query(params): Query<ModerateParams>,
) -> Result<Json<ModerateResponse>, ApiError> {
    // The id space is opaque to callers: malformed ids are indistinguishable
    // from unknown ones.
    let Ok(id) = RequestId::parse(&request_id) else {
        return Err(ApiError::NotFound);
    };

    if app.queue.decide(id, params.approved).await {
        Ok(Json(ModerateResponse {
            detail: "Request processed",
            approved: params.approved,
        }))
    } else {
        Err(ApiError::NotFound)
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Validation(String),
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Request not found or already processed".to_string(),
            ),
            ApiError::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::Upstream(detail) => (StatusCode::BAD_GATEWAY, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Validation(err) => ApiError::Validation(err.to_string()),
        }
    }
}
