//! Logbook handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use robo_core::services::NewLogbookEntry;
use robo_core::{LogbookEntry, LogbookKind};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParams, QueryParams};
use crate::handlers::{ok, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLogbookRequest {
    /// Defaults to the caller
    pub member_id: Option<Uuid>,
    #[serde(flatten)]
    pub entry: NewLogbookEntry,
}

#[derive(Debug, Deserialize)]
pub struct KindQuery {
    pub kind: Option<LogbookKind>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    pub approve: bool,
    #[validate(length(max = 1000, message = "Note too long"))]
    pub note: Option<String>,
}

/// POST /api/v1/logbooks
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<CreateLogbookRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LogbookEntry>>), ApiError> {
    let member_id = payload.member_id.unwrap_or(actor.user_id);
    let entry = state.logbooks.create_entry(&member_id, payload.entry, &actor).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry))))
}

/// GET /api/v1/members/{id}/logbooks?kind=
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(member_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<KindQuery>,
) -> ApiResult<Vec<LogbookEntry>> {
    ok(state.logbooks.list_entries(&member_id, query.kind, &actor).await?)
}

/// PUT /api/v1/logbooks/{id}/review
pub async fn review(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(entry_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<ReviewRequest>,
) -> ApiResult<LogbookEntry> {
    payload.validate()?;
    ok(state.logbooks.review(&entry_id, payload.approve, payload.note, &actor).await?)
}
