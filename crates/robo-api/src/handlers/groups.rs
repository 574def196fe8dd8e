//! Parent group handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use robo_core::services::NewGroup;
use robo_core::Group;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParams, QueryParams};
use crate::handlers::{ok, ApiResult, PeriodQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/groups
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<NewGroup>,
) -> Result<(StatusCode, Json<ApiResponse<Group>>), ApiError> {
    let group = state.groups.create(payload, &actor).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(group))))
}

/// GET /api/v1/groups?or_period=
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    QueryParams(period): QueryParams<PeriodQuery>,
) -> ApiResult<Vec<Group>> {
    ok(state.groups.list_by_period(&period.or_period).await?)
}

/// GET /api/v1/groups/{id}
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
) -> ApiResult<Group> {
    ok(state.groups.get(&id).await?)
}

/// DELETE /api/v1/groups/{id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.groups.delete(&id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
