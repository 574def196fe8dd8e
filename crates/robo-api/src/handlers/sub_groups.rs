//! Sub-group generation and editing handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use robo_core::SubGroup;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParams};
use crate::handlers::{ok, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GroupCountRequest {
    pub group_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub member_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SetLeaderRequest {
    /// `null` clears the leader
    pub leader_id: Option<Uuid>,
}

/// POST /api/v1/groups/{id}/sub-groups/generate
pub async fn generate(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(parent_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<GroupCountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<SubGroup>>>), ApiError> {
    let sub_groups = state.sub_groups.generate(&parent_id, payload.group_count, &actor).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(sub_groups))))
}

/// POST /api/v1/groups/{id}/sub-groups
pub async fn create_empty(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(parent_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<GroupCountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<SubGroup>>>), ApiError> {
    let sub_groups = state.sub_groups.create_empty(&parent_id, payload.group_count, &actor).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(sub_groups))))
}

/// GET /api/v1/groups/{id}/sub-groups
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    PathParams(parent_id): PathParams<Uuid>,
) -> ApiResult<Vec<SubGroup>> {
    ok(state.sub_groups.list(&parent_id).await?)
}

/// GET /api/v1/sub-groups/{id}
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
) -> ApiResult<SubGroup> {
    ok(state.sub_groups.get(&id).await?)
}

/// POST /api/v1/sub-groups/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<AddMemberRequest>,
) -> ApiResult<SubGroup> {
    ok(state.sub_groups.add_member(&id, &payload.member_id, &actor).await?)
}

/// DELETE /api/v1/sub-groups/{id}/members/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams((id, member_id)): PathParams<(Uuid, Uuid)>,
) -> ApiResult<SubGroup> {
    ok(state.sub_groups.remove_member(&id, &member_id, &actor).await?)
}

/// PUT /api/v1/sub-groups/{id}/leader
pub async fn set_leader(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<SetLeaderRequest>,
) -> ApiResult<SubGroup> {
    ok(state.sub_groups.set_leader(&id, payload.leader_id, &actor).await?)
}

/// DELETE /api/v1/sub-groups/{id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sub_groups.delete(&id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
