//! Member roster handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use robo_core::services::RegisterMember;
use robo_core::{AttendanceSummary, Member};
use robo_shared::Pagination;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParams, QueryParams};
use crate::handlers::{ok, ApiResult, PeriodQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/members
pub async fn register(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<RegisterMember>,
) -> Result<(StatusCode, Json<ApiResponse<Member>>), ApiError> {
    let member = state.members.register(payload, &actor).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(member))))
}

/// GET /api/v1/members?or_period=&page=&per_page=
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    QueryParams(period): QueryParams<PeriodQuery>,
    QueryParams(page): QueryParams<Pagination>,
) -> ApiResult<Vec<Member>> {
    ok(state.members.list_by_period(&period.or_period, &page).await?)
}

/// GET /api/v1/members/{id}
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
) -> ApiResult<Member> {
    ok(state.members.get(&id).await?)
}

/// DELETE /api/v1/members/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
) -> ApiResult<Member> {
    ok(state.members.deactivate(&id, &actor).await?)
}

/// GET /api/v1/members/{id}/attendance
pub async fn attendance_summary(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(id): PathParams<Uuid>,
) -> ApiResult<AttendanceSummary> {
    actor.require_self_or_staff(&id, "Viewing attendance")?;
    ok(state.attendance.member_summary(&id).await?)
}
