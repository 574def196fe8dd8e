//! Activity and attendance handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use robo_core::services::{MemberAttendance, NewActivity};
use robo_core::{Activity, AttendanceRecord, AttendanceStatus};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParams, QueryParams};
use crate::handlers::{ok, ApiResult, PeriodQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RecordAttendanceRequest {
    pub member_id: Uuid,
    pub status: AttendanceStatus,
    #[validate(length(max = 500, message = "Note too long"))]
    pub note: Option<String>,
}

/// POST /api/v1/activities
pub async fn create_activity(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<NewActivity>,
) -> Result<(StatusCode, Json<ApiResponse<Activity>>), ApiError> {
    let activity = state.attendance.create_activity(payload, &actor).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(activity))))
}

/// GET /api/v1/activities?or_period=
pub async fn list_activities(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    QueryParams(period): QueryParams<PeriodQuery>,
) -> ApiResult<Vec<Activity>> {
    ok(state.attendance.list_activities(&period.or_period).await?)
}

/// PUT /api/v1/activities/{id}/attendance
pub async fn record_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(activity_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<RecordAttendanceRequest>,
) -> ApiResult<AttendanceRecord> {
    payload.validate()?;
    let record = state
        .attendance
        .record_attendance(&activity_id, &payload.member_id, payload.status, payload.note, &actor)
        .await?;
    ok(record)
}

/// GET /api/v1/attendance/report?or_period=
pub async fn period_report(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    QueryParams(period): QueryParams<PeriodQuery>,
) -> ApiResult<Vec<MemberAttendance>> {
    actor.require_staff("Viewing the attendance report")?;
    ok(state.attendance.period_report(&period.or_period).await?)
}
