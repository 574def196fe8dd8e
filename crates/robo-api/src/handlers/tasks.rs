//! Task and submission handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use robo_core::services::NewTask;
use robo_core::{Task, TaskSubmission};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParams, QueryParams};
use crate::handlers::{ok, ApiResult, PeriodQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Defaults to the caller
    pub member_id: Option<Uuid>,
    #[validate(length(min = 1, max = 2000, message = "Submission content must be between 1 and 2000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    pub score: i32,
    #[validate(length(max = 2000, message = "Feedback too long"))]
    pub feedback: Option<String>,
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    JsonBody(payload): JsonBody<NewTask>,
) -> Result<(StatusCode, Json<ApiResponse<Task>>), ApiError> {
    let task = state.tasks.create_task(payload, &actor).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(task))))
}

/// GET /api/v1/tasks?or_period=
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    QueryParams(period): QueryParams<PeriodQuery>,
) -> ApiResult<Vec<Task>> {
    ok(state.tasks.list_tasks(&period.or_period).await?)
}

/// POST /api/v1/tasks/{id}/submissions
pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(task_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<SubmitRequest>,
) -> ApiResult<TaskSubmission> {
    payload.validate()?;
    let member_id = payload.member_id.unwrap_or(actor.user_id);
    ok(state.tasks.submit(&task_id, &member_id, payload.content, &actor).await?)
}

/// GET /api/v1/tasks/{id}/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(task_id): PathParams<Uuid>,
) -> ApiResult<Vec<TaskSubmission>> {
    ok(state.tasks.list_submissions(&task_id, &actor).await?)
}

/// PUT /api/v1/submissions/{id}/grade
pub async fn grade(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    PathParams(submission_id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<GradeRequest>,
) -> ApiResult<TaskSubmission> {
    payload.validate()?;
    ok(state.tasks.grade(&submission_id, payload.score, payload.feedback, &actor).await?)
}
