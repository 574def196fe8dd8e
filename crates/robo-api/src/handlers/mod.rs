//! HTTP handlers

pub mod health;
pub mod members;
pub mod attendance;
pub mod groups;
pub mod sub_groups;
pub mod tasks;
pub mod logbooks;

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::response::ApiResponse;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// `?or_period=` filter shared by the list endpoints
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub or_period: String,
}

pub(crate) fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
