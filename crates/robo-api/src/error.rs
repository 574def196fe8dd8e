// ============================================================================
// Robo API - Error Mapping
// File: crates/robo-api/src/error.rs
// Description: HTTP error type; every failure is one enveloped response
// ============================================================================

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use robo_core::DomainError;
use robo_security::JwtError;

use crate::response::ApiResponse;

#[derive(Error, Debug, PartialEq)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NoEligibleMembers
            | DomainError::InvalidGroupCount(_)
            | DomainError::MemberNotEligible(_)
            | DomainError::GroupNotActive(_)
            | DomainError::MemberNotInSubGroup { .. }
            | DomainError::ScoreOutOfRange { .. }
            | DomainError::ValidationError(_) => ApiError::BadRequest(message),

            DomainError::MemberNotFound(_)
            | DomainError::ActivityNotFound(_)
            | DomainError::GroupNotFound(_)
            | DomainError::SubGroupNotFound(_)
            | DomainError::TaskNotFound(_)
            | DomainError::SubmissionNotFound(_)
            | DomainError::LogbookNotFound(_) => ApiError::NotFound(message),

            DomainError::NimAlreadyRegistered { .. }
            | DomainError::GroupNameAlreadyExists { .. }
            | DomainError::MemberAlreadyAssigned { .. }
            | DomainError::SubmissionAlreadyGraded(_)
            | DomainError::LogbookAlreadyReviewed(_) => ApiError::Conflict(message),

            DomainError::Forbidden(reason) => ApiError::Forbidden(reason),

            DomainError::DatabaseError(_) | DomainError::InternalError(_) => ApiError::InternalError(message),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => {
                warn!("{} {}: {}", status.as_u16(), self.code(), msg);
                msg.clone()
            }
        };

        (status, Json(ApiResponse::<()>::error(self.code(), &message))).into_response()
    }
}
