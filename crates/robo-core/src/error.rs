//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No eligible members to assign")]
    NoEligibleMembers,

    #[error("Invalid group count: {0} (must be between 1 and {max})", max = robo_shared::constants::MAX_SUB_GROUPS)]
    InvalidGroupCount(i64),

    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    #[error("Member not eligible: {0}")]
    MemberNotEligible(Uuid),

    #[error("NIM already registered in {or_period}: {nim}")]
    NimAlreadyRegistered { or_period: String, nim: String },

    #[error("Activity not found: {0}")]
    ActivityNotFound(Uuid),

    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),

    #[error("Group not active: {0}")]
    GroupNotActive(Uuid),

    #[error("Group name already exists in {or_period}: {name}")]
    GroupNameAlreadyExists { or_period: String, name: String },

    #[error("Sub-group not found: {0}")]
    SubGroupNotFound(Uuid),

    #[error("Member {member_id} already assigned to sub-group {sub_group_id}")]
    MemberAlreadyAssigned { member_id: Uuid, sub_group_id: Uuid },

    #[error("Member {member_id} is not in sub-group {sub_group_id}")]
    MemberNotInSubGroup { member_id: Uuid, sub_group_id: Uuid },

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(Uuid),

    #[error("Submission already graded: {0}")]
    SubmissionAlreadyGraded(Uuid),

    #[error("Score {score} out of range 0..={max_score}")]
    ScoreOutOfRange { score: i32, max_score: i32 },

    #[error("Logbook entry not found: {0}")]
    LogbookNotFound(Uuid),

    #[error("Logbook entry already reviewed: {0}")]
    LogbookAlreadyReviewed(Uuid),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
