// ============================================================================
// Robo Core - Logbook Entity
// File: crates/robo-core/src/domain/logbook.rs
// Description: Internship and research logbook entries with mentor review
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use robo_shared::AuditFields;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogbookKind {
    Internship,
    Research,
}

impl LogbookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogbookKind::Internship => "internship",
            LogbookKind::Research => "research",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "internship" => Some(LogbookKind::Internship),
            "research" => Some(LogbookKind::Research),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogbookStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LogbookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogbookStatus::Pending => "pending",
            LogbookStatus::Approved => "approved",
            LogbookStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LogbookStatus::Pending),
            "approved" => Some(LogbookStatus::Approved),
            "rejected" => Some(LogbookStatus::Rejected),
            _ => None,
        }
    }
}

/// Logbook entry entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogbookEntry {
    pub id: Uuid,
    pub member_id: Uuid,
    pub kind: LogbookKind,

    #[validate(length(min = 2, max = 150, message = "Title must be between 2 and 150 characters"))]
    pub title: String,

    pub activity_date: NaiveDate,

    #[validate(length(min = 1, max = 5000, message = "Description must be between 1 and 5000 characters"))]
    pub description: String,

    pub status: LogbookStatus,
    pub reviewer_note: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,

    #[serde(flatten)]
    pub audit: AuditFields,
}

impl LogbookEntry {
    pub fn new(
        member_id: Uuid,
        kind: LogbookKind,
        title: String,
        activity_date: NaiveDate,
        description: String,
        created_by: Uuid,
    ) -> Result<Self, validator::ValidationErrors> {
        let entry = Self {
            id: Uuid::new_v4(),
            member_id,
            kind,
            title: title.trim().to_string(),
            activity_date,
            description: description.trim().to_string(),
            status: LogbookStatus::Pending,
            reviewer_note: None,
            reviewed_at: None,
            reviewed_by: None,
            audit: AuditFields::created_by(created_by),
        };

        entry.validate()?;
        Ok(entry)
    }

    /// Approve or reject a pending entry. Rejections must carry a note.
    pub fn review(&mut self, approve: bool, note: Option<String>, reviewer: Uuid) -> Result<(), DomainError> {
        if self.status != LogbookStatus::Pending {
            return Err(DomainError::LogbookAlreadyReviewed(self.id));
        }

        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        if !approve && note.is_none() {
            return Err(DomainError::ValidationError("Rejecting a logbook entry requires a note".to_string()));
        }

        self.status = if approve { LogbookStatus::Approved } else { LogbookStatus::Rejected };
        self.reviewer_note = note;
        self.reviewed_at = Some(Utc::now());
        self.reviewed_by = Some(reviewer);
        self.audit.touch(reviewer);
        Ok(())
    }
}
