// ============================================================================
// Robo Core - Member Entity
// File: crates/robo-core/src/domain/member.rs
// Description: Recruitment roster entry and the ranked engine input
// ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use robo_shared::AuditFields;

static NIM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5,20}$").expect("valid NIM pattern"));

/// Member role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Mentor,
    /// Calon anggota: candidate member going through the OR period.
    #[default]
    Caang,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Mentor => "mentor",
            MemberRole::Caang => "caang",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(MemberRole::Admin),
            "mentor" => Some(MemberRole::Mentor),
            "caang" => Some(MemberRole::Caang),
            _ => None,
        }
    }
}

/// Member entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Member {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Full name must be between 2 and 100 characters"))]
    pub full_name: String,

    #[validate(regex(path = *NIM_REGEX, message = "NIM must be 5 to 20 digits"))]
    pub nim: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub role: MemberRole,

    #[validate(length(min = 1, max = 50, message = "OR period is required"))]
    pub or_period: String,

    pub is_active: bool,

    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Member {
    pub fn new(
        full_name: String,
        nim: String,
        email: String,
        role: MemberRole,
        or_period: String,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let member = Self {
            id: Uuid::new_v4(),
            full_name: full_name.trim().to_string(),
            nim: nim.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
            or_period: or_period.trim().to_string(),
            is_active: true,
            audit: AuditFields {
                created_by,
                ..AuditFields::default()
            },
        };

        member.validate()?;
        Ok(member)
    }

    /// Eligible for grouping and attendance tracking within `or_period`.
    pub fn is_eligible_in(&self, or_period: &str) -> bool {
        self.role == MemberRole::Caang
            && self.is_active
            && !self.audit.is_removed()
            && self.or_period == or_period
    }

    pub fn deactivate(&mut self, deactivated_by: Uuid) {
        self.is_active = false;
        self.audit.touch(deactivated_by);
    }
}

/// A roster member annotated with an attendance percentage (0..=100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibleMember {
    pub id: Uuid,
    pub full_name: String,
    pub nim: String,
    pub attendance_percentage: f64,
}

impl EligibleMember {
    pub fn new(member: &Member, attendance_percentage: f64) -> Self {
        Self {
            id: member.id,
            full_name: member.full_name.clone(),
            nim: member.nim.clone(),
            attendance_percentage,
        }
    }
}
