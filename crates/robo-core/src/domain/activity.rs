//! Activity entity: one scheduled club activity within an OR period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use robo_shared::AuditFields;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Activity {
    pub id: Uuid,

    #[validate(length(min = 1, max = 50, message = "OR period is required"))]
    pub or_period: String,

    #[validate(length(min = 2, max = 150, message = "Title must be between 2 and 150 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    pub held_at: DateTime<Utc>,
    pub is_active: bool,

    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Activity {
    pub fn new(
        or_period: String,
        title: String,
        description: Option<String>,
        held_at: DateTime<Utc>,
        created_by: Uuid,
    ) -> Result<Self, validator::ValidationErrors> {
        let activity = Self {
            id: Uuid::new_v4(),
            or_period: or_period.trim().to_string(),
            title: title.trim().to_string(),
            description: description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            held_at,
            is_active: true,
            audit: AuditFields::created_by(created_by),
        };

        activity.validate()?;
        Ok(activity)
    }
}
