// ============================================================================
// Robo Core - Group Entity
// File: crates/robo-core/src/domain/group.rs
// Description: Parent group that owns the generated sub-groups
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use robo_shared::AuditFields;

/// Group entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Group {
    pub id: Uuid,

    #[validate(length(min = 1, max = 50, message = "OR period is required"))]
    pub or_period: String,

    #[validate(length(min = 2, max = 100, message = "Group name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    /// Denormalized counters, refreshed on every sub-group write.
    pub total_sub_groups: i32,
    pub total_members: i32,

    pub is_active: bool,

    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Group {
    pub fn new(
        or_period: String,
        name: String,
        description: Option<String>,
        created_by: Uuid,
    ) -> Result<Self, validator::ValidationErrors> {
        let group = Self {
            id: Uuid::new_v4(),
            or_period: or_period.trim().to_string(),
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            total_sub_groups: 0,
            total_members: 0,
            is_active: true,
            audit: AuditFields::created_by(created_by),
        };

        group.validate()?;
        Ok(group)
    }

    pub fn soft_delete(&mut self, deleted_by: Uuid) {
        self.audit.remove(deleted_by);
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.audit.is_removed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_group() {
        let group = Group::new(
            "OR 21".to_string(),
            "Mentoring Mechanical".to_string(),
            Some("Mechanical division mentoring".to_string()),
            Uuid::new_v4(),
        );
        let group = group.unwrap();
        assert_eq!(group.total_sub_groups, 0);
        assert!(group.is_active);
    }

    #[test]
    fn test_soft_delete_group() {
        let mut group = Group::new("OR 21".to_string(), "Electrical".to_string(), None, Uuid::new_v4()).unwrap();
        group.soft_delete(Uuid::new_v4());
        assert!(group.is_deleted());
        assert!(!group.is_active);
    }
}
