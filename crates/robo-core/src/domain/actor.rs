//! Explicit caller identity passed into every mutating service operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::MemberRole;
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingUser {
    pub user_id: Uuid,
    pub role: MemberRole,
}

impl ActingUser {
    pub fn new(user_id: Uuid, role: MemberRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, MemberRole::Admin | MemberRole::Mentor)
    }

    pub fn require_staff(&self, action: &str) -> Result<(), DomainError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!("{} requires admin or mentor role", action)))
        }
    }

    pub fn require_admin(&self, action: &str) -> Result<(), DomainError> {
        if self.role == MemberRole::Admin {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!("{} requires admin role", action)))
        }
    }

    /// Caang may only act on their own records; staff may act on anyone's.
    pub fn require_self_or_staff(&self, member_id: &Uuid, action: &str) -> Result<(), DomainError> {
        if self.is_staff() || self.user_id == *member_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!("{} is only allowed on your own records", action)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        let admin = ActingUser::new(Uuid::new_v4(), MemberRole::Admin);
        let mentor = ActingUser::new(Uuid::new_v4(), MemberRole::Mentor);
        let caang = ActingUser::new(Uuid::new_v4(), MemberRole::Caang);

        assert!(admin.require_admin("generate").is_ok());
        assert!(mentor.require_admin("generate").is_err());
        assert!(mentor.require_staff("grade").is_ok());
        assert!(matches!(caang.require_staff("grade"), Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn test_self_or_staff() {
        let caang = ActingUser::new(Uuid::new_v4(), MemberRole::Caang);
        assert!(caang.require_self_or_staff(&caang.user_id, "submit").is_ok());
        assert!(caang.require_self_or_staff(&Uuid::new_v4(), "submit").is_err());

        let mentor = ActingUser::new(Uuid::new_v4(), MemberRole::Mentor);
        assert!(mentor.require_self_or_staff(&Uuid::new_v4(), "submit").is_ok());
    }
}
