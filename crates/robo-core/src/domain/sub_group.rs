// ============================================================================
// Robo Core - Sub-Group Entity
// File: crates/robo-core/src/domain/sub_group.rs
// Description: Sub-group of caang under a parent group, with member snapshots
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use robo_shared::constants::{LOW_ATTENDANCE_THRESHOLD, SUB_GROUP_NAME_PREFIX};

use crate::domain::EligibleMember;
use crate::error::DomainError;

/// Copy of a member's details taken when they joined the sub-group.
/// Never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub member_id: Uuid,
    pub full_name: String,
    pub nim: String,
    pub attendance_percentage: f64,
    pub is_low_attendance: bool,
}

impl From<&EligibleMember> for MemberSnapshot {
    fn from(member: &EligibleMember) -> Self {
        Self {
            member_id: member.id,
            full_name: member.full_name.clone(),
            nim: member.nim.clone(),
            attendance_percentage: member.attendance_percentage,
            is_low_attendance: member.attendance_percentage < LOW_ATTENDANCE_THRESHOLD,
        }
    }
}

/// Sub-group entity. `member_ids` and `members` list the same members in
/// the same order; `leader_id` is always one of `member_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubGroup {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub name: String,
    /// Zero-based bucket index; "Group N" has position N - 1.
    pub position: i32,
    pub or_period: String,
    pub member_ids: Vec<Uuid>,
    pub leader_id: Option<Uuid>,
    pub members: Vec<MemberSnapshot>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl SubGroup {
    /// Sub-group number `index + 1` with the given members; the first
    /// member becomes the leader.
    pub fn with_members(
        parent_id: Uuid,
        or_period: &str,
        index: usize,
        members: Vec<MemberSnapshot>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            parent_id,
            name: Self::numbered_name(index),
            position: index as i32,
            or_period: or_period.to_string(),
            member_ids: members.iter().map(|m| m.member_id).collect(),
            leader_id: members.first().map(|m| m.member_id),
            members,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: Some(created_by),
            modified_by: None,
            removed_at: None,
            removed_by: None,
        }
    }

    pub fn empty(parent_id: Uuid, or_period: &str, index: usize, created_by: Uuid) -> Self {
        Self::with_members(parent_id, or_period, index, Vec::new(), created_by)
    }

    pub fn numbered_name(index: usize) -> String {
        format!("{} {}", SUB_GROUP_NAME_PREFIX, index + 1)
    }

    pub fn contains(&self, member_id: &Uuid) -> bool {
        self.member_ids.contains(member_id)
    }

    pub fn add_member(&mut self, snapshot: MemberSnapshot, actor: Uuid) -> Result<(), DomainError> {
        if self.contains(&snapshot.member_id) {
            return Err(DomainError::MemberAlreadyAssigned {
                member_id: snapshot.member_id,
                sub_group_id: self.id,
            });
        }
        self.member_ids.push(snapshot.member_id);
        self.members.push(snapshot);
        self.touch(actor);
        Ok(())
    }

    /// Removing the leader leaves the sub-group without one.
    pub fn remove_member(&mut self, member_id: &Uuid, actor: Uuid) -> Result<(), DomainError> {
        if !self.contains(member_id) {
            return Err(DomainError::MemberNotInSubGroup {
                member_id: *member_id,
                sub_group_id: self.id,
            });
        }
        self.member_ids.retain(|id| id != member_id);
        self.members.retain(|m| m.member_id != *member_id);
        if self.leader_id.as_ref() == Some(member_id) {
            self.leader_id = None;
        }
        self.touch(actor);
        Ok(())
    }

    pub fn set_leader(&mut self, leader_id: Option<Uuid>, actor: Uuid) -> Result<(), DomainError> {
        if let Some(id) = leader_id {
            if !self.contains(&id) {
                return Err(DomainError::MemberNotInSubGroup {
                    member_id: id,
                    sub_group_id: self.id,
                });
            }
        }
        self.leader_id = leader_id;
        self.touch(actor);
        Ok(())
    }

    pub fn soft_delete(&mut self, deleted_by: Uuid) {
        let now = Utc::now();
        self.removed_at = Some(now);
        self.removed_by = Some(deleted_by);
        self.is_active = false;
        self.updated_at = now;
        self.modified_by = Some(deleted_by);
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    fn touch(&mut self, actor: Uuid) {
        self.updated_at = Utc::now();
        self.modified_by = Some(actor);
    }
}
