// ============================================================================
// Robo Core - Sub-Group Service
// File: crates/robo-core/src/services/sub_group_service.rs
// ============================================================================
//! Sub-group generation and manual sub-group editing

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{ActingUser, Group, MemberSnapshot, SubGroup};
use crate::engine::GroupAssignmentEngine;
use crate::error::DomainError;
use crate::repositories::{GroupRepository, SubGroupRepository};
use crate::services::AttendanceService;

pub struct SubGroupService {
    groups: Arc<dyn GroupRepository>,
    sub_groups: Arc<dyn SubGroupRepository>,
    attendance: Arc<AttendanceService>,
}

impl SubGroupService {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        sub_groups: Arc<dyn SubGroupRepository>,
        attendance: Arc<AttendanceService>,
    ) -> Self {
        Self {
            groups,
            sub_groups,
            attendance,
        }
    }

    /// Distribute the parent's eligible caang into `group_count` sub-groups by
    /// attendance, replacing the parent's current sub-groups in one write.
    pub async fn generate(
        &self,
        parent_id: &Uuid,
        group_count: i64,
        actor: &ActingUser,
    ) -> Result<Vec<SubGroup>, DomainError> {
        actor.require_admin("Generating sub-groups")?;
        GroupAssignmentEngine::validate_group_count(group_count)?;

        let parent = self.active_parent(parent_id).await?;
        let roster = self.attendance.ranked_roster(&parent.or_period).await?;
        info!(
            "Generating {} sub-groups for group {} from {} eligible members",
            group_count,
            parent.id,
            roster.len()
        );

        let sub_groups =
            GroupAssignmentEngine::generate(parent.id, &parent.or_period, &roster, group_count, actor.user_id)?;
        let saved = self.sub_groups.replace_all(&parent.id, &sub_groups, &actor.user_id).await?;

        info!("Generated {} sub-groups for group {}", saved.len(), parent.id);
        Ok(saved)
    }

    /// Create `group_count` empty sub-groups for manual assignment.
    pub async fn create_empty(
        &self,
        parent_id: &Uuid,
        group_count: i64,
        actor: &ActingUser,
    ) -> Result<Vec<SubGroup>, DomainError> {
        actor.require_admin("Creating sub-groups")?;
        GroupAssignmentEngine::validate_group_count(group_count)?;

        let parent = self.active_parent(parent_id).await?;
        let sub_groups = GroupAssignmentEngine::create_empty(parent.id, &parent.or_period, group_count, actor.user_id)?;
        let saved = self.sub_groups.replace_all(&parent.id, &sub_groups, &actor.user_id).await?;

        info!("Created {} empty sub-groups for group {}", saved.len(), parent.id);
        Ok(saved)
    }

    pub async fn list(&self, parent_id: &Uuid) -> Result<Vec<SubGroup>, DomainError> {
        let parent = self.parent(parent_id).await?;
        self.sub_groups.list_by_parent(&parent.id).await
    }

    pub async fn get(&self, id: &Uuid) -> Result<SubGroup, DomainError> {
        self.sub_groups
            .find_by_id(id)
            .await?
            .filter(|s| !s.is_deleted())
            .ok_or(DomainError::SubGroupNotFound(*id))
    }

    /// Add an eligible member, snapshotting their attendance as of now. A
    /// member may belong to only one sub-group per parent.
    pub async fn add_member(
        &self,
        sub_group_id: &Uuid,
        member_id: &Uuid,
        actor: &ActingUser,
    ) -> Result<SubGroup, DomainError> {
        actor.require_staff("Editing sub-groups")?;

        let mut sub_group = self.get(sub_group_id).await?;
        let parent = self.active_parent(&sub_group.parent_id).await?;

        let siblings = self.sub_groups.list_by_parent(&parent.id).await?;
        if let Some(holder) = siblings.iter().find(|s| s.contains(member_id)) {
            warn!("Member {} already in sub-group {}", member_id, holder.id);
            return Err(DomainError::MemberAlreadyAssigned {
                member_id: *member_id,
                sub_group_id: holder.id,
            });
        }

        let member = self.attendance.eligible_member(member_id, &parent.or_period).await?;
        sub_group.add_member(MemberSnapshot::from(&member), actor.user_id)?;

        let saved = self.sub_groups.update(&sub_group).await?;
        info!("Added member {} to sub-group {}", member_id, sub_group_id);
        Ok(saved)
    }

    pub async fn remove_member(
        &self,
        sub_group_id: &Uuid,
        member_id: &Uuid,
        actor: &ActingUser,
    ) -> Result<SubGroup, DomainError> {
        actor.require_staff("Editing sub-groups")?;

        let mut sub_group = self.get(sub_group_id).await?;
        sub_group.remove_member(member_id, actor.user_id)?;

        let saved = self.sub_groups.update(&sub_group).await?;
        info!("Removed member {} from sub-group {}", member_id, sub_group_id);
        Ok(saved)
    }

    /// Reassign (or clear) the leader; the leader must be a member.
    pub async fn set_leader(
        &self,
        sub_group_id: &Uuid,
        leader_id: Option<Uuid>,
        actor: &ActingUser,
    ) -> Result<SubGroup, DomainError> {
        actor.require_staff("Editing sub-groups")?;

        let mut sub_group = self.get(sub_group_id).await?;
        sub_group.set_leader(leader_id, actor.user_id)?;

        self.sub_groups.update(&sub_group).await
    }

    pub async fn delete(&self, sub_group_id: &Uuid, actor: &ActingUser) -> Result<(), DomainError> {
        actor.require_admin("Deleting sub-groups")?;

        let mut sub_group = self.get(sub_group_id).await?;
        sub_group.soft_delete(actor.user_id);
        self.sub_groups.update(&sub_group).await?;

        info!("Deleted sub-group {}", sub_group_id);
        Ok(())
    }

    async fn parent(&self, parent_id: &Uuid) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(parent_id)
            .await?
            .filter(|g| !g.is_deleted())
            .ok_or(DomainError::GroupNotFound(*parent_id))
    }

    async fn active_parent(&self, parent_id: &Uuid) -> Result<Group, DomainError> {
        let parent = self.parent(parent_id).await?;
        if !parent.is_active {
            return Err(DomainError::GroupNotActive(parent.id));
        }
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::{Activity, AttendanceRecord, AttendanceStatus, EligibleMember, Member, MemberRole};
    use crate::repositories::{
        MockActivityRepository, MockAttendanceRepository, MockGroupRepository, MockMemberRepository,
        MockSubGroupRepository,
    };

    fn admin() -> ActingUser {
        ActingUser::new(Uuid::new_v4(), MemberRole::Admin)
    }

    fn parent() -> Group {
        Group::new("OR 21".into(), "Mentoring".into(), None, Uuid::new_v4()).unwrap()
    }

    fn caang(i: usize) -> Member {
        Member::new(
            format!("Caang {:02}", i),
            format!("13012100{:02}", i),
            format!("caang{}@robotik.ac.id", i),
            MemberRole::Caang,
            "OR 21".into(),
            None,
        )
        .unwrap()
    }

    fn groups_returning(group: Group) -> MockGroupRepository {
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(group.clone())));
        groups
    }

    fn attendance_service(
        roster: Vec<Member>,
        activities: Vec<Activity>,
        records: Vec<AttendanceRecord>,
    ) -> Arc<AttendanceService> {
        let mut members = MockMemberRepository::new();
        let by_id = roster.clone();
        members.expect_list_eligible().returning(move |_| Ok(roster.clone()));
        members
            .expect_find_by_id()
            .returning(move |id| Ok(by_id.iter().find(|m| m.id == *id).cloned()));

        let mut activity_repo = MockActivityRepository::new();
        activity_repo.expect_list_by_period().returning(move |_| Ok(activities.clone()));

        let mut attendance = MockAttendanceRepository::new();
        let member_records = records.clone();
        attendance.expect_list_by_period().returning(move |_| Ok(records.clone()));
        attendance.expect_list_by_member().returning(move |id| {
            Ok(member_records.iter().filter(|r| r.member_id == *id).cloned().collect())
        });

        Arc::new(AttendanceService::new(
            Arc::new(members),
            Arc::new(activity_repo),
            Arc::new(attendance),
        ))
    }

    fn snapshot(member: &Member, pct: f64) -> MemberSnapshot {
        MemberSnapshot::from(&EligibleMember::new(member, pct))
    }

    #[tokio::test]
    async fn test_generate_ranks_and_persists_once() {
        let parent = parent();
        let parent_id = parent.id;
        let roster: Vec<Member> = (0..4).map(caang).collect();
        let activities: Vec<Activity> = (0..4)
            .map(|i| Activity::new("OR 21".into(), format!("Week {}", i), None, Utc::now(), Uuid::new_v4()).unwrap())
            .collect();
        // caang 3 attends everything, caang 2 three times, the rest never
        let mut records = Vec::new();
        for activity in &activities {
            records.push(AttendanceRecord::new(activity.id, roster[3].id, AttendanceStatus::Present, None, None));
        }
        for activity in activities.iter().take(3) {
            records.push(AttendanceRecord::new(activity.id, roster[2].id, AttendanceStatus::Present, None, None));
        }

        let mut sub_groups = MockSubGroupRepository::new();
        sub_groups
            .expect_replace_all()
            .withf(move |id, groups, _| *id == parent_id && groups.len() == 2)
            .times(1)
            .returning(|_, groups, _| Ok(groups.to_vec()));

        let service = SubGroupService::new(
            Arc::new(groups_returning(parent)),
            Arc::new(sub_groups),
            attendance_service(roster.clone(), activities, records),
        );
        let generated = service.generate(&parent_id, 2, &admin()).await.unwrap();

        assert_eq!(generated[0].leader_id, Some(roster[3].id));
        assert_eq!(generated[1].leader_id, Some(roster[2].id));
        // zero-attendance ties keep roster order
        assert_eq!(generated[0].member_ids, vec![roster[3].id, roster[0].id]);
        assert_eq!(generated[1].member_ids, vec![roster[2].id, roster[1].id]);
        assert_eq!(generated[1].members[0].attendance_percentage, 75.0);
        assert!(generated[0].members[1].is_low_attendance);
    }

    #[tokio::test]
    async fn test_generate_with_empty_roster_writes_nothing() {
        let parent = parent();
        let parent_id = parent.id;
        let mut sub_groups = MockSubGroupRepository::new();
        sub_groups.expect_replace_all().never();

        let service = SubGroupService::new(
            Arc::new(groups_returning(parent)),
            Arc::new(sub_groups),
            attendance_service(Vec::new(), Vec::new(), Vec::new()),
        );
        let result = service.generate(&parent_id, 5, &admin()).await;
        assert_eq!(result.unwrap_err(), DomainError::NoEligibleMembers);
    }

    #[tokio::test]
    async fn test_generate_zero_groups_rejected_before_lookup() {
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().never();
        let mut sub_groups = MockSubGroupRepository::new();
        sub_groups.expect_replace_all().never();

        let service = SubGroupService::new(
            Arc::new(groups),
            Arc::new(sub_groups),
            attendance_service(Vec::new(), Vec::new(), Vec::new()),
        );
        let result = service.generate(&Uuid::new_v4(), 0, &admin()).await;
        assert_eq!(result.unwrap_err(), DomainError::InvalidGroupCount(0));
    }

    #[tokio::test]
    async fn test_generate_requires_admin() {
        let service = SubGroupService::new(
            Arc::new(MockGroupRepository::new()),
            Arc::new(MockSubGroupRepository::new()),
            attendance_service(Vec::new(), Vec::new(), Vec::new()),
        );
        let mentor = ActingUser::new(Uuid::new_v4(), MemberRole::Mentor);
        assert!(matches!(
            service.generate(&Uuid::new_v4(), 3, &mentor).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_on_inactive_parent() {
        let mut parent = parent();
        parent.is_active = false;
        let parent_id = parent.id;

        let service = SubGroupService::new(
            Arc::new(groups_returning(parent)),
            Arc::new(MockSubGroupRepository::new()),
            attendance_service(vec![caang(1)], Vec::new(), Vec::new()),
        );
        assert_eq!(
            service.generate(&parent_id, 2, &admin()).await.unwrap_err(),
            DomainError::GroupNotActive(parent_id)
        );
    }

    #[tokio::test]
    async fn test_create_empty_sub_groups() {
        let parent = parent();
        let parent_id = parent.id;
        let mut sub_groups = MockSubGroupRepository::new();
        sub_groups
            .expect_replace_all()
            .times(1)
            .returning(|_, groups, _| Ok(groups.to_vec()));

        let service = SubGroupService::new(
            Arc::new(groups_returning(parent)),
            Arc::new(sub_groups),
            attendance_service(Vec::new(), Vec::new(), Vec::new()),
        );
        let created = service.create_empty(&parent_id, 3, &admin()).await.unwrap();
        assert_eq!(created.len(), 3);
        assert!(created.iter().all(|g| g.member_ids.is_empty() && g.leader_id.is_none()));
    }

    #[tokio::test]
    async fn test_add_member_rejects_member_of_sibling() {
        let parent = parent();
        let member = caang(7);
        let member_id = member.id;
        let actor = admin();

        let target = SubGroup::empty(parent.id, "OR 21", 0, actor.user_id);
        let target_id = target.id;
        let sibling = SubGroup::with_members(parent.id, "OR 21", 1, vec![snapshot(&member, 50.0)], actor.user_id);
        let sibling_id = sibling.id;

        let mut sub_groups = MockSubGroupRepository::new();
        let found = target.clone();
        sub_groups.expect_find_by_id().returning(move |_| Ok(Some(found.clone())));
        let all = vec![target, sibling];
        sub_groups.expect_list_by_parent().returning(move |_| Ok(all.clone()));
        sub_groups.expect_update().never();

        let service = SubGroupService::new(
            Arc::new(groups_returning(parent)),
            Arc::new(sub_groups),
            attendance_service(vec![member], Vec::new(), Vec::new()),
        );
        let result = service.add_member(&target_id, &member_id, &actor).await;
        assert_eq!(
            result.unwrap_err(),
            DomainError::MemberAlreadyAssigned {
                member_id,
                sub_group_id: sibling_id,
            }
        );
    }

    #[tokio::test]
    async fn test_add_member_snapshots_current_attendance() {
        let parent = parent();
        let member = caang(8);
        let member_id = member.id;
        let activity = Activity::new("OR 21".into(), "Week 1".into(), None, Utc::now(), Uuid::new_v4()).unwrap();
        let records = vec![AttendanceRecord::new(activity.id, member_id, AttendanceStatus::Late, None, None)];
        let actor = admin();

        let target = SubGroup::empty(parent.id, "OR 21", 0, actor.user_id);
        let target_id = target.id;

        let mut sub_groups = MockSubGroupRepository::new();
        let found = target.clone();
        sub_groups.expect_find_by_id().returning(move |_| Ok(Some(found.clone())));
        sub_groups.expect_list_by_parent().returning(move |_| Ok(vec![target.clone()]));
        sub_groups
            .expect_update()
            .times(1)
            .returning(|s| Ok(s.clone()));

        let service = SubGroupService::new(
            Arc::new(groups_returning(parent)),
            Arc::new(sub_groups),
            attendance_service(vec![member], vec![activity], records),
        );
        let updated = service.add_member(&target_id, &member_id, &actor).await.unwrap();

        assert_eq!(updated.member_ids, vec![member_id]);
        assert_eq!(updated.members[0].attendance_percentage, 75.0);
        assert_eq!(updated.modified_by, Some(actor.user_id));
    }

    #[tokio::test]
    async fn test_set_leader_outside_members_rejected() {
        let actor = admin();
        let sub_group = SubGroup::empty(Uuid::new_v4(), "OR 21", 0, actor.user_id);
        let sub_group_id = sub_group.id;

        let mut sub_groups = MockSubGroupRepository::new();
        sub_groups.expect_find_by_id().returning(move |_| Ok(Some(sub_group.clone())));
        sub_groups.expect_update().never();

        let service = SubGroupService::new(
            Arc::new(MockGroupRepository::new()),
            Arc::new(sub_groups),
            attendance_service(Vec::new(), Vec::new(), Vec::new()),
        );
        let result = service.set_leader(&sub_group_id, Some(Uuid::new_v4()), &actor).await;
        assert!(matches!(result, Err(DomainError::MemberNotInSubGroup { .. })));
    }

    #[tokio::test]
    async fn test_delete_soft_deletes() {
        let actor = admin();
        let sub_group = SubGroup::empty(Uuid::new_v4(), "OR 21", 0, actor.user_id);
        let sub_group_id = sub_group.id;

        let mut sub_groups = MockSubGroupRepository::new();
        sub_groups.expect_find_by_id().returning(move |_| Ok(Some(sub_group.clone())));
        sub_groups
            .expect_update()
            .withf(|s| s.is_deleted() && !s.is_active)
            .times(1)
            .returning(|s| Ok(s.clone()));

        let service = SubGroupService::new(
            Arc::new(MockGroupRepository::new()),
            Arc::new(sub_groups),
            attendance_service(Vec::new(), Vec::new(), Vec::new()),
        );
        service.delete(&sub_group_id, &actor).await.unwrap();
    }
}
