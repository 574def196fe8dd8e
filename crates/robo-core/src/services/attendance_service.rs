// ============================================================================
// Robo Core - Attendance Service
// File: crates/robo-core/src/services/attendance_service.rs
// ============================================================================
//! Activities, attendance recording and attendance statistics

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    ActingUser, Activity, AttendanceRecord, AttendanceStatus, AttendanceSummary, EligibleMember, Member,
};
use crate::engine::AttendanceCalculator;
use crate::error::DomainError;
use crate::repositories::{ActivityRepository, AttendanceRepository, MemberRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub or_period: String,
    pub title: String,
    pub description: Option<String>,
    pub held_at: DateTime<Utc>,
}

/// One row of the period attendance report
#[derive(Debug, Clone, Serialize)]
pub struct MemberAttendance {
    pub member_id: Uuid,
    pub full_name: String,
    pub nim: String,
    pub summary: AttendanceSummary,
}

pub struct AttendanceService {
    members: Arc<dyn MemberRepository>,
    activities: Arc<dyn ActivityRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl AttendanceService {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        activities: Arc<dyn ActivityRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            members,
            activities,
            attendance,
        }
    }

    pub async fn create_activity(&self, input: NewActivity, actor: &ActingUser) -> Result<Activity, DomainError> {
        actor.require_staff("Creating activities")?;

        let activity = Activity::new(input.or_period, input.title, input.description, input.held_at, actor.user_id)?;
        let created = self.activities.create(&activity).await?;

        info!("Created activity {} for {}", created.id, created.or_period);
        Ok(created)
    }

    pub async fn list_activities(&self, or_period: &str) -> Result<Vec<Activity>, DomainError> {
        self.activities.list_by_period(or_period).await
    }

    /// Record (or overwrite) one member's attendance at an activity
    pub async fn record_attendance(
        &self,
        activity_id: &Uuid,
        member_id: &Uuid,
        status: AttendanceStatus,
        note: Option<String>,
        actor: &ActingUser,
    ) -> Result<AttendanceRecord, DomainError> {
        actor.require_staff("Recording attendance")?;

        let activity = self
            .activities
            .find_by_id(activity_id)
            .await?
            .ok_or(DomainError::ActivityNotFound(*activity_id))?;
        let member = self.find_member(member_id).await?;
        if !member.is_eligible_in(&activity.or_period) {
            return Err(DomainError::MemberNotEligible(*member_id));
        }

        let record = AttendanceRecord::new(activity.id, member.id, status, note, Some(actor.user_id));
        let saved = self.attendance.upsert(&record).await?;

        debug!("Recorded {} for member {} at activity {}", status.as_str(), member_id, activity_id);
        Ok(saved)
    }

    pub async fn member_summary(&self, member_id: &Uuid) -> Result<AttendanceSummary, DomainError> {
        let member = self.find_member(member_id).await?;
        let activities = self.activities.list_by_period(&member.or_period).await?;
        let records = self.attendance.list_by_member(member_id).await?;

        Ok(AttendanceCalculator::summarize(member_id, &activities, &records))
    }

    /// Summaries for every eligible member, highest attendance first.
    pub async fn period_report(&self, or_period: &str) -> Result<Vec<MemberAttendance>, DomainError> {
        let roster = self.members.list_eligible(or_period).await?;
        let activities = self.activities.list_by_period(or_period).await?;
        let records = self.attendance.list_by_period(or_period).await?;

        let mut report: Vec<MemberAttendance> = roster
            .into_iter()
            .map(|member| MemberAttendance {
                summary: AttendanceCalculator::summarize(&member.id, &activities, &records),
                member_id: member.id,
                full_name: member.full_name,
                nim: member.nim,
            })
            .collect();
        report.sort_by(|a, b| {
            b.summary
                .attendance_percentage
                .total_cmp(&a.summary.attendance_percentage)
        });

        Ok(report)
    }

    /// Eligible roster of the period annotated with attendance, in roster order.
    pub async fn ranked_roster(&self, or_period: &str) -> Result<Vec<EligibleMember>, DomainError> {
        let roster = self.members.list_eligible(or_period).await?;
        let activities = self.activities.list_by_period(or_period).await?;
        let records = self.attendance.list_by_period(or_period).await?;

        Ok(AttendanceCalculator::rank_roster(&roster, &activities, &records))
    }

    /// A single member annotated with current attendance; fails unless the
    /// member is eligible in `or_period`.
    pub async fn eligible_member(&self, member_id: &Uuid, or_period: &str) -> Result<EligibleMember, DomainError> {
        let member = self.find_member(member_id).await?;
        if !member.is_eligible_in(or_period) {
            return Err(DomainError::MemberNotEligible(*member_id));
        }

        let activities = self.activities.list_by_period(or_period).await?;
        let records = self.attendance.list_by_member(member_id).await?;
        let percentage = AttendanceCalculator::compute_attendance(member_id, &activities, &records);

        Ok(EligibleMember::new(&member, percentage))
    }

    async fn find_member(&self, member_id: &Uuid) -> Result<Member, DomainError> {
        self.members
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(*member_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberRole;
    use crate::repositories::{MockActivityRepository, MockAttendanceRepository, MockMemberRepository};

    fn caang(name: &str, nim: &str) -> Member {
        Member::new(
            name.into(),
            nim.into(),
            format!("{}@robotik.ac.id", nim),
            MemberRole::Caang,
            "OR 21".into(),
            None,
        )
        .unwrap()
    }

    fn activity() -> Activity {
        Activity::new("OR 21".into(), "Soldering basics".into(), None, Utc::now(), Uuid::new_v4()).unwrap()
    }

    fn mentor() -> ActingUser {
        ActingUser::new(Uuid::new_v4(), MemberRole::Mentor)
    }

    #[tokio::test]
    async fn test_period_report_sorted_and_highlighted() {
        let low = caang("Agus", "1301210001");
        let high = caang("Bella", "1301210002");
        let acts = vec![activity(), activity()];
        let records = vec![
            AttendanceRecord::new(acts[0].id, high.id, AttendanceStatus::Present, None, None),
            AttendanceRecord::new(acts[1].id, high.id, AttendanceStatus::Late, None, None),
        ];

        let mut members = MockMemberRepository::new();
        let roster = vec![low.clone(), high.clone()];
        members.expect_list_eligible().returning(move |_| Ok(roster.clone()));
        let mut activities = MockActivityRepository::new();
        activities.expect_list_by_period().returning(move |_| Ok(acts.clone()));
        let mut attendance = MockAttendanceRepository::new();
        attendance.expect_list_by_period().returning(move |_| Ok(records.clone()));

        let service = AttendanceService::new(Arc::new(members), Arc::new(activities), Arc::new(attendance));
        let report = service.period_report("OR 21").await.unwrap();

        assert_eq!(report[0].member_id, high.id);
        assert_eq!(report[0].summary.attendance_percentage, 87.5);
        assert_eq!(report[1].member_id, low.id);
        assert!(report[1].summary.is_low_attendance);
    }

    #[tokio::test]
    async fn test_record_attendance_rejects_other_period() {
        let act = activity();
        let act_id = act.id;
        let mut outsider = caang("Citra", "1301220003");
        outsider.or_period = "OR 22".into();
        let outsider_id = outsider.id;

        let mut members = MockMemberRepository::new();
        members.expect_find_by_id().returning(move |_| Ok(Some(outsider.clone())));
        let mut activities = MockActivityRepository::new();
        activities.expect_find_by_id().returning(move |_| Ok(Some(act.clone())));
        let mut attendance = MockAttendanceRepository::new();
        attendance.expect_upsert().never();

        let service = AttendanceService::new(Arc::new(members), Arc::new(activities), Arc::new(attendance));
        let result = service
            .record_attendance(&act_id, &outsider_id, AttendanceStatus::Present, None, &mentor())
            .await;
        assert_eq!(result.unwrap_err(), DomainError::MemberNotEligible(outsider_id));
    }

    #[tokio::test]
    async fn test_record_attendance_upserts() {
        let act = activity();
        let act_id = act.id;
        let member = caang("Dewi", "1301210004");
        let member_id = member.id;

        let mut members = MockMemberRepository::new();
        members.expect_find_by_id().returning(move |_| Ok(Some(member.clone())));
        let mut activities = MockActivityRepository::new();
        activities.expect_find_by_id().returning(move |_| Ok(Some(act.clone())));
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_upsert()
            .withf(move |r| r.member_id == member_id && r.status == AttendanceStatus::Late)
            .times(1)
            .returning(|r| Ok(r.clone()));

        let service = AttendanceService::new(Arc::new(members), Arc::new(activities), Arc::new(attendance));
        let actor = mentor();
        let record = service
            .record_attendance(&act_id, &member_id, AttendanceStatus::Late, Some("traffic".into()), &actor)
            .await
            .unwrap();
        assert_eq!(record.recorded_by, Some(actor.user_id));
    }

    #[tokio::test]
    async fn test_caang_cannot_record_attendance() {
        let service = AttendanceService::new(
            Arc::new(MockMemberRepository::new()),
            Arc::new(MockActivityRepository::new()),
            Arc::new(MockAttendanceRepository::new()),
        );
        let caang = ActingUser::new(Uuid::new_v4(), MemberRole::Caang);
        let result = service
            .record_attendance(&Uuid::new_v4(), &caang.user_id, AttendanceStatus::Present, None, &caang)
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }
}
