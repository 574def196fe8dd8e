// ============================================================================
// Robo Core - Attendance Calculator
// File: crates/robo-core/src/engine/attendance.rs
// Description: Attendance percentage, absence statistics and points
// ============================================================================

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use robo_shared::constants::{LATE_ATTENDANCE_WEIGHT, LOW_ATTENDANCE_THRESHOLD, POINTS_PER_ATTENDED_ACTIVITY};
use robo_shared::utils::round2;

use crate::domain::{Activity, AttendanceRecord, AttendanceStatus, AttendanceSummary, EligibleMember, Member};

pub struct AttendanceCalculator;

impl AttendanceCalculator {
    /// Percentage of activities attended, late arrivals counting as 0.75.
    /// Zero when there are no activities.
    pub fn compute_attendance(member_id: &Uuid, activities: &[Activity], records: &[AttendanceRecord]) -> f64 {
        Self::summarize(member_id, activities, records).attendance_percentage
    }

    pub fn summarize(member_id: &Uuid, activities: &[Activity], records: &[AttendanceRecord]) -> AttendanceSummary {
        let statuses = Self::statuses_for(member_id, activities, records);
        let total = activities.len();

        let count = |status: AttendanceStatus| statuses.values().filter(|s| **s == status).count();
        let present = count(AttendanceStatus::Present);
        let late = count(AttendanceStatus::Late);
        let excused = count(AttendanceStatus::Excused);
        let sick = count(AttendanceStatus::Sick);
        let absent = count(AttendanceStatus::Absent);
        let unrecorded = total - statuses.len();

        let attended_weight = present as f64 + late as f64 * LATE_ATTENDANCE_WEIGHT;
        let (attendance_percentage, absence_percentage) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                round2(attended_weight / total as f64 * 100.0),
                round2((absent + unrecorded) as f64 / total as f64 * 100.0),
            )
        };

        AttendanceSummary {
            member_id: *member_id,
            total_activities: total,
            present,
            late,
            excused,
            sick,
            absent,
            unrecorded,
            attendance_percentage,
            absence_percentage,
            is_low_attendance: attendance_percentage < LOW_ATTENDANCE_THRESHOLD,
            points: round2(attended_weight * POINTS_PER_ATTENDED_ACTIVITY),
        }
    }

    /// Annotate a roster with attendance percentages, keeping roster order.
    pub fn rank_roster(members: &[Member], activities: &[Activity], records: &[AttendanceRecord]) -> Vec<EligibleMember> {
        members
            .iter()
            .map(|member| EligibleMember::new(member, Self::compute_attendance(&member.id, activities, records)))
            .collect()
    }

    /// One status per in-scope activity; a later record for the same
    /// activity replaces an earlier one.
    fn statuses_for(
        member_id: &Uuid,
        activities: &[Activity],
        records: &[AttendanceRecord],
    ) -> HashMap<Uuid, AttendanceStatus> {
        let in_scope: HashSet<Uuid> = activities.iter().map(|a| a.id).collect();

        records
            .iter()
            .filter(|r| r.member_id == *member_id && in_scope.contains(&r.activity_id))
            .map(|r| (r.activity_id, r.status))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::MemberRole;

    fn activities(n: usize) -> Vec<Activity> {
        (0..n)
            .map(|i| {
                Activity::new("OR 21".into(), format!("Meeting {}", i + 1), None, Utc::now(), Uuid::new_v4()).unwrap()
            })
            .collect()
    }

    fn record(activity: &Activity, member_id: Uuid, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord::new(activity.id, member_id, status, None, None)
    }

    #[test]
    fn test_present_and_late_weighting() {
        let member = Uuid::new_v4();
        let acts = activities(4);
        let records = vec![
            record(&acts[0], member, AttendanceStatus::Present),
            record(&acts[1], member, AttendanceStatus::Present),
            record(&acts[2], member, AttendanceStatus::Late),
        ];

        assert_eq!(AttendanceCalculator::compute_attendance(&member, &acts, &records), 68.75);

        let summary = AttendanceCalculator::summarize(&member, &acts, &records);
        assert_eq!(summary.unrecorded, 1);
        assert_eq!(summary.absence_percentage, 25.0);
        assert_eq!(summary.points, 27.5);
        assert!(!summary.is_low_attendance);
    }

    #[test]
    fn test_no_activities_yields_zero() {
        let member = Uuid::new_v4();
        let summary = AttendanceCalculator::summarize(&member, &[], &[]);
        assert_eq!(summary.attendance_percentage, 0.0);
        assert_eq!(summary.absence_percentage, 0.0);
        assert_eq!(summary.total_activities, 0);
        assert!(summary.is_low_attendance);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let member = Uuid::new_v4();
        let acts = activities(3);
        let records = vec![record(&acts[0], member, AttendanceStatus::Present)];
        assert_eq!(AttendanceCalculator::compute_attendance(&member, &acts, &records), 33.33);
    }

    #[test]
    fn test_ignores_other_members_and_out_of_scope_activities() {
        let member = Uuid::new_v4();
        let acts = activities(2);
        let other_period = activities(1);
        let records = vec![
            record(&acts[0], Uuid::new_v4(), AttendanceStatus::Present),
            record(&other_period[0], member, AttendanceStatus::Present),
            record(&acts[1], member, AttendanceStatus::Present),
        ];

        let summary = AttendanceCalculator::summarize(&member, &acts, &records);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.attendance_percentage, 50.0);
    }

    #[test]
    fn test_duplicate_records_count_once_last_wins() {
        let member = Uuid::new_v4();
        let acts = activities(1);
        let records = vec![
            record(&acts[0], member, AttendanceStatus::Absent),
            record(&acts[0], member, AttendanceStatus::Late),
        ];

        let summary = AttendanceCalculator::summarize(&member, &acts, &records);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.absent, 0);
        assert_eq!(summary.attendance_percentage, 75.0);
    }

    #[test]
    fn test_excused_and_sick_are_neither_attended_nor_absent() {
        let member = Uuid::new_v4();
        let acts = activities(4);
        let records = vec![
            record(&acts[0], member, AttendanceStatus::Excused),
            record(&acts[1], member, AttendanceStatus::Sick),
            record(&acts[2], member, AttendanceStatus::Absent),
        ];

        let summary = AttendanceCalculator::summarize(&member, &acts, &records);
        assert_eq!(summary.attendance_percentage, 0.0);
        assert_eq!(summary.absence_percentage, 50.0);
        assert_eq!(summary.excused + summary.sick, 2);
        assert!(summary.is_low_attendance);
    }

    #[test]
    fn test_rank_roster_keeps_roster_order() {
        let acts = activities(2);
        let members: Vec<Member> = ["1301210001", "1301210002"]
            .iter()
            .map(|nim| {
                Member::new(
                    "Budi Santoso".into(),
                    nim.to_string(),
                    format!("{}@robotik.ac.id", nim),
                    MemberRole::Caang,
                    "OR 21".into(),
                    None,
                )
                .unwrap()
            })
            .collect();
        let records = vec![
            record(&acts[0], members[1].id, AttendanceStatus::Present),
            record(&acts[1], members[1].id, AttendanceStatus::Present),
        ];

        let ranked = AttendanceCalculator::rank_roster(&members, &acts, &records);
        assert_eq!(ranked[0].id, members[0].id);
        assert_eq!(ranked[0].attendance_percentage, 0.0);
        assert_eq!(ranked[1].attendance_percentage, 100.0);
    }
}
