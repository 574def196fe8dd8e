// ============================================================================
// Robo Core - Attendance Entities
// File: crates/robo-core/src/domain/attendance.rs
// Description: Attendance records and the derived per-member summary
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attendance status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    /// Permitted absence (izin).
    Excused,
    Sick,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
            AttendanceStatus::Sick => "sick",
            AttendanceStatus::Absent => "absent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "late" => Some(AttendanceStatus::Late),
            "excused" => Some(AttendanceStatus::Excused),
            "sick" => Some(AttendanceStatus::Sick),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

/// Attendance record: one member at one activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub member_id: Uuid,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: Option<Uuid>,
}

impl AttendanceRecord {
    pub fn new(
        activity_id: Uuid,
        member_id: Uuid,
        status: AttendanceStatus,
        note: Option<String>,
        recorded_by: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_id,
            member_id,
            status,
            note: note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            recorded_at: Utc::now(),
            recorded_by,
        }
    }
}

/// Attendance statistics for one member over the activities of a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub member_id: Uuid,
    pub total_activities: usize,
    pub present: usize,
    pub late: usize,
    pub excused: usize,
    pub sick: usize,
    pub absent: usize,
    /// Activities in scope with no record for the member.
    pub unrecorded: usize,
    pub attendance_percentage: f64,
    pub absence_percentage: f64,
    pub is_low_attendance: bool,
    pub points: f64,
}
