//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Members below this attendance percentage are highlighted as low attendance.
pub const LOW_ATTENDANCE_THRESHOLD: f64 = 25.0;
/// Credit a late arrival earns relative to an on-time one.
pub const LATE_ATTENDANCE_WEIGHT: f64 = 0.75;
pub const POINTS_PER_ATTENDED_ACTIVITY: f64 = 10.0;

pub const MAX_SUB_GROUPS: usize = 100;
pub const SUB_GROUP_NAME_PREFIX: &str = "Group";

pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 900;
