//! Pure, in-memory computations: sub-group assignment and attendance statistics.

pub mod assignment;
pub mod attendance;

pub use assignment::{Bucket, GroupAssignmentEngine};
pub use attendance::AttendanceCalculator;
