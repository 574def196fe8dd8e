//! # Robo Core - Domain Module
//! 
//! Domain entities for the robotics club backend.

pub mod actor;
pub mod member;
pub mod activity;
pub mod attendance;
pub mod group;
pub mod sub_group;
pub mod task;
pub mod logbook;

// Re-export all entities and enums
pub use actor::ActingUser;
pub use member::{Member, MemberRole, EligibleMember};
pub use activity::Activity;
pub use attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
pub use group::Group;
pub use sub_group::{SubGroup, MemberSnapshot};
pub use task::{Task, TaskSubmission};
pub use logbook::{LogbookEntry, LogbookKind, LogbookStatus};
