//! Repository traits (ports)

pub mod member_repository;
pub mod attendance_repository;
pub mod group_repository;
pub mod sub_group_repository;
pub mod task_repository;
pub mod logbook_repository;

pub use member_repository::MemberRepository;
pub use attendance_repository::{ActivityRepository, AttendanceRepository};
pub use group_repository::GroupRepository;
pub use sub_group_repository::SubGroupRepository;
pub use task_repository::TaskRepository;
pub use logbook_repository::LogbookRepository;

#[cfg(test)]
pub use member_repository::MockMemberRepository;
#[cfg(test)]
pub use attendance_repository::{MockActivityRepository, MockAttendanceRepository};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
#[cfg(test)]
pub use sub_group_repository::MockSubGroupRepository;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
#[cfg(test)]
pub use logbook_repository::MockLogbookRepository;
