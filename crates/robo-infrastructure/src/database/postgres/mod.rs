//! PostgreSQL repository implementations

pub mod member_repo_impl;
pub mod attendance_repo_impl;
pub mod group_repo_impl;
pub mod sub_group_repo_impl;
pub mod task_repo_impl;
pub mod logbook_repo_impl;

pub use member_repo_impl::PgMemberRepository;
pub use attendance_repo_impl::{PgActivityRepository, PgAttendanceRepository};
pub use group_repo_impl::PgGroupRepository;
pub use sub_group_repo_impl::PgSubGroupRepository;
pub use task_repo_impl::PgTaskRepository;
pub use logbook_repo_impl::PgLogbookRepository;
