//! Domain services (business logic)

pub mod member_service;
pub mod attendance_service;
pub mod group_service;
pub mod sub_group_service;
pub mod task_service;
pub mod logbook_service;

pub use member_service::{MemberService, RegisterMember};
pub use attendance_service::{AttendanceService, MemberAttendance, NewActivity};
pub use group_service::{GroupService, NewGroup};
pub use sub_group_service::SubGroupService;
pub use task_service::{NewTask, TaskService};
pub use logbook_service::{LogbookService, NewLogbookEntry};
