use std::sync::Arc;

use sqlx::PgPool;

use robo_core::services::{
    AttendanceService, GroupService, LogbookService, MemberService, SubGroupService, TaskService,
};
use robo_security::JwtService;

/// Shared handler state; services are wired by the server binary.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt: Arc<JwtService>,
    pub members: Arc<MemberService>,
    pub attendance: Arc<AttendanceService>,
    pub groups: Arc<GroupService>,
    pub sub_groups: Arc<SubGroupService>,
    pub tasks: Arc<TaskService>,
    pub logbooks: Arc<LogbookService>,
}
