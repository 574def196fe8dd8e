use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use robo_api::{build_router, AppState};
use robo_core::services::{
    AttendanceService, GroupService, LogbookService, MemberService, SubGroupService, TaskService,
};
use robo_infrastructure::{
    create_pool, run_migrations, PgActivityRepository, PgAttendanceRepository, PgGroupRepository,
    PgLogbookRepository, PgMemberRepository, PgSubGroupRepository, PgTaskRepository,
};
use robo_security::JwtService;
use robo_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = robo_shared::telemetry::init_telemetry(&config.logging, &config.app.name)?;

    info!("{} starting ({})", config.app.name, config.app.env);
    if config.is_production() && config.jwt.secret.len() < 32 {
        warn!("JWT secret is shorter than 32 bytes");
    }

    // Connect to Database
    info!(
        "Connecting to database (max {} connections)...",
        config.database.max_connections
    );
    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await.context("Failed to run migrations")?;
    }

    // Repositories
    let member_repo = Arc::new(PgMemberRepository::new(pool.clone()));
    let group_repo = Arc::new(PgGroupRepository::new(pool.clone()));
    let sub_group_repo = Arc::new(PgSubGroupRepository::new(pool.clone()));
    let activity_repo = Arc::new(PgActivityRepository::new(pool.clone()));
    let attendance_repo = Arc::new(PgAttendanceRepository::new(pool.clone()));
    let task_repo = Arc::new(PgTaskRepository::new(pool.clone()));
    let logbook_repo = Arc::new(PgLogbookRepository::new(pool.clone()));

    // Services
    let attendance = Arc::new(AttendanceService::new(
        member_repo.clone(),
        activity_repo,
        attendance_repo,
    ));

    let state = AppState {
        db: pool,
        jwt: Arc::new(JwtService::new(
            config.jwt.secret.clone(),
            config.jwt.access_token_expiry,
        )),
        members: Arc::new(MemberService::new(member_repo.clone())),
        attendance: attendance.clone(),
        groups: Arc::new(GroupService::new(group_repo.clone())),
        sub_groups: Arc::new(SubGroupService::new(group_repo, sub_group_repo, attendance)),
        tasks: Arc::new(TaskService::new(task_repo, member_repo.clone())),
        logbooks: Arc::new(LogbookService::new(logbook_repo, member_repo)),
    };

    let app = build_router(state, &config.app.frontend_origin);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
