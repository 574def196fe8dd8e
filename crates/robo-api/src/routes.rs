// ============================================================================
// Robo API - Router
// File: crates/robo-api/src/routes.rs
// ============================================================================

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::handlers::{attendance, groups, health, logbooks, members, sub_groups, tasks};
use crate::state::AppState;

pub fn build_router(state: AppState, frontend_origin: &str) -> Router {
    let api = Router::new()
        // Members
        .route("/members", post(members::register).get(members::list))
        .route("/members/{id}", get(members::get).delete(members::deactivate))
        .route("/members/{id}/attendance", get(members::attendance_summary))
        .route("/members/{id}/logbooks", get(logbooks::list))
        // Activities & attendance
        .route("/activities", post(attendance::create_activity).get(attendance::list_activities))
        .route("/activities/{id}/attendance", put(attendance::record_attendance))
        .route("/attendance/report", get(attendance::period_report))
        // Groups & sub-groups
        .route("/groups", post(groups::create).get(groups::list))
        .route("/groups/{id}", get(groups::get).delete(groups::delete))
        .route("/groups/{id}/sub-groups", post(sub_groups::create_empty).get(sub_groups::list))
        .route("/groups/{id}/sub-groups/generate", post(sub_groups::generate))
        .route("/sub-groups/{id}", get(sub_groups::get).delete(sub_groups::delete))
        .route("/sub-groups/{id}/members", post(sub_groups::add_member))
        .route("/sub-groups/{id}/members/{member_id}", axum::routing::delete(sub_groups::remove_member))
        .route("/sub-groups/{id}/leader", put(sub_groups::set_leader))
        // Tasks
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route("/tasks/{id}/submissions", post(tasks::submit).get(tasks::list_submissions))
        .route("/submissions/{id}/grade", put(tasks::grade))
        // Logbooks
        .route("/logbooks", post(logbooks::create))
        .route("/logbooks/{id}/review", put(logbooks::review));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors_layer(frontend_origin))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(frontend_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!("Invalid frontend origin {:?}, cross-origin requests disabled", frontend_origin);
            cors
        }
    }
}
