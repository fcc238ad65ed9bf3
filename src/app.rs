use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/status", get(handlers::get_status))
        .route("/api/events", post(handlers::log_event))
        .route("/api/history", get(handlers::get_history))
        .route("/api/analytics", get(handlers::get_analytics))
        .route("/api/timeline", get(handlers::get_timeline))
        .route(
            "/api/accidents",
            get(handlers::get_accidents).post(handlers::log_accident),
        )
        .with_state(state)
}
