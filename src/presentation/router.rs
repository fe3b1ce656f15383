// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_session, health_check, input_unit_count, latest_frame, login, reset_session,
    set_override, stream_dashboard, submit_unit_count, toggle_theme,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/session", get(get_session))
        .route("/session/login", post(login))
        .route(
            "/session/unit-count",
            put(input_unit_count).post(submit_unit_count),
        )
        .route("/session/theme", post(toggle_theme))
        .route("/session/reset", post(reset_session))
        .route("/dashboard/overrides/:field", put(set_override))
        .route("/dashboard/frame", get(latest_frame))
        .route("/dashboard/stream", get(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
