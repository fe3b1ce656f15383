// HTTP request handlers
use crate::application::console_session::{SessionError, SessionView};
use crate::domain::telemetry::{OverrideField, OverrideInputs};
use crate::infrastructure::chunked_frames::stream_from_subscription;
use crate::infrastructure::frame_mapper::frame_to_dto;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct TextInput {
    #[serde(default)]
    pub value: String,
}

/// Error body shown next to the form that raised it
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::WrongScreen { .. } => StatusCode::CONFLICT,
            SessionError::Auth(_) | SessionError::Selection(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.session.lock().await.view())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    session.login(&request.username, &request.password)?;
    Ok(Json(session.view()))
}

/// Keystroke in the unit-count field
pub async fn input_unit_count(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    session.input_unit_count(&input.value)?;
    Ok(Json(session.view()))
}

/// Submits the pending count, or the count in the body when one is sent
pub async fn submit_unit_count(
    State(state): State<Arc<AppState>>,
    input: Option<Json<TextInput>>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    match input {
        Some(Json(input)) => session.select_unit_count(&input.value)?,
        None => session.submit_unit_count()?,
    };
    Ok(Json(session.view()))
}

pub async fn toggle_theme(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.toggle_dark_mode();
    Json(session.view())
}

pub async fn reset_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(session.view())
}

pub async fn set_override(
    Path(field): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> Result<Json<OverrideInputs>, ApiError> {
    let field = field
        .parse::<OverrideField>()
        .map_err(|e| ApiError::new(StatusCode::NOT_FOUND, e.to_string()))?;

    let session = state.session.lock().await;
    session.set_override(field, &input.value)?;
    let overrides = session
        .engine()
        .map(|engine| engine.overrides())
        .unwrap_or_default();
    Ok(Json(overrides))
}

/// Latest frame of the running dashboard
pub async fn latest_frame(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let frame = {
        let session = state.session.lock().await;
        let engine = session.engine().ok_or_else(not_on_dashboard)?;
        engine.frame()
    };

    let dto = frame_to_dto(&frame);
    Ok(json_response(&dto, accepts_brotli(&headers))
        .await
        .unwrap_or_else(|status| status.into_response()))
}

/// Stream frames of the running dashboard until it is torn down
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let subscription = {
        let session = state.session.lock().await;
        let engine = session.engine().ok_or_else(not_on_dashboard)?;
        engine.subscribe()
    };

    let compress = state.stream_compression && accepts_brotli(&headers);
    tracing::debug!(compress, "Frame stream opened");
    Ok(stream_from_subscription(subscription, compress)
        .await
        .into_response())
}

fn not_on_dashboard() -> ApiError {
    ApiError::new(StatusCode::CONFLICT, "no dashboard is open")
}
