use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sim_core::EngineError;

/// JSON body returned by every failing route.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Stable machine-readable code.
    pub error: String,
    /// Human-readable explanation.
    pub detail: String,
}

/// An [`ApiError`] paired with its HTTP status.
#[derive(Debug)]
pub struct HttpApiError {
    status: StatusCode,
    body: ApiError,
}

impl HttpApiError {
    pub fn bad_request(code: &str, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiError {
                error: code.to_string(),
                detail: detail.into(),
            },
        }
    }
}

impl From<EngineError> for HttpApiError {
    fn from(err: EngineError) -> Self {
        let (status, code) = match &err {
            EngineError::UnknownPlayer(_) => (StatusCode::NOT_FOUND, "unknown_player"),
            EngineError::InvalidChoiceIndex { .. } => (StatusCode::BAD_REQUEST, "invalid_choice"),
            EngineError::EmptyName => (StatusCode::BAD_REQUEST, "empty_name"),
            EngineError::UnknownArchetype(_) => (StatusCode::BAD_REQUEST, "unknown_archetype"),
            EngineError::NoCurrentScenario => (StatusCode::CONFLICT, "no_current_scenario"),
            EngineError::PhaseNotComplete => (StatusCode::CONFLICT, "phase_not_complete"),
            EngineError::GameAlreadyComplete => (StatusCode::CONFLICT, "game_already_complete"),
        };
        Self {
            status,
            body: ApiError {
                error: code.to_string(),
                detail: err.to_string(),
            },
        }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
