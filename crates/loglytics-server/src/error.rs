use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use loglytics_search::SearchError;

/// Messages are user-facing; the product UI is Italian.
pub const MSG_MISSING_RANGE: &str = "Parametri from e to richiesti";
pub const MSG_INVALID_RANGE: &str = "Parametri from e to non validi";
pub const MSG_STATS_FAILED: &str = "Errore nel recupero delle statistiche";
pub const MSG_REALTIME_FAILED: &str = "Errore nel recupero delle statistiche in tempo reale";
pub const MSG_INVALID_CURSOR: &str = "Cursore after_key non valido";
pub const MSG_SEGMENT_NOT_FOUND: &str = "Segmento non trovato";
pub const MSG_MAPPING_NOT_FOUND: &str = "Mapping non trovato";
pub const MSG_INTERNAL: &str = "Errore interno del server";

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant implements [`IntoResponse`] so Axum handlers can use
/// `Result<impl IntoResponse, AppError>` as their return type. The body shape
/// is always `{"success": false, "message": …}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    /// A search-engine call failed. Carries the generic user-facing message
    /// for the endpoint family; the original error stays in server logs.
    #[error("{0}")]
    Engine(String),

    /// Segment preview failures surface the engine message.
    #[error("{0}")]
    PreviewFailed(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Engine(_) | AppError::PreviewFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// What the caller is allowed to see. Internal errors are never echoed.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Internal(_) => MSG_INTERNAL.to_string(),
            AppError::Unauthorized => "Contesto tenant mancante".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref e) = self {
            tracing::error!("Internal error: {e}");
        }
        (
            self.status(),
            Json(json!({
                "success": false,
                "message": self.user_message(),
            })),
        )
            .into_response()
    }
}

/// Translate a failed backend call into the family's generic 500, keeping
/// the real error in the logs only. Segment-specific kinds keep their
/// 404/400 semantics.
pub fn engine_failure(message: &str, err: anyhow::Error) -> AppError {
    match err.downcast_ref::<SearchError>() {
        Some(SearchError::InvalidCursor) => AppError::BadRequest(MSG_INVALID_CURSOR.to_string()),
        Some(SearchError::MappingNotFound(_)) => {
            AppError::NotFound(MSG_MAPPING_NOT_FOUND.to_string())
        }
        Some(SearchError::PreviewFailed(_)) => AppError::PreviewFailed(err.to_string()),
        _ => {
            tracing::error!(error = %err, "search engine call failed");
            AppError::Engine(message.to_string())
        }
    }
}
