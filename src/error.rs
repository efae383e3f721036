//! Error types for the Orbit server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::render::RenderError;
use crate::search::SearchError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Entrez query errors do not pass through here: they are answered with an
/// `ERROR` payload and a 200 status.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Search(e) => match e {
                SearchError::QuerySyntax(msg) | SearchError::EmptyInput(msg) => {
                    (StatusCode::BAD_REQUEST, "bad_query", msg.clone())
                }
                SearchError::Timeout(_) => {
                    tracing::error!("Search error: {}", e);
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        "search_timeout",
                        "Search timed out".to_string(),
                    )
                }
                _ => {
                    tracing::error!("Search error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "search_error",
                        "Search backend error".to_string(),
                    )
                }
            },
            AppError::Render(e) => {
                tracing::error!("Render error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "render_error",
                    "Failed to render response".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
