//! API error type shared by all handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The storage engine rejected or failed the statement.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A targeted update or delete matched zero rows.
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn not_found_by_id() -> Self {
        ApiError::NotFound("No student found with that ID".to_string())
    }

    pub fn not_found_by_name(name: &str) -> Self {
        ApiError::NotFound(format!("No student found with that name: {name}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                let body = Json(json!({
                    "error": "Error executing statement",
                    "details": e.to_string(),
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
        }
    }
}
