//! Application error type with a deliberately narrow external contract.
//!
//! Only two failure shapes ever reach a client: `404 {"error": "URL not
//! found"}` and `500 {"error": "Server error"}`. Whatever internal component
//! failed, the detail stays in the logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// No record matches the requested code or alias.
    #[error("URL not found")]
    NotFound,

    /// Store failure or any other unexpected server-side condition. The
    /// message is logged, never serialized to the client.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "URL not found" })),
            )
                .into_response(),
            AppError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(format!("database error: {e}"))
    }
}
