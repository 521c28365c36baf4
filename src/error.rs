use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::media::MediaError;
use crate::models::dynamic::FieldDataError;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    MalformedFieldData(String),
    Media(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::MalformedFieldData(msg) => write!(f, "Malformed Field Data: {msg}"),
            AppError::Media(msg) => write!(f, "Media Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MalformedFieldData(msg) => {
                tracing::error!("Malformed field data: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Stored submission data is corrupt".to_string(),
                )
            }
            AppError::Media(msg) => {
                tracing::error!("Media service error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Media service request failed".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<FieldDataError> for AppError {
    fn from(err: FieldDataError) -> Self {
        AppError::MalformedFieldData(err.0.to_string())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NotFound(id) => AppError::NotFound(format!("Media {id} not found")),
            MediaError::Failed(msg) => AppError::Media(msg),
        }
    }
}
