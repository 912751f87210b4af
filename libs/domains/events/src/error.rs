use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use serde_json::json;
use thiserror::Error;

use crate::upload::UploadError;

const INVALID_ID_HINT: &str = "Event ID should be a valid MongoDB ObjectId (24 hex characters)";
const INVALID_DATE_HINT: &str = "Use ISO 8601 format (e.g., 2026-03-15T10:00:00.000Z)";

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid event ID format: {0}")]
    InvalidId(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid schedule date: {0}")]
    InvalidDate(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Failed to store image: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),
}

pub type EventResult<T> = Result<T, EventError>;

/// Convert EventError to AppError for standardized error responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::InvalidId(id) => AppError::from_code(ErrorCode::InvalidId)
                .details(json!({ "id": id, "hint": INVALID_ID_HINT })),
            EventError::NotFound(id) => {
                AppError::from_code(ErrorCode::EventNotFound).details(json!({ "id": id }))
            }
            EventError::MissingFields(fields) => {
                AppError::from_code(ErrorCode::MissingFields).details(json!({ "fields": fields }))
            }
            EventError::InvalidDate(value) => AppError::from_code(ErrorCode::InvalidDate)
                .details(json!({ "value": value, "hint": INVALID_DATE_HINT })),
            EventError::InvalidBody(msg) => AppError::with_message(ErrorCode::InvalidBody, msg),
            EventError::Upload(e) => e.into(),
            EventError::Storage(e) => {
                tracing::error!(error = %e, "Failed to write uploaded image");
                AppError::from_code(ErrorCode::StorageError)
            }
            EventError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidFileType { .. } => AppError::from_code(ErrorCode::InvalidFileType),
            UploadError::FileTooLarge => AppError::from_code(ErrorCode::FileTooLarge),
            UploadError::TooManyFiles => AppError::from_code(ErrorCode::TooManyFiles),
            UploadError::UnexpectedField(field) => {
                AppError::from_code(ErrorCode::UnexpectedFileField)
                    .details(json!({ "field": field }))
            }
            UploadError::Malformed(msg) => AppError::with_message(ErrorCode::InvalidMultipart, msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (EventError::InvalidId("x".into()), StatusCode::BAD_REQUEST),
            (EventError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                EventError::MissingFields(vec!["name"]),
                StatusCode::BAD_REQUEST,
            ),
            (EventError::InvalidDate("x".into()), StatusCode::BAD_REQUEST),
            (
                EventError::Upload(UploadError::FileTooLarge),
                StatusCode::BAD_REQUEST,
            ),
            (
                EventError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_upload_errors_keep_their_codes() {
        assert_eq!(
            AppError::from(UploadError::TooManyFiles).code(),
            ErrorCode::TooManyFiles
        );
        assert_eq!(
            AppError::from(UploadError::UnexpectedField("avatar".into())).code(),
            ErrorCode::UnexpectedFileField
        );
        assert_eq!(
            AppError::from(UploadError::Malformed("bad boundary".into())).code(),
            ErrorCode::InvalidMultipart
        );
    }

    #[test]
    fn test_missing_fields_message() {
        let err = EventError::MissingFields(vec!["tagline", "description"]);
        assert_eq!(err.to_string(), "Missing required fields: tagline, description");
    }
}
