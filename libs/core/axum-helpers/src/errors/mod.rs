pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use utoipa::ToSchema;

static EXPOSE_ERROR_DETAILS: AtomicBool = AtomicBool::new(false);

/// Include underlying error text in 5xx `details`.
///
/// Enable outside production only. Disabled by default.
pub fn set_expose_error_details(enabled: bool) {
    EXPOSE_ERROR_DETAILS.store(enabled, Ordering::Relaxed);
}

pub fn error_details_exposed() -> bool {
    EXPOSE_ERROR_DETAILS.load(Ordering::Relaxed)
}

/// Standard error response structure.
///
/// Returned for every non-2xx response:
/// - `code`: Integer error code for logging/monitoring (e.g., 1002)
/// - `error`: Machine-readable error identifier (e.g., "INVALID_ID")
/// - `message`: Human-readable error message
/// - `details`: Optional structured details (missing field names, hints)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "MISSING_FIELDS",
///   "message": "Missing required fields",
///   "details": { "fields": ["tagline", "description"] }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Client-facing variants carry their [`ErrorCode`]; the status comes from
/// the code. Server variants log the underlying cause and render a generic
/// message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// A rejected request, reported with the code's status
    #[error("{code}: {message}")]
    Request {
        code: ErrorCode,
        message: String,
        details: Option<Value>,
    },

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Form extraction error: {0}")]
    FormExtractorRejection(#[from] FormRejection),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Error for `code` with its default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::Request {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Request {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details. No effect on server variants.
    pub fn details(mut self, value: Value) -> Self {
        if let Self::Request { details, .. } = &mut self {
            *details = Some(value);
        }
        self
    }

    /// Code this error is reported with
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Request { code, .. } => *code,
            Self::JsonExtractorRejection(_) | Self::FormExtractorRejection(_) => {
                ErrorCode::InvalidBody
            }
            Self::Io(_) | Self::InternalServerError(_) => ErrorCode::InternalError,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code().status()
    }
}

/// Generic server-side response; the cause is only attached when exposed.
fn server_error(code: ErrorCode, cause: String) -> (String, Option<Value>) {
    tracing::error!(error_code = code.code(), "{}: {}", code, cause);
    let details = error_details_exposed().then(|| json!({ "error": cause }));
    (code.default_message().to_string(), details)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (message, details) = match self {
            AppError::Request {
                code,
                message,
                details,
            } => {
                if code.is_server_error() {
                    tracing::error!(error_code = code.code(), "{}", message);
                } else {
                    tracing::info!(error_code = code.code(), "Request rejected: {}", message);
                }
                (message, details)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::FormExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "Form extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::Io(e) => server_error(code, e.to_string()),
            AppError::Database(msg) => server_error(code, msg),
            AppError::InternalServerError(msg) => server_error(code, msg),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                (code.default_message().to_string(), None)
            }
        };

        let body = Json(ErrorResponse::new(code, message, details));
        (code.status(), body).into_response()
    }
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
///
/// let response = error_response(ErrorCode::InvalidId, "Invalid event ID format");
/// ```
pub fn error_response(code: ErrorCode, message: impl Into<String>) -> Response {
    let body = Json(ErrorResponse::new(code, message, None));
    (code.status(), body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_request_error_uses_code_status_and_message() {
        let response = AppError::from_code(ErrorCode::InvalidId).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], 1002);
        assert_eq!(json["error"], "INVALID_ID");
        assert_eq!(json["message"], "Invalid event ID format");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_request_error_with_details() {
        let response = AppError::from_code(ErrorCode::MissingFields)
            .details(json!({ "fields": ["tagline"] }))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["details"]["fields"][0], "tagline");
    }

    #[tokio::test]
    async fn test_not_found_code_maps_to_404() {
        let response = AppError::with_message(ErrorCode::EventNotFound, "gone").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "gone");
    }

    #[tokio::test]
    async fn test_database_error_hides_cause_by_default() {
        let response = AppError::Database("connection reset".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "DATABASE_ERROR");
        assert_eq!(json["message"], "Database error occurred");
        if !error_details_exposed() {
            assert!(json.get("details").is_none());
        }
    }

    #[test]
    fn test_details_ignored_on_server_variants() {
        let err = AppError::InternalServerError("boom".into()).details(json!({ "x": 1 }));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_response_helper() {
        let response = error_response(ErrorCode::TooManyFiles, "one at a time");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "TOO_MANY_FILES");
        assert_eq!(json["message"], "one at a time");
    }
}
