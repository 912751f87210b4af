//! Type-safe error codes for API responses.
//!
//! Every error body carries one of these codes. Each code includes:
//! - String representation for client consumption (e.g., "INVALID_ID")
//! - Integer code for logging and monitoring (e.g., 1002)
//! - HTTP status it is reported with
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidId;
//! assert_eq!(code.as_str(), "INVALID_ID");
//! assert_eq!(code.code(), 1002);
//! assert_eq!(code.default_message(), "Invalid event ID format");
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request errors (1000s)
    /// One or more required fields are absent or blank
    MissingFields,

    /// Path or query id is not a 24-character hex string
    InvalidId,

    /// A date field could not be parsed
    InvalidDate,

    /// JSON or form body could not be decoded
    InvalidBody,

    /// No route matches the request
    NotFound,

    /// The addressed event does not exist
    EventNotFound,

    // Upload errors (1100s)
    /// File extension or MIME type is not an allowed image type
    InvalidFileType,

    /// File exceeds the per-file size ceiling
    FileTooLarge,

    /// More than one file in a single request
    TooManyFiles,

    /// A file was sent under a field other than `image`
    UnexpectedFileField,

    /// The multipart body could not be parsed
    InvalidMultipart,

    // Server errors (5000s)
    InternalError,

    ServiceUnavailable,

    /// The database rejected or failed an operation
    DatabaseError,

    /// An accepted upload could not be written to disk
    StorageError,
}

impl ErrorCode {
    /// Get the string representation for client consumption.
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::MissingFields.as_str(), "MISSING_FIELDS");
    /// assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidBody => "INVALID_BODY",
            Self::NotFound => "NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::TooManyFiles => "TOO_MANY_FILES",
            Self::UnexpectedFileField => "UNEXPECTED_FILE_FIELD",
            Self::InvalidMultipart => "INVALID_MULTIPART",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// Ranges:
    /// - 1000-1099: Request errors
    /// - 1100-1199: Upload errors
    /// - 5000-5999: Server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::MissingFields => 1001,
            Self::InvalidId => 1002,
            Self::InvalidDate => 1003,
            Self::InvalidBody => 1004,
            Self::NotFound => 1005,
            Self::EventNotFound => 1006,

            Self::InvalidFileType => 1101,
            Self::FileTooLarge => 1102,
            Self::TooManyFiles => 1103,
            Self::UnexpectedFileField => 1104,
            Self::InvalidMultipart => 1105,

            Self::InternalError => 5001,
            Self::ServiceUnavailable => 5002,
            Self::DatabaseError => 5003,
            Self::StorageError => 5004,
        }
    }

    /// HTTP status used when this code is returned.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::EventNotFound => StatusCode::NOT_FOUND,
            Self::InternalError | Self::DatabaseError | Self::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the default user-facing error message.
    ///
    /// Handlers may override it with a more specific message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Missing required fields",
            Self::InvalidId => "Invalid event ID format",
            Self::InvalidDate => "Invalid schedule date format",
            Self::InvalidBody => "Request body could not be parsed",
            Self::NotFound => "Resource not found",
            Self::EventNotFound => "Event not found",
            Self::InvalidFileType => {
                "Invalid file type. Only images (JPEG, PNG, GIF, WebP) allowed"
            }
            Self::FileTooLarge => "Maximum file size is 5MB",
            Self::TooManyFiles => "Only one file may be uploaded per request",
            Self::UnexpectedFileField => "Files are only accepted in the 'image' field",
            Self::InvalidMultipart => "Malformed multipart body",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::StorageError => "Failed to store uploaded file",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::InvalidId.as_str(), "INVALID_ID");
        assert_eq!(ErrorCode::EventNotFound.as_str(), "EVENT_NOT_FOUND");
        assert_eq!(ErrorCode::FileTooLarge.as_str(), "FILE_TOO_LARGE");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::MissingFields.code(), 1001);
        assert_eq!(ErrorCode::InvalidFileType.code(), 1101);
        assert_eq!(ErrorCode::DatabaseError.code(), 5003);
    }

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::InvalidDate.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::TooManyFiles.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::EventNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::StorageError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(ErrorCode::InternalError.is_server_error());
        assert!(!ErrorCode::InvalidMultipart.is_server_error());
    }

    #[test]
    fn test_error_code_messages() {
        assert_eq!(
            ErrorCode::FileTooLarge.default_message(),
            "Maximum file size is 5MB"
        );
        assert_eq!(ErrorCode::EventNotFound.default_message(), "Event not found");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::MissingFields.to_string(), "MISSING_FIELDS");
    }

    #[test]
    fn test_error_code_serialization_matches_as_str() {
        for code in [
            ErrorCode::UnexpectedFileField,
            ErrorCode::InvalidMultipart,
            ErrorCode::ServiceUnavailable,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }
}
