use axum::{
    Json,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::any::Any;

use super::{AppError, ErrorCode, ErrorResponse, error_details_exposed};

const NOT_FOUND_HINT: &str = "Check the API documentation for valid endpoints";

/// Fallback handler for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::with_message(
        ErrorCode::NotFound,
        format!("Cannot {} {}", method, uri.path()),
    )
    .details(json!({ "hint": NOT_FOUND_HINT }))
}

/// Turns a handler panic into a JSON 500.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let code = ErrorCode::InternalError;
    tracing::error!(error_code = code.code(), "Handler panicked: {}", cause);

    let details = error_details_exposed().then(|| json!({ "error": cause }));
    let body = Json(ErrorResponse::new(code, code.default_message(), details));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_not_found_names_method_and_path() {
        let uri: Uri = "/api/v3/app/nowhere?x=1".parse().unwrap();
        let response = not_found(Method::PATCH, uri).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Cannot PATCH /api/v3/app/nowhere");
        assert_eq!(json["details"]["hint"], NOT_FOUND_HINT);
    }

    #[test]
    fn test_handle_panic_is_internal_error() {
        let response = handle_panic(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
