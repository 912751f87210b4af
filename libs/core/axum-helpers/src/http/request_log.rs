use axum::{extract::Request, middleware::Next, response::Response};
use chrono::Utc;

/// Middleware that logs method, path and arrival time of every request.
pub async fn request_logger(request: Request, next: Next) -> Response {
    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        timestamp = %Utc::now().to_rfc3339(),
        "Incoming request"
    );

    next.run(request).await
}
