//! API metadata at `/`

use axum::{Json, Router, extract::State, routing::get};
use core_config::AppInfo;
use serde::Serialize;

/// Display name reported at `/`
pub const API_NAME: &str = "Events API";

#[derive(Debug, Serialize)]
struct Endpoints {
    health: &'static str,
    events: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiMetadata {
    name: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

pub fn router(app: AppInfo) -> Router {
    Router::new().route("/", get(metadata)).with_state(app)
}

async fn metadata(State(app): State<AppInfo>) -> Json<ApiMetadata> {
    Json(ApiMetadata {
        name: API_NAME,
        version: app.version,
        endpoints: Endpoints {
            health: "/health",
            events: "/api/v3/app/events",
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::app_info;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_metadata() {
        let response = router(app_info!())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Events API",
                "version": "1.0.0",
                "endpoints": { "health": "/health", "events": "/api/v3/app/events" }
            })
        );
    }
}
