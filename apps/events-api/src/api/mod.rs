//! API routes module
//!
//! This module defines all HTTP routes of the events service.

pub mod events;
pub mod health;
pub mod root;

use axum::Router;
use axum_helpers::health_router;
use domain_events::UPLOADS_URL_PREFIX;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Versioned prefix of the events endpoints
pub const API_PREFIX: &str = "/api/v3/app";

/// Create all routes: events API, uploads, metadata, liveness and readiness
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, events::router(state))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(state.images.dir()))
        .merge(root::router(state.config.app))
        .merge(health_router(state.config.app))
        .merge(health::router(state.clone()))
}
