//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - CORS configuration
//! - Request logging
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{cors_layer_from_env, request_logger};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(request_logger))
//!     .layer(cors_layer_from_env()?);
//! ```

pub mod cors;
pub mod request_log;

pub use cors::{
    cors_layer_from_env, create_cors_layer, create_permissive_cors_layer, parse_origins,
};
pub use request_log::request_logger;
