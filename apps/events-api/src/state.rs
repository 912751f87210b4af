//! Application state management.
//!
//! This module defines the shared application state used to wire routes.
//! The state contains:
//! - Configuration
//! - MongoDB client
//! - Image store

use domain_events::ImageStore;
use mongodb::{Client, Database};

/// Shared application state.
///
/// This struct is cloned while building routers (inexpensive Arc clones), providing access to:
/// - Application configuration
/// - MongoDB client and database
/// - Upload directory
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
    /// Where uploaded images live
    pub images: ImageStore,
}
