//! Events Domain
//!
//! Event listings backed by MongoDB, with optional image uploads stored on
//! local disk and served under `/uploads`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, body decoding (JSON, form, multipart)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │   Service   │ ──► │ ImageStore  │  ← upload directory
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, inputs, response envelopes
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{EventService, ImageStore, MongoEventRepository, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("events");
//!
//! let repository = MongoEventRepository::new(&db);
//! let service = EventService::new(repository, ImageStore::new("uploads"));
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod submission;
pub mod upload;
pub mod validation;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    Event, EventChanges, EventId, EventInput, EventListing, LatestEvents, ListQuery, NewEvent,
    PaginationMeta, UpdateOutcome,
};
pub use mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::EventService;
pub use upload::{ImageStore, StoredImage, UPLOADS_URL_PREFIX, UploadError};
