use async_trait::async_trait;

use crate::error::EventResult;
use crate::models::{Event, EventChanges, EventId, NewEvent};

/// Repository trait for Event persistence
///
/// Implementations own id assignment and the `updated_at` refresh on
/// update; everything else arrives fully validated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event and return it with its assigned id
    async fn insert(&self, event: NewEvent) -> EventResult<Event>;

    async fn find_by_id(&self, id: &EventId) -> EventResult<Option<Event>>;

    /// Every event, in storage order
    async fn list_all(&self) -> EventResult<Vec<Event>>;

    /// Events sorted by schedule, newest first
    async fn list_latest(&self, skip: u64, limit: u64) -> EventResult<Vec<Event>>;

    async fn count(&self) -> EventResult<u64>;

    /// Merge `changes` into the stored event.
    ///
    /// Returns the refreshed event, or `None` if it no longer exists.
    async fn update(&self, id: &EventId, changes: EventChanges) -> EventResult<Option<Event>>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: &EventId) -> EventResult<bool>;
}
