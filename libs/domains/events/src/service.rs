//! Event Service - Business logic layer
//!
//! Each operation is an ordered pipeline: id format, existence, field
//! validation, then persistence. The first failing step ends the request.
//! A stored upload is removed whenever the request it arrived with fails.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{EventError, EventResult};
use crate::models::{
    Event, EventChanges, EventId, EventInput, EventListing, LatestEvents, ListQuery, NewEvent,
    UpdateOutcome,
};
use crate::repository::EventRepository;
use crate::upload::{ImageStore, StoredImage};
use crate::validation::{
    DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, build_pagination_meta, parse_date, parse_leading_int,
    safe_parse_int, sanitize_string,
};

/// Event service providing business logic operations
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
    images: ImageStore,
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: self.images.clone(),
        }
    }
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R, images: ImageStore) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
        }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// `GET /events`: by id, latest page, or everything, checked in that order
    #[instrument(skip(self))]
    pub async fn list(&self, query: ListQuery) -> EventResult<EventListing> {
        if let Some(id) = query.id.as_deref().filter(|id| !id.is_empty()) {
            return self.get(id).await.map(EventListing::Single);
        }

        if query.kind.as_deref() == Some("latest") {
            return self
                .list_latest(query.limit.as_deref(), query.page.as_deref())
                .await
                .map(EventListing::Latest);
        }

        let events = self.repository.list_all().await?;
        Ok(EventListing::All(events))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> EventResult<Event> {
        let event_id = EventId::parse(id)?;
        self.repository
            .find_by_id(&event_id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))
    }

    /// Page of events sorted by schedule, newest first.
    ///
    /// `limit` defaults to 5 and is clamped to 1..=100; `page` defaults to 1.
    #[instrument(skip(self))]
    pub async fn list_latest(
        &self,
        limit: Option<&str>,
        page: Option<&str>,
    ) -> EventResult<LatestEvents> {
        let limit = safe_parse_int(limit, DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as u64;
        let page = safe_parse_int(page, DEFAULT_PAGE).max(1) as u64;
        // the driver sends skip as an i64
        let skip = (page - 1).saturating_mul(limit).min(i64::MAX as u64);

        let events = self.repository.list_latest(skip, limit).await?;
        let total = self.repository.count().await?;

        Ok(LatestEvents {
            events,
            pagination: build_pagination_meta(page, limit, total),
        })
    }

    /// Validate and insert a new event.
    #[instrument(skip(self, input, image), fields(has_image = image.is_some()))]
    pub async fn create(&self, input: EventInput, image: Option<StoredImage>) -> EventResult<Event> {
        let result = self.try_create(input, image.as_ref()).await;
        if result.is_err() {
            self.discard(image.as_ref()).await;
        }
        result
    }

    async fn try_create(&self, input: EventInput, image: Option<&StoredImage>) -> EventResult<Event> {
        let new_event = build_new_event(input, image)?;
        let event = self.repository.insert(new_event).await?;
        info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    /// Apply the supplied fields that differ from the stored event.
    #[instrument(skip(self, input, image), fields(has_image = image.is_some()))]
    pub async fn update(
        &self,
        id: &str,
        input: EventInput,
        image: Option<StoredImage>,
    ) -> EventResult<UpdateOutcome> {
        let result = self.try_update(id, input, image.as_ref()).await;
        if result.is_err() {
            self.discard(image.as_ref()).await;
        }
        result
    }

    async fn try_update(
        &self,
        id: &str,
        input: EventInput,
        image: Option<&StoredImage>,
    ) -> EventResult<UpdateOutcome> {
        let event_id = EventId::parse(id)?;
        let current = self
            .repository
            .find_by_id(&event_id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        let changes = build_changes(input, &current, image)?;
        if changes.is_empty() {
            info!(event_id = %event_id, "Update carried no changes");
            return Ok(UpdateOutcome::Unchanged(current));
        }

        let replaces_image = changes.image.is_some();
        let updated = self
            .repository
            .update(&event_id, changes)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        if replaces_image {
            if let Some(old) = current.image() {
                self.images.remove(old).await;
            }
        }

        Ok(UpdateOutcome::Updated(updated))
    }

    /// Delete an event and, best-effort, its image.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> EventResult<EventId> {
        let event_id = EventId::parse(id)?;
        let event = self
            .repository
            .find_by_id(&event_id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        if !self.repository.delete(&event_id).await? {
            return Err(EventError::NotFound(id.to_string()));
        }

        if let Some(image) = event.image() {
            self.images.remove(image).await;
        }

        info!(event_id = %event_id, "Event deleted");
        Ok(event_id)
    }

    async fn discard(&self, image: Option<&StoredImage>) {
        if let Some(image) = image {
            self.images.remove(&image.public_path).await;
        }
    }
}

/// Required fields, in the order they are reported when missing
const REQUIRED_FIELDS: [&str; 4] = ["name", "tagline", "schedule", "description"];

fn build_new_event(input: EventInput, image: Option<&StoredImage>) -> EventResult<NewEvent> {
    let values = [
        sanitize_string(input.name.as_deref()),
        sanitize_string(input.tagline.as_deref()),
        sanitize_string(input.schedule.as_deref()),
        sanitize_string(input.description.as_deref()),
    ];

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .zip(values.iter())
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(EventError::MissingFields(missing));
    }

    let [Some(name), Some(tagline), Some(schedule), Some(description)] = values else {
        return Err(EventError::MissingFields(REQUIRED_FIELDS.to_vec()));
    };

    let schedule = parse_date(&schedule).ok_or(EventError::InvalidDate(schedule))?;

    Ok(NewEvent {
        uid: input.uid.as_deref().and_then(parse_leading_int),
        name,
        tagline,
        schedule,
        description,
        moderator: sanitize_string(input.moderator.as_deref()),
        category: sanitize_string(input.category.as_deref()),
        sub_category: sanitize_string(input.sub_category.as_deref()),
        rigor_rank: input.rigor_rank.as_deref().and_then(parse_leading_int),
        image: image.map(|img| img.public_path.clone()),
        created_at: Utc::now(),
    })
}

/// Keep `value` only when it differs from what is stored
fn changed<T: PartialEq>(value: Option<T>, current: &T) -> Option<T> {
    value.filter(|v| v != current)
}

fn changed_opt<T: PartialEq>(value: Option<T>, current: &Option<T>) -> Option<T> {
    value.filter(|v| current.as_ref() != Some(v))
}

fn build_changes(
    input: EventInput,
    current: &Event,
    image: Option<&StoredImage>,
) -> EventResult<EventChanges> {
    let schedule = match sanitize_string(input.schedule.as_deref()) {
        Some(raw) => Some(parse_date(&raw).ok_or(EventError::InvalidDate(raw))?),
        None => None,
    };

    Ok(EventChanges {
        uid: changed_opt(
            input.uid.as_deref().and_then(parse_leading_int),
            &current.uid,
        ),
        name: changed(sanitize_string(input.name.as_deref()), &current.name),
        tagline: changed(sanitize_string(input.tagline.as_deref()), &current.tagline),
        schedule: changed(schedule, &current.schedule),
        description: changed(
            sanitize_string(input.description.as_deref()),
            &current.description,
        ),
        moderator: changed_opt(
            sanitize_string(input.moderator.as_deref()),
            &current.moderator,
        ),
        category: changed_opt(
            sanitize_string(input.category.as_deref()),
            &current.category,
        ),
        sub_category: changed_opt(
            sanitize_string(input.sub_category.as_deref()),
            &current.sub_category,
        ),
        rigor_rank: changed_opt(
            input.rigor_rank.as_deref().and_then(parse_leading_int),
            &current.rigor_rank,
        ),
        image: image.map(|img| img.public_path.clone()),
    })
}
