//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{FindOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::EventResult;
use crate::models::{EVENT_TYPE, Event, EventChanges, EventFiles, EventId, NewEvent};
use crate::repository::EventRepository;

pub const EVENTS_COLLECTION: &str = "events";

/// Stored form of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "type")]
    kind: String,
    uid: Option<i64>,
    name: String,
    tagline: String,
    schedule: bson::DateTime,
    description: String,
    moderator: Option<String>,
    category: Option<String>,
    sub_category: Option<String>,
    rigor_rank: Option<i64>,
    #[serde(default)]
    attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    files: Option<EventFiles>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn to_chrono(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl EventDocument {
    fn from_new(id: ObjectId, event: NewEvent) -> Self {
        let created_at = to_bson_datetime(event.created_at);
        Self {
            id,
            kind: EVENT_TYPE.to_string(),
            uid: event.uid,
            name: event.name,
            tagline: event.tagline,
            schedule: to_bson_datetime(event.schedule),
            description: event.description,
            moderator: event.moderator,
            category: event.category,
            sub_category: event.sub_category,
            rigor_rank: event.rigor_rank,
            attendees: Vec::new(),
            files: event.image.map(|image| EventFiles { image: Some(image) }),
            created_at,
            updated_at: created_at,
        }
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Event {
            id: doc.id.to_hex(),
            kind: doc.kind,
            uid: doc.uid,
            name: doc.name,
            tagline: doc.tagline,
            schedule: to_chrono(doc.schedule),
            description: doc.description,
            moderator: doc.moderator,
            category: doc.category,
            sub_category: doc.sub_category,
            rigor_rank: doc.rigor_rank,
            attendees: doc.attendees,
            files: doc.files,
            created_at: to_chrono(doc.created_at),
            updated_at: to_chrono(doc.updated_at),
        }
    }
}

/// MongoDB implementation of the EventRepository
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    /// Create a repository over the `events` collection of `db`
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoEventRepository::new(&client.database("events"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, EVENTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }

    /// Create the schedule index backing the latest listing
    pub async fn create_indexes(&self) -> EventResult<()> {
        let index = IndexModel::builder().keys(doc! { "schedule": -1 }).build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// `$set` document for `changes` plus the `updated_at` refresh
    fn build_set(changes: EventChanges, updated_at: DateTime<Utc>) -> Document {
        let mut set = doc! { "updated_at": to_bson_datetime(updated_at) };

        if let Some(uid) = changes.uid {
            set.insert("uid", uid);
        }
        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(tagline) = changes.tagline {
            set.insert("tagline", tagline);
        }
        if let Some(schedule) = changes.schedule {
            set.insert("schedule", to_bson_datetime(schedule));
        }
        if let Some(description) = changes.description {
            set.insert("description", description);
        }
        if let Some(moderator) = changes.moderator {
            set.insert("moderator", moderator);
        }
        if let Some(category) = changes.category {
            set.insert("category", category);
        }
        if let Some(sub_category) = changes.sub_category {
            set.insert("sub_category", sub_category);
        }
        if let Some(rigor_rank) = changes.rigor_rank {
            set.insert("rigor_rank", rigor_rank);
        }
        if let Some(image) = changes.image {
            set.insert("files", doc! { "image": image });
        }

        set
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_name = %event.name))]
    async fn insert(&self, event: NewEvent) -> EventResult<Event> {
        let document = EventDocument::from_new(ObjectId::new(), event);
        self.collection.insert_one(&document).await?;

        tracing::info!(event_id = %document.id, "Event created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self), fields(event_id = %id))]
    async fn find_by_id(&self, id: &EventId) -> EventResult<Option<Event>> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(document.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> EventResult<Vec<Event>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_latest(&self, skip: u64, limit: u64) -> EventResult<Vec<Event>> {
        let options = FindOptions::builder()
            .sort(doc! { "schedule": -1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> EventResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    #[instrument(skip(self, changes), fields(event_id = %id))]
    async fn update(&self, id: &EventId, changes: EventChanges) -> EventResult<Option<Event>> {
        let set = Self::build_set(changes, Utc::now());

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.object_id() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(event_id = %id, "Event updated successfully");
        }
        Ok(updated.map(Into::into))
    }

    #[instrument(skip(self), fields(event_id = %id))]
    async fn delete(&self, id: &EventId) -> EventResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await?;

        if result.deleted_count > 0 {
            tracing::info!(event_id = %id, "Event deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}
