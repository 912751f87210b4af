//! Event domain models

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

use crate::error::EventError;
use crate::validation::is_valid_object_id;

/// Value of the `type` discriminator on every stored event
pub const EVENT_TYPE: &str = "event";

/// Identifier of a stored event: a 24-hex-character ObjectId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(ObjectId);

impl EventId {
    /// Parse a client-supplied id, rejecting anything but 24 hex characters
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        if !is_valid_object_id(raw) {
            return Err(EventError::InvalidId(raw.to_string()));
        }
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| EventError::InvalidId(raw.to_string()))
    }

    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for EventId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Files attached to an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventFiles {
    /// Public path of the image, `/uploads/<name>`
    pub image: Option<String>,
}

/// Event entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: String,

    /// Always `"event"`
    #[serde(rename = "type")]
    pub kind: String,

    pub uid: Option<i64>,

    pub name: String,

    pub tagline: String,

    pub schedule: DateTime<Utc>,

    pub description: String,

    pub moderator: Option<String>,

    pub category: Option<String>,

    pub sub_category: Option<String>,

    pub rigor_rank: Option<i64>,

    /// Reserved; always empty
    pub attendees: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<EventFiles>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Public path of the attached image, if any
    pub fn image(&self) -> Option<&str> {
        self.files.as_ref().and_then(|f| f.image.as_deref())
    }
}

/// Fully validated event ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub uid: Option<i64>,
    pub name: String,
    pub tagline: String,
    pub schedule: DateTime<Utc>,
    pub description: String,
    pub moderator: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub rigor_rank: Option<i64>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    /// Materialize the stored event once the store has assigned an id.
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id: id.to_hex(),
            kind: EVENT_TYPE.to_string(),
            uid: self.uid,
            name: self.name,
            tagline: self.tagline,
            schedule: self.schedule,
            description: self.description,
            moderator: self.moderator,
            category: self.category,
            sub_category: self.sub_category,
            rigor_rank: self.rigor_rank,
            attendees: Vec::new(),
            files: self.image.map(|image| EventFiles { image: Some(image) }),
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Field-level partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub uid: Option<i64>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub schedule: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub moderator: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub rigor_rank: Option<i64>,
    pub image: Option<String>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to an in-memory event, refreshing `updated_at`.
    pub fn apply_to(self, event: &mut Event, updated_at: DateTime<Utc>) {
        if let Some(uid) = self.uid {
            event.uid = Some(uid);
        }
        if let Some(name) = self.name {
            event.name = name;
        }
        if let Some(tagline) = self.tagline {
            event.tagline = tagline;
        }
        if let Some(schedule) = self.schedule {
            event.schedule = schedule;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(moderator) = self.moderator {
            event.moderator = Some(moderator);
        }
        if let Some(category) = self.category {
            event.category = Some(category);
        }
        if let Some(sub_category) = self.sub_category {
            event.sub_category = Some(sub_category);
        }
        if let Some(rigor_rank) = self.rigor_rank {
            event.rigor_rank = Some(rigor_rank);
        }
        if let Some(image) = self.image {
            event.files = Some(EventFiles { image: Some(image) });
        }
        event.updated_at = updated_at;
    }
}

/// Raw create/update submission.
///
/// Every field arrives as text regardless of body encoding; JSON numbers
/// and booleans are accepted and rendered to their textual form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct EventInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tagline: Option<String>,
    /// RFC 3339, RFC 2822, `YYYY-MM-DD[THH:MM[:SS]]` or epoch milliseconds
    #[serde(default, deserialize_with = "lenient_string")]
    pub schedule: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub moderator: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sub_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(value_type = Option<i64>)]
    pub rigor_rank: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(value_type = Option<i64>)]
    pub uid: Option<String>,
}

impl EventInput {
    /// Assign a text field by its wire name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "name" => &mut self.name,
            "tagline" => &mut self.tagline,
            "schedule" => &mut self.schedule,
            "description" => &mut self.description,
            "moderator" => &mut self.moderator,
            "category" => &mut self.category,
            "sub_category" => &mut self.sub_category,
            "rigor_rank" => &mut self.rigor_rank,
            "uid" => &mut self.uid,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// Query parameters of `GET /events`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Fetch a single event by id
    pub id: Option<String>,
    /// `latest` for the paginated listing sorted by schedule
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Page size for `type=latest` (default 5, max 100)
    pub limit: Option<String>,
    /// 1-based page for `type=latest`
    pub page: Option<String>,
}

/// Pagination block of the latest listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatestEvents {
    pub events: Vec<Event>,
    pub pagination: PaginationMeta,
}

/// Result of `GET /events`, shaped by the selected mode
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum EventListing {
    Single(Event),
    Latest(LatestEvents),
    All(Vec<Event>),
}

/// Outcome of an update request
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Event),
    /// Nothing differed from the stored document; no write happened
    Unchanged(Event),
}

pub const MSG_CREATED: &str = "Event created successfully";
pub const MSG_UPDATED: &str = "Event updated successfully";
pub const MSG_UNCHANGED: &str = "No changes detected";
pub const MSG_DELETED: &str = "Event deleted successfully";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventCreated {
    pub message: String,
    pub id: String,
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventUpdated {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventDeleted {
    pub message: String,
    pub id: String,
}
