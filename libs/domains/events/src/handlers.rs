use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::ErrorResponse;
use std::sync::Arc;
use tracing::instrument;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{
    Event, EventCreated, EventDeleted, EventFiles, EventInput, EventListing, EventUpdated,
    LatestEvents, ListQuery, MSG_CREATED, MSG_DELETED, MSG_UNCHANGED, MSG_UPDATED, PaginationMeta,
    UpdateOutcome,
};
use crate::repository::EventRepository;
use crate::service::EventService;
use crate::submission::parse_submission;
use crate::upload::REQUEST_BODY_LIMIT;

const TAG: &str = "Events";

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(list_events, create_event, update_event, delete_event),
    components(schemas(
        Event,
        EventFiles,
        EventInput,
        EventListing,
        LatestEvents,
        PaginationMeta,
        EventCreated,
        EventUpdated,
        EventDeleted,
        ErrorResponse,
    )),
    tags(
        (name = TAG, description = "Event management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", put(update_event).delete(delete_event))
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(shared_service)
}

/// List events: one by id, the latest page, or all of them
#[utoipa::path(
    get,
    path = "/events",
    tag = TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "Event, latest page, or full list depending on the query", body = EventListing),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
#[instrument(skip(service))]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(query): Query<ListQuery>,
) -> EventResult<Json<EventListing>> {
    let listing = service.list(query).await?;
    Ok(Json(listing))
}

/// Create an event from JSON, a urlencoded form, or multipart with an optional image
#[utoipa::path(
    post,
    path = "/events",
    tag = TAG,
    request_body(
        content = EventInput,
        content_type = "multipart/form-data",
        description = "Event fields plus an optional `image` file (jpeg, png, gif or webp, at most 5 MiB)"
    ),
    responses(
        (status = 201, description = "Event created", body = EventCreated),
        (status = 400, description = "Missing fields, bad date or rejected upload", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
#[instrument(skip(service, request))]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    request: Request,
) -> EventResult<impl IntoResponse> {
    let submission = parse_submission(request, service.images()).await?;
    let event = service.create(submission.input, submission.image).await?;

    let body = EventCreated {
        message: MSG_CREATED.to_string(),
        id: event.id.clone(),
        event,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// Update the supplied fields of an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    request_body(
        content = EventInput,
        content_type = "multipart/form-data",
        description = "Any subset of the event fields plus an optional replacement `image`"
    ),
    responses(
        (status = 200, description = "Event updated, or no changes detected", body = EventUpdated),
        (status = 400, description = "Malformed id, bad date or rejected upload", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
#[instrument(skip(service, request))]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
    request: Request,
) -> EventResult<Json<EventUpdated>> {
    let submission = parse_submission(request, service.images()).await?;
    let outcome = service
        .update(&id, submission.input, submission.image)
        .await?;

    let body = match outcome {
        UpdateOutcome::Updated(event) => EventUpdated {
            message: MSG_UPDATED.to_string(),
            event,
        },
        UpdateOutcome::Unchanged(event) => EventUpdated {
            message: MSG_UNCHANGED.to_string(),
            event,
        },
    };
    Ok(Json(body))
}

/// Delete an event and its image
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Event deleted", body = EventDeleted),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
#[instrument(skip(service))]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
) -> EventResult<Json<EventDeleted>> {
    let deleted = service.delete(&id).await?;
    Ok(Json(EventDeleted {
        message: MSG_DELETED.to_string(),
        id: deleted.to_hex(),
    }))
}
