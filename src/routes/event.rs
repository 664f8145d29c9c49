use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};

use crate::{
    dto::{
        common::MessageResponse,
        event::{CreatedEvent, EventDetail, EventRequest},
    },
    error::AppError,
    routes::extract::{Caller, JsonBody},
    services::event_service,
    state::SharedState,
};

/// Routes of the events and their attendance actions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(retrieve_event).put(update_event).delete(delete_event),
        )
        .route("/events/{id}/signup", post(signup))
        .route("/events/{id}/leave", delete(leave))
}

/// List events with attendee counts and whether the caller joined.
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(("Authorization" = String, Header, description = "Caller gamer uid")),
    responses(
        (status = 200, description = "Events in storage order", body = [EventDetail]),
        (status = 401, description = "Missing caller"),
        (status = 404, description = "Unknown caller")
    )
)]
pub async fn list_events(
    State(state): State<SharedState>,
    Caller(uid): Caller,
) -> Result<Json<Vec<EventDetail>>, AppError> {
    Ok(Json(event_service::list(&state, &uid).await?))
}

/// Retrieve a single event; `joined` is filled when a caller is given.
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Identifier of the event"),
        ("Authorization" = Option<String>, Header, description = "Optional caller gamer uid"),
    ),
    responses(
        (status = 200, description = "Event", body = EventDetail),
        (status = 404, description = "Event or caller not found")
    )
)]
pub async fn retrieve_event(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    caller: Option<Caller>,
) -> Result<Json<EventDetail>, AppError> {
    let caller = caller.map(|Caller(uid)| uid);
    let event = event_service::retrieve(&state, id, caller.as_deref()).await?;
    Ok(Json(event))
}

/// Schedule an event organized by the caller.
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    params(("Authorization" = String, Header, description = "Caller gamer uid")),
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = CreatedEvent),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown caller")
    )
)]
pub async fn create_event(
    State(state): State<SharedState>,
    Caller(uid): Caller,
    JsonBody(payload): JsonBody<EventRequest>,
) -> Result<(StatusCode, Json<CreatedEvent>), AppError> {
    let event = event_service::create(&state, &uid, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Replace the mutable fields of an event.
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Identifier of the event")),
    request_body = EventRequest,
    responses(
        (status = 204, description = "Event updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Event or game not found")
    )
)]
pub async fn update_event(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<EventRequest>,
) -> Result<StatusCode, AppError> {
    event_service::update(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an event and its attendance.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Identifier of the event")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    event_service::destroy(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sign the caller up for an event.
#[utoipa::path(
    post,
    path = "/events/{id}/signup",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Identifier of the event"),
        ("Authorization" = String, Header, description = "Caller gamer uid"),
    ),
    responses(
        (status = 201, description = "Gamer added", body = MessageResponse),
        (status = 404, description = "Event or caller not found")
    )
)]
pub async fn signup(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Caller(uid): Caller,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let message = event_service::signup(&state, &uid, id).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Remove the caller from an event.
///
/// The acknowledgement is sent with a 204, so most clients discard it.
#[utoipa::path(
    delete,
    path = "/events/{id}/leave",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Identifier of the event"),
        ("Authorization" = String, Header, description = "Caller gamer uid"),
    ),
    responses(
        (status = 204, description = "Gamer removed"),
        (status = 404, description = "Caller had not joined the event")
    )
)]
pub async fn leave(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Caller(uid): Caller,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let message = event_service::leave(&state, &uid, id).await?;
    Ok((StatusCode::NO_CONTENT, Json(message)))
}
