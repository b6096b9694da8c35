//! Event handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult, middleware::auth::AuthenticatedUser, services::EventService,
    state::AppState,
};

use super::{
    request::{CreateEventRequest, ListEventsQuery, UpdateEventRequest},
    response::{EventDetailResponse, EventResponse, EventsListResponse, MessageResponse},
};

/// List active upcoming events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> AppResult<Json<EventsListResponse>> {
    let events = EventService::list_events(state.storage(), query).await?;
    Ok(Json(events))
}

/// Get a specific event with its attendees
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventDetailResponse>> {
    let event = EventService::get_event(state.storage(), &id).await?;
    Ok(Json(event))
}

/// Create a new event (admin only)
pub async fn create_event(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    auth_user.require_admin()?;
    payload.validate()?;

    let event = EventService::create_event(state.storage(), payload).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event (admin only)
pub async fn update_event(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    auth_user.require_admin()?;
    payload.validate()?;

    let event = EventService::update_event(state.storage(), &id, payload).await?;

    Ok(Json(event))
}

/// Delete an event (admin only)
pub async fn delete_event(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    auth_user.require_admin()?;

    EventService::delete_event(state.storage(), &id).await?;

    Ok(Json(MessageResponse {
        message: "Event deleted successfully".to_string(),
    }))
}
