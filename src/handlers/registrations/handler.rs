//! Registration handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    constants::DEFAULT_PAGE_SIZE, error::AppResult, middleware::auth::AuthenticatedUser,
    services::RegistrationService, state::AppState, utils::last_page,
};

use super::{
    request::MyRegistrationsQuery,
    response::{CancelResponse, MyRegistrationsResponse, RegisteredResponse, RegistrationResponse},
};

/// Register the caller for an event
pub async fn register_for_event(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(event_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<RegisteredResponse>)> {
    let (registration, event) =
        RegistrationService::register(state.storage(), &auth_user.id, &event_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "Successfully registered for the event".to_string(),
            registration: RegistrationResponse::new(registration, event),
        }),
    ))
}

/// Cancel one of the caller's registrations
pub async fn cancel_registration(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CancelResponse>> {
    let registration = RegistrationService::cancel(state.storage(), &auth_user.id, &id).await?;

    Ok(Json(CancelResponse {
        message: "Registration cancelled successfully".to_string(),
        registration_id: registration.id,
        status: registration.status,
    }))
}

/// List the caller's active registrations, newest first
pub async fn my_registrations(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<MyRegistrationsQuery>,
) -> AppResult<Json<MyRegistrationsResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = DEFAULT_PAGE_SIZE;

    let (rows, total) =
        RegistrationService::list_for_user(state.storage(), &auth_user.id, page, per_page).await?;

    Ok(Json(MyRegistrationsResponse {
        registrations: rows
            .into_iter()
            .map(|(registration, event)| RegistrationResponse::new(registration, event))
            .collect(),
        total,
        page,
        per_page,
        last_page: last_page(total, per_page),
    }))
}
