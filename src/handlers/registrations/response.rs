//! Registration response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Event, Registration};

/// Event fields embedded in registration payloads
#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
}

impl From<Event> for EventSummary {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            location: event.location,
            start_date: event.start_date,
            end_date: event.end_date,
            status: event.status,
        }
    }
}

/// Registration with its event
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub event: EventSummary,
}

impl RegistrationResponse {
    pub fn new(registration: Registration, event: Event) -> Self {
        Self {
            id: registration.id,
            user_id: registration.user_id,
            event_id: registration.event_id,
            status: registration.status,
            registered_at: registration.registered_at,
            event: event.into(),
        }
    }
}

/// Body of a successful registration
#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub message: String,
    #[serde(flatten)]
    pub registration: RegistrationResponse,
}

/// Outcome of a cancellation
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
    pub registration_id: Uuid,
    pub status: String,
}

/// Paginated list of the caller's registrations
#[derive(Debug, Serialize)]
pub struct MyRegistrationsResponse {
    pub registrations: Vec<RegistrationResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub last_page: i64,
}
