//! Event response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Attendee, Capacity, Event, EventWithCount};

/// Event with its derived capacity attributes
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: Option<i32>,
    pub image_url: Option<String>,
    pub status: String,
    pub registration_count: i64,
    pub available_spots: Option<i64>,
    pub is_full: bool,
    pub is_upcoming: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn new(event: Event, capacity: Capacity) -> Self {
        Self {
            is_upcoming: event.is_upcoming(),
            registration_count: capacity.registered_count,
            available_spots: capacity.available_spots(),
            is_full: capacity.is_full(),
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            start_date: event.start_date,
            end_date: event.end_date,
            max_participants: event.max_participants,
            image_url: event.image_url,
            status: event.status,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<EventWithCount> for EventResponse {
    fn from(row: EventWithCount) -> Self {
        let capacity = row.capacity();
        Self::new(row.event, capacity)
    }
}

/// Single event with its current attendees
#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub attendees: Vec<Attendee>,
}

/// Paginated event listing
#[derive(Debug, Serialize)]
pub struct EventsListResponse {
    pub events: Vec<EventResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub last_page: i64,
}

/// Plain confirmation message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
