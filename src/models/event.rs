//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::event_statuses;

/// Event database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: Option<i32>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event starts after `now`
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date > now
    }

    /// Whether the event has not started yet
    pub fn is_upcoming(&self) -> bool {
        self.is_upcoming_at(Utc::now())
    }

    /// Check if the event is open for business
    pub fn is_active(&self) -> bool {
        self.status == event_statuses::ACTIVE
    }

    /// Capacity view given the number of currently registered users
    pub fn capacity(&self, registered_count: i64) -> Capacity {
        Capacity {
            max_participants: self.max_participants,
            registered_count,
        }
    }
}

/// Capacity of an event at one point in time.
///
/// Always computed from a fresh count of `registered` rows, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub max_participants: Option<i32>,
    pub registered_count: i64,
}

impl Capacity {
    /// Remaining seats, `None` when the event is unbounded
    pub fn available_spots(&self) -> Option<i64> {
        self.max_participants
            .map(|max| i64::from(max) - self.registered_count)
    }

    /// Check if no further registrations fit
    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.registered_count >= i64::from(max))
    }
}

/// Event together with its current registered-count
#[derive(Debug, Clone, FromRow)]
pub struct EventWithCount {
    #[sqlx(flatten)]
    pub event: Event,
    pub registered_count: i64,
}

impl EventWithCount {
    pub fn capacity(&self) -> Capacity {
        self.event.capacity(self.registered_count)
    }
}

/// Fields of a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: Option<i32>,
    pub image_url: Option<String>,
    pub status: String,
}

/// Partial update of an event.
///
/// Doubly optional fields distinguish "leave as is" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_participants: Option<Option<i32>>,
    pub image_url: Option<Option<String>>,
    pub status: Option<String>,
}

impl EventChanges {
    /// Apply the changes onto an in-memory copy of the event
    pub fn apply_to(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(start_date) = self.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            event.end_date = end_date;
        }
        if let Some(max_participants) = self.max_participants {
            event.max_participants = max_participants;
        }
        if let Some(image_url) = self.image_url {
            event.image_url = image_url;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
    }
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filters for the public event listing
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub starts_after: Option<DateTime<Utc>>,
    pub ends_before: Option<DateTime<Utc>>,
    /// One of `constants::event_sort_columns::ALL`
    pub sort_by: &'static str,
    pub sort_order: SortOrder,
    pub offset: i64,
    pub limit: i64,
}
