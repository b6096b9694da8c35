//! Registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::registration_statuses;

/// A user's relationship to an event; at most one row per (user, event)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Check if the registration currently holds a seat
    pub fn is_registered(&self) -> bool {
        self.status == registration_statuses::REGISTERED
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == registration_statuses::CANCELLED
    }
}

/// Registered attendee of an event
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attendee {
    pub registration_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}
