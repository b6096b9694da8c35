//! Database module
//!
//! This module handles database connections, migrations, repositories and the
//! storage abstraction the services run against.

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod repositories;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Attendee, Event, EventFilter, EventWithCount, NewEvent, Registration, User},
};

pub use connection::*;
pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Persistence used by the services.
///
/// Every backend must give [`Storage::register_exclusive`] a per-event
/// exclusivity guarantee: two calls for the same event never evaluate
/// capacity interleaved, calls for different events never wait on each other.
#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> AppResult<User>;

    async fn find_user_by_id(&self, id: &Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    // Events
    async fn create_event(&self, event: NewEvent) -> AppResult<Event>;

    async fn find_event(&self, id: &Uuid) -> AppResult<Option<Event>>;

    /// Persist every mutable field of `event`
    async fn save_event(&self, event: &Event) -> AppResult<Event>;

    /// Delete an event and, by cascade, its registrations
    async fn delete_event(&self, id: &Uuid) -> AppResult<()>;

    /// Active, upcoming events matching `filter`, plus the total match count
    async fn list_events(
        &self,
        filter: &EventFilter,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<EventWithCount>, i64)>;

    /// Number of `registered` rows for the event
    async fn registered_count(&self, event_id: &Uuid) -> AppResult<i64>;

    async fn list_attendees(&self, event_id: &Uuid) -> AppResult<Vec<Attendee>>;

    // Registrations
    async fn find_registration(&self, id: &Uuid) -> AppResult<Option<Registration>>;

    async fn find_registration_for(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> AppResult<Option<Registration>>;

    /// Run the authoritative registration section for (user, event).
    ///
    /// Re-reads capacity and the existing row under the event's exclusivity
    /// guarantee, applies [`crate::services::registration_service::decide`]
    /// and commits the resulting insert or reactivation atomically.
    async fn register_exclusive(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Registration>;

    /// Mark a registration cancelled
    async fn cancel_registration(&self, id: &Uuid) -> AppResult<Registration>;

    /// A user's `registered` rows, newest first, with their events
    async fn list_user_registrations(
        &self,
        user_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<(Registration, Event)>, i64)>;
}
