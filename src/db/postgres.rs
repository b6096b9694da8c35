//! PostgreSQL-backed storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    repositories::{EventRepository, RegistrationRepository, UserRepository},
    Storage,
};
use crate::{
    error::AppResult,
    models::{Attendee, Event, EventFilter, EventWithCount, NewEvent, Registration, User},
};

/// Storage served by the sqlx repositories
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> AppResult<User> {
        UserRepository::create(&self.pool, name, email, password_hash, role).await
    }

    async fn find_user_by_id(&self, id: &Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_email(&self.pool, email).await
    }

    async fn create_event(&self, event: NewEvent) -> AppResult<Event> {
        EventRepository::create(&self.pool, &event).await
    }

    async fn find_event(&self, id: &Uuid) -> AppResult<Option<Event>> {
        EventRepository::find_by_id(&self.pool, id).await
    }

    async fn save_event(&self, event: &Event) -> AppResult<Event> {
        EventRepository::update(&self.pool, event).await
    }

    async fn delete_event(&self, id: &Uuid) -> AppResult<()> {
        EventRepository::delete(&self.pool, id).await
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<EventWithCount>, i64)> {
        EventRepository::list(&self.pool, filter, now).await
    }

    async fn registered_count(&self, event_id: &Uuid) -> AppResult<i64> {
        EventRepository::registered_count(&self.pool, event_id).await
    }

    async fn list_attendees(&self, event_id: &Uuid) -> AppResult<Vec<Attendee>> {
        EventRepository::list_attendees(&self.pool, event_id).await
    }

    async fn find_registration(&self, id: &Uuid) -> AppResult<Option<Registration>> {
        RegistrationRepository::find_by_id(&self.pool, id).await
    }

    async fn find_registration_for(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> AppResult<Option<Registration>> {
        RegistrationRepository::find_for(&self.pool, user_id, event_id).await
    }

    async fn register_exclusive(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Registration> {
        RegistrationRepository::register_exclusive(&self.pool, user_id, event_id, now).await
    }

    async fn cancel_registration(&self, id: &Uuid) -> AppResult<Registration> {
        RegistrationRepository::cancel(&self.pool, id).await
    }

    async fn list_user_registrations(
        &self,
        user_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<(Registration, Event)>, i64)> {
        RegistrationRepository::list_for_user(&self.pool, user_id, offset, limit).await
    }
}
