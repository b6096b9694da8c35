//! In-process storage
//!
//! Used by the test suite and for running the API without a database. The
//! registration section is serialized per event with an explicit async mutex
//! keyed by event id, giving the same exclusivity the Postgres backend gets
//! from `SELECT ... FOR UPDATE`.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Storage;
use crate::{
    constants::{event_sort_columns, registration_statuses},
    error::{AppError, AppResult},
    models::{
        Attendee, Event, EventFilter, EventWithCount, NewEvent, Registration, SortOrder, User,
    },
    services::registration_service::{decide, Decision},
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, Event>,
    registrations: HashMap<Uuid, Registration>,
}

impl Tables {
    fn registered_count(&self, event_id: &Uuid) -> i64 {
        self.registrations
            .values()
            .filter(|r| r.event_id == *event_id && r.is_registered())
            .count() as i64
    }

    fn find_for(&self, user_id: &Uuid, event_id: &Uuid) -> Option<&Registration> {
        self.registrations
            .values()
            .find(|r| r.user_id == *user_id && r.event_id == *event_id)
    }

    fn apply(
        &mut self,
        decision: Decision,
        user_id: &Uuid,
        event_id: &Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Registration> {
        match decision {
            Decision::Create => {
                let registration = Registration {
                    id: Uuid::new_v4(),
                    user_id: *user_id,
                    event_id: *event_id,
                    status: registration_statuses::REGISTERED.to_string(),
                    registered_at: now,
                    created_at: now,
                    updated_at: now,
                };
                self.registrations.insert(registration.id, registration.clone());
                Ok(registration)
            }
            Decision::Reactivate(id) => {
                let registration = self.registrations.get_mut(&id).ok_or_else(|| {
                    AppError::Conflict("Registration changed concurrently, please retry".to_string())
                })?;
                registration.status = registration_statuses::REGISTERED.to_string();
                registration.registered_at = now;
                registration.updated_at = now;
                Ok(registration.clone())
            }
        }
    }
}

/// Storage kept entirely in process memory
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
    event_locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

fn poisoned() -> AppError {
    AppError::Internal(anyhow::anyhow!("in-memory storage lock poisoned"))
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| poisoned())
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| poisoned())
    }

    /// The mutex guarding registrations for one event.
    ///
    /// Entries are only created for stored events. `delete_event` removes the
    /// event before its entry, so holding `event_locks` across the existence
    /// check keeps unknown ids out of the map.
    pub(crate) fn event_lock(&self, event_id: &Uuid) -> AppResult<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self.event_locks.lock().map_err(|_| poisoned())?;
        if !self.read()?.events.contains_key(event_id) {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        Ok(locks.entry(*event_id).or_default().clone())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn compare_events(a: &Event, b: &Event, sort_by: &str) -> Ordering {
    match sort_by {
        event_sort_columns::END_DATE => a.end_date.cmp(&b.end_date),
        event_sort_columns::TITLE => a.title.cmp(&b.title),
        event_sort_columns::LOCATION => a.location.cmp(&b.location),
        event_sort_columns::CREATED_AT => a.created_at.cmp(&b.created_at),
        _ => a.start_date.cmp(&b.start_date),
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> AppResult<User> {
        let mut tables = self.write()?;

        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AppError::AlreadyExists("Resource already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: &Uuid) -> AppResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_event(&self, event: NewEvent) -> AppResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: event.title,
            description: event.description,
            location: event.location,
            start_date: event.start_date,
            end_date: event.end_date,
            max_participants: event.max_participants,
            image_url: event.image_url,
            status: event.status,
            created_at: now,
            updated_at: now,
        };
        self.write()?.events.insert(event.id, event.clone());

        Ok(event)
    }

    async fn find_event(&self, id: &Uuid) -> AppResult<Option<Event>> {
        Ok(self.read()?.events.get(id).cloned())
    }

    async fn save_event(&self, event: &Event) -> AppResult<Event> {
        let mut tables = self.write()?;
        let stored = tables
            .events
            .get_mut(&event.id)
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        *stored = Event {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..event.clone()
        };

        Ok(stored.clone())
    }

    async fn delete_event(&self, id: &Uuid) -> AppResult<()> {
        {
            let mut tables = self.write()?;
            if tables.events.remove(id).is_none() {
                return Err(AppError::NotFound("Event not found".to_string()));
            }
            tables.registrations.retain(|_, r| r.event_id != *id);
        }

        self.event_locks.lock().map_err(|_| poisoned())?.remove(id);

        Ok(())
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<EventWithCount>, i64)> {
        let tables = self.read()?;

        let mut matching: Vec<&Event> = tables
            .events
            .values()
            .filter(|e| e.is_active() && e.is_upcoming_at(now))
            .filter(|e| {
                filter.search.as_deref().is_none_or(|s| {
                    contains_ci(&e.title, s)
                        || contains_ci(&e.description, s)
                        || contains_ci(&e.location, s)
                })
            })
            .filter(|e| {
                filter
                    .location
                    .as_deref()
                    .is_none_or(|l| contains_ci(&e.location, l))
            })
            .filter(|e| filter.starts_after.is_none_or(|t| e.start_date >= t))
            .filter(|e| filter.ends_before.is_none_or(|t| e.end_date <= t))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare_events(a, b, filter.sort_by);
            let ordering = match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .map(|e| EventWithCount {
                event: e.clone(),
                registered_count: tables.registered_count(&e.id),
            })
            .collect();

        Ok((page, total))
    }

    async fn registered_count(&self, event_id: &Uuid) -> AppResult<i64> {
        Ok(self.read()?.registered_count(event_id))
    }

    async fn list_attendees(&self, event_id: &Uuid) -> AppResult<Vec<Attendee>> {
        let tables = self.read()?;

        let mut attendees: Vec<Attendee> = tables
            .registrations
            .values()
            .filter(|r| r.event_id == *event_id && r.is_registered())
            .filter_map(|r| {
                tables.users.get(&r.user_id).map(|u| Attendee {
                    registration_id: r.id,
                    user_id: r.user_id,
                    name: u.name.clone(),
                    registered_at: r.registered_at,
                })
            })
            .collect();
        attendees.sort_by_key(|a| a.registered_at);

        Ok(attendees)
    }

    async fn find_registration(&self, id: &Uuid) -> AppResult<Option<Registration>> {
        Ok(self.read()?.registrations.get(id).cloned())
    }

    async fn find_registration_for(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> AppResult<Option<Registration>> {
        Ok(self.read()?.find_for(user_id, event_id).cloned())
    }

    async fn register_exclusive(
        &self,
        user_id: &Uuid,
        event_id: &Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Registration> {
        let lock = self.event_lock(event_id)?;
        let _exclusive = lock.lock().await;

        // Snapshot and write happen under separate table locks; the event
        // mutex keeps the snapshot valid until the write lands. No await
        // point follows, so a dropped request cannot leave partial state.
        let decision = {
            let tables = self.read()?;
            let event = tables
                .events
                .get(event_id)
                .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
            let capacity = event.capacity(tables.registered_count(event_id));
            decide(capacity, tables.find_for(user_id, event_id))?
        };

        let mut tables = self.write()?;
        if !tables.events.contains_key(event_id) {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        tables.apply(decision, user_id, event_id, now)
    }

    async fn cancel_registration(&self, id: &Uuid) -> AppResult<Registration> {
        let mut tables = self.write()?;
        let registration = tables
            .registrations
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        registration.status = registration_statuses::CANCELLED.to_string();
        registration.updated_at = Utc::now();

        Ok(registration.clone())
    }

    async fn list_user_registrations(
        &self,
        user_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<(Registration, Event)>, i64)> {
        let tables = self.read()?;

        let mut mine: Vec<&Registration> = tables
            .registrations
            .values()
            .filter(|r| r.user_id == *user_id && r.is_registered())
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = mine.len() as i64;
        let rows = mine
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|r| {
                tables
                    .events
                    .get(&r.event_id)
                    .map(|e| (r.clone(), e.clone()))
            })
            .collect();

        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::event_statuses;
    use chrono::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn new_event(title: &str, location: &str, starts_in: Duration) -> NewEvent {
        let start = Utc::now() + starts_in;
        NewEvent {
            title: title.to_string(),
            description: format!("{title} description"),
            location: location.to_string(),
            start_date: start,
            end_date: start + Duration::hours(3),
            max_participants: None,
            image_url: None,
            status: event_statuses::ACTIVE.to_string(),
        }
    }

    fn filter() -> EventFilter {
        EventFilter {
            sort_by: event_sort_columns::START_DATE,
            limit: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let storage = MemoryStorage::new();
        assert_ok!(storage.create_user("Ann", "ann@example.com", "hash", "user").await);

        let err = assert_err!(storage.create_user("Ann", "ANN@example.com", "hash", "user").await);
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_hides_past_and_inactive_events() {
        let storage = MemoryStorage::new();
        storage.create_event(new_event("Future", "Oslo", Duration::days(2))).await.unwrap();
        storage.create_event(new_event("Past", "Oslo", -Duration::days(2))).await.unwrap();
        let mut cancelled = new_event("Cancelled", "Oslo", Duration::days(3));
        cancelled.status = event_statuses::CANCELLED.to_string();
        storage.create_event(cancelled).await.unwrap();

        let (events, total) = storage.list_events(&filter(), Utc::now()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(events[0].event.title, "Future");
    }

    #[tokio::test]
    async fn test_list_search_sort_and_paginate() {
        let storage = MemoryStorage::new();
        storage.create_event(new_event("Rust Night", "Berlin", Duration::days(1))).await.unwrap();
        storage.create_event(new_event("Go Night", "Berlin", Duration::days(2))).await.unwrap();
        storage.create_event(new_event("Rust Conf", "Paris", Duration::days(3))).await.unwrap();

        let mut f = filter();
        f.search = Some("rust".to_string());
        let (events, total) = storage.list_events(&f, Utc::now()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(events[0].event.title, "Rust Night");

        let mut f = filter();
        f.location = Some("berlin".to_string());
        f.sort_order = SortOrder::Desc;
        let (events, _) = storage.list_events(&f, Utc::now()).await.unwrap();
        assert_eq!(events[0].event.title, "Go Night");

        let mut f = filter();
        f.sort_by = event_sort_columns::TITLE;
        f.offset = 1;
        f.limit = 1;
        let (events, total) = storage.list_events(&f, Utc::now()).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.title, "Rust Conf");
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let storage = MemoryStorage::new();
        storage.create_event(new_event("100% Rock", "Oslo", Duration::days(1))).await.unwrap();
        storage.create_event(new_event("1000 Rock", "Oslo", Duration::days(2))).await.unwrap();

        let mut f = filter();
        f.search = Some("100%".to_string());
        let (events, total) = storage.list_events(&f, Utc::now()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(events[0].event.title, "100% Rock");
    }

    #[tokio::test]
    async fn test_unknown_event_leaves_no_lock_behind() {
        let storage = MemoryStorage::new();
        let user = storage.create_user("Cy", "cy@example.com", "hash", "user").await.unwrap();

        for _ in 0..20 {
            let err = assert_err!(
                storage
                    .register_exclusive(&user.id, &Uuid::new_v4(), Utc::now())
                    .await
            );
            assert!(matches!(err, AppError::NotFound(_)));
        }

        assert!(storage.event_locks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_event_releases_its_lock() {
        let storage = MemoryStorage::new();
        let user = storage.create_user("Di", "di@example.com", "hash", "user").await.unwrap();
        let event = storage
            .create_event(new_event("Gone", "Lima", Duration::days(1)))
            .await
            .unwrap();
        assert_ok!(storage.register_exclusive(&user.id, &event.id, Utc::now()).await);
        assert_eq!(storage.event_locks.lock().unwrap().len(), 1);

        storage.delete_event(&event.id).await.unwrap();
        let err = assert_err!(storage.register_exclusive(&user.id, &event.id, Utc::now()).await);

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(storage.event_locks.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reactivating_vanished_row_is_retryable_conflict() {
        let mut tables = Tables::default();
        let err = assert_err!(tables.apply(
            Decision::Reactivate(Uuid::new_v4()),
            &Uuid::new_v4(),
            &Uuid::new_v4(),
            Utc::now(),
        ));

        assert!(matches!(err, AppError::Conflict(_)));
        assert!(err.is_retryable());
        assert!(tables.registrations.is_empty());
    }

    #[tokio::test]
    async fn test_delete_event_cascades_registrations() {
        let storage = MemoryStorage::new();
        let user = storage.create_user("Bo", "bo@example.com", "hash", "user").await.unwrap();
        let event = storage
            .create_event(new_event("Meetup", "Rome", Duration::days(1)))
            .await
            .unwrap();
        let registration = storage
            .register_exclusive(&user.id, &event.id, Utc::now())
            .await
            .unwrap();

        storage.delete_event(&event.id).await.unwrap();

        assert!(storage.find_registration(&registration.id).await.unwrap().is_none());
        assert!(matches!(
            storage.delete_event(&event.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
