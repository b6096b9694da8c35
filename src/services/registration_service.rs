//! Registration coordinator
//!
//! Decides whether a registration attempt succeeds, reactivates a prior
//! cancellation, or is rejected, without ever letting the registered-count of
//! an event exceed its `max_participants`.
//!
//! The protocol has two stages:
//!
//! 1. **Fast path** (no lock): reject past events and active duplicates early.
//!    These checks are advisory, state may change before stage 2.
//! 2. **Authoritative section**: the storage backend re-reads capacity and the
//!    existing (user, event) row under a per-event exclusivity guarantee, calls
//!    [`decide`], and commits the outcome atomically.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    db::Storage,
    error::{AppError, AppResult},
    models::{Capacity, Event, Registration},
};

/// What the authoritative section must write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Insert a fresh `registered` row
    Create,
    /// Flip the existing cancelled row back to `registered`
    Reactivate(Uuid),
}

/// The accept/reject rule of the authoritative section.
///
/// Must only be called with a capacity snapshot and row read under the
/// event's exclusivity guarantee.
pub fn decide(capacity: Capacity, existing: Option<&Registration>) -> AppResult<Decision> {
    if capacity.is_full() {
        return Err(AppError::EventFull);
    }

    match existing {
        None => Ok(Decision::Create),
        Some(registration) if registration.is_cancelled() => {
            Ok(Decision::Reactivate(registration.id))
        }
        Some(_) => Err(AppError::AlreadyRegistered),
    }
}

/// Registration service for business logic
pub struct RegistrationService;

impl RegistrationService {
    /// Register `user_id` for `event_id`
    pub async fn register(
        storage: &dyn Storage,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> AppResult<(Registration, Event)> {
        let event = storage
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        if !event.is_upcoming() {
            debug!(%user_id, %event_id, "Registration rejected: event already started");
            return Err(AppError::PastEvent);
        }

        if storage
            .find_registration_for(user_id, event_id)
            .await?
            .is_some_and(|r| r.is_registered())
        {
            debug!(%user_id, %event_id, "Registration rejected: already registered");
            return Err(AppError::AlreadyRegistered);
        }

        let registration = storage
            .register_exclusive(user_id, event_id, Utc::now())
            .await
            .inspect_err(|e| debug!(%user_id, %event_id, error = %e, "Registration rejected"))?;

        info!(
            %user_id,
            %event_id,
            registration_id = %registration.id,
            "User registered for event"
        );

        Ok((registration, event))
    }

    /// Cancel a registration owned by `requester_id`.
    ///
    /// Cancelling an already cancelled registration succeeds without writing.
    pub async fn cancel(
        storage: &dyn Storage,
        requester_id: &Uuid,
        registration_id: &Uuid,
    ) -> AppResult<Registration> {
        let registration = storage
            .find_registration(registration_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        if registration.user_id != *requester_id {
            return Err(AppError::Forbidden(
                "Cannot cancel other users' registrations".to_string(),
            ));
        }

        if registration.is_cancelled() {
            return Ok(registration);
        }

        let cancelled = storage.cancel_registration(registration_id).await?;

        info!(
            user_id = %requester_id,
            event_id = %cancelled.event_id,
            registration_id = %cancelled.id,
            "Registration cancelled"
        );

        Ok(cancelled)
    }

    /// List the user's active registrations, newest first
    pub async fn list_for_user(
        storage: &dyn Storage,
        user_id: &Uuid,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<(Registration, Event)>, i64)> {
        let offset = (i64::from(page) - 1) * i64::from(per_page);
        storage
            .list_user_registrations(user_id, offset, i64::from(per_page))
            .await
    }
}
