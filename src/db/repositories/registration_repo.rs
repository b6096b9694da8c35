//! Registration repository

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::registration_statuses,
    error::{AppError, AppResult},
    models::{Event, Registration},
    services::registration_service::{decide, Decision},
};

/// Repository for registration database operations
pub struct RegistrationRepository;

impl RegistrationRepository {
    /// Find registration by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Registration>> {
        let registration =
            sqlx::query_as::<_, Registration>(r#"SELECT * FROM registrations WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(registration)
    }

    /// Find the row for a (user, event) pair regardless of status
    pub async fn find_for(
        pool: &PgPool,
        user_id: &Uuid,
        event_id: &Uuid,
    ) -> AppResult<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"SELECT * FROM registrations WHERE user_id = $1 AND event_id = $2"#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

        Ok(registration)
    }

    /// Register a user for an event inside one transaction.
    ///
    /// `FOR UPDATE` on the event row queues concurrent registrations for the
    /// same event behind each other; other events are untouched. Any early
    /// return (or a dropped future) rolls the transaction back.
    pub async fn register_exclusive(
        pool: &PgPool,
        user_id: &Uuid,
        event_id: &Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Registration> {
        let mut tx = pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1 FOR UPDATE"#)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let registered_count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = $2"#,
        )
        .bind(event_id)
        .bind(registration_statuses::REGISTERED)
        .fetch_one(&mut *tx)
        .await?;

        let existing = sqlx::query_as::<_, Registration>(
            r#"SELECT * FROM registrations WHERE user_id = $1 AND event_id = $2"#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let registration = match decide(event.capacity(registered_count), existing.as_ref())? {
            Decision::Create => sqlx::query_as::<_, Registration>(
                r#"
                INSERT INTO registrations (user_id, event_id, status, registered_at)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(event_id)
            .bind(registration_statuses::REGISTERED)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_registration_write)?,
            Decision::Reactivate(id) => sqlx::query_as::<_, Registration>(
                r#"
                UPDATE registrations
                SET status = $2, registered_at = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(registration_statuses::REGISTERED)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_registration_write)?,
        };

        tx.commit().await.map_err(AppError::from_registration_write)?;

        Ok(registration)
    }

    /// Mark a registration cancelled
    pub async fn cancel(pool: &PgPool, id: &Uuid) -> AppResult<Registration> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(registration_statuses::CANCELLED)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        Ok(registration)
    }

    /// List a user's active registrations with their events, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<(Registration, Event)>, i64)> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"
            SELECT * FROM registrations
            WHERE user_id = $1 AND status = $2
            ORDER BY created_at DESC, id
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(registration_statuses::REGISTERED)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM registrations WHERE user_id = $1 AND status = $2"#,
        )
        .bind(user_id)
        .bind(registration_statuses::REGISTERED)
        .fetch_one(pool)
        .await?;

        let event_ids: Vec<Uuid> = registrations.iter().map(|r| r.event_id).collect();
        let mut events: HashMap<Uuid, Event> =
            sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = ANY($1)"#)
                .bind(&event_ids)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(|e| (e.id, e))
                .collect();

        // Rows whose event was deleted between the two queries are skipped
        let rows = registrations
            .into_iter()
            .filter_map(|r| events.remove(&r.event_id).map(|e| (r, e)))
            .collect();

        Ok((rows, total))
    }
}
