//! Event repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::{event_sort_columns, event_statuses, registration_statuses},
    error::{AppError, AppResult},
    models::{Attendee, Event, EventFilter, EventWithCount, NewEvent, SortOrder},
};

/// Repository for event database operations
pub struct EventRepository;

impl EventRepository {
    /// Create a new event
    pub async fn create(pool: &PgPool, event: &NewEvent) -> AppResult<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                title, description, location, start_date, end_date,
                max_participants, image_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.max_participants)
        .bind(&event.image_url)
        .bind(&event.status)
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(event)
    }

    /// Overwrite the mutable columns of an event
    pub async fn update(pool: &PgPool, event: &Event) -> AppResult<Event> {
        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
                title = $2,
                description = $3,
                location = $4,
                start_date = $5,
                end_date = $6,
                max_participants = $7,
                image_url = $8,
                status = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.max_participants)
        .bind(&event.image_url)
        .bind(&event.status)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        Ok(updated)
    }

    /// Delete event (registrations go with it via ON DELETE CASCADE)
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        let result = sqlx::query(r#"DELETE FROM events WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        Ok(())
    }

    /// List active upcoming events with pagination
    pub async fn list(
        pool: &PgPool,
        filter: &EventFilter,
        now: DateTime<Utc>,
    ) -> AppResult<(Vec<EventWithCount>, i64)> {
        let search_pattern = filter.search.as_deref().map(contains_pattern);
        let location_pattern = filter.location.as_deref().map(contains_pattern);

        // Only whitelisted identifiers are interpolated
        let sort_column = if event_sort_columns::ALL.contains(&filter.sort_by) {
            filter.sort_by
        } else {
            event_sort_columns::START_DATE
        };
        let direction = match filter.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let query = format!(
            r#"
            SELECT e.*,
                (SELECT COUNT(*) FROM registrations r
                 WHERE r.event_id = e.id AND r.status = $1) AS registered_count
            FROM events e
            WHERE
                e.status = $2
                AND e.start_date > $3
                AND ($4::text IS NULL
                     OR e.title ILIKE $4 ESCAPE '\'
                     OR e.description ILIKE $4 ESCAPE '\'
                     OR e.location ILIKE $4 ESCAPE '\')
                AND ($5::text IS NULL OR e.location ILIKE $5 ESCAPE '\')
                AND ($6::timestamptz IS NULL OR e.start_date >= $6)
                AND ($7::timestamptz IS NULL OR e.end_date <= $7)
            ORDER BY e.{sort_column} {direction}, e.id
            OFFSET $8 LIMIT $9
            "#
        );

        let events = sqlx::query_as::<_, EventWithCount>(&query)
            .bind(registration_statuses::REGISTERED)
            .bind(event_statuses::ACTIVE)
            .bind(now)
            .bind(&search_pattern)
            .bind(&location_pattern)
            .bind(filter.starts_after)
            .bind(filter.ends_before)
            .bind(filter.offset)
            .bind(filter.limit)
            .fetch_all(pool)
            .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM events e
            WHERE
                e.status = $1
                AND e.start_date > $2
                AND ($3::text IS NULL OR e.title ILIKE $3 OR e.description ILIKE $3 OR e.location ILIKE $3)
                AND ($4::text IS NULL OR e.location ILIKE $4)
                AND ($5::timestamptz IS NULL OR e.start_date >= $5)
                AND ($6::timestamptz IS NULL OR e.end_date <= $6)
            "#,
        )
        .bind(event_statuses::ACTIVE)
        .bind(now)
        .bind(&search_pattern)
        .bind(&location_pattern)
        .bind(filter.starts_after)
        .bind(filter.ends_before)
        .fetch_one(pool)
        .await?;

        Ok((events, count))
    }

    /// Count registrations currently holding a seat
    pub async fn registered_count(pool: &PgPool, event_id: &Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = $2"#,
        )
        .bind(event_id)
        .bind(registration_statuses::REGISTERED)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// List registered attendees in registration order
    pub async fn list_attendees(pool: &PgPool, event_id: &Uuid) -> AppResult<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(
            r#"
            SELECT
                r.id AS registration_id,
                r.user_id,
                u.name,
                r.registered_at
            FROM registrations r
            JOIN users u ON r.user_id = u.id
            WHERE r.event_id = $1 AND r.status = $2
            ORDER BY r.registered_at
            "#,
        )
        .bind(event_id)
        .bind(registration_statuses::REGISTERED)
        .fetch_all(pool)
        .await?;

        Ok(attendees)
    }
}

/// `ILIKE` pattern matching `term` literally anywhere in the column
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
