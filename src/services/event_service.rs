//! Event service

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::ValidateUrl;

use crate::{
    constants::{event_sort_columns, event_statuses, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    db::Storage,
    error::{AppError, AppResult},
    handlers::events::{
        request::{CreateEventRequest, ListEventsQuery, UpdateEventRequest},
        response::{EventDetailResponse, EventResponse, EventsListResponse},
    },
    models::{Event, EventChanges, EventFilter, NewEvent, SortOrder},
    utils::{last_page, parse_datetime},
};

/// Event service for business logic
pub struct EventService;

impl EventService {
    /// Create a new event
    pub async fn create_event(
        storage: &dyn Storage,
        payload: CreateEventRequest,
    ) -> AppResult<EventResponse> {
        if payload.start_date <= Utc::now() {
            return Err(AppError::Validation(
                "Start date must be in the future".to_string(),
            ));
        }
        if payload.end_date <= payload.start_date {
            return Err(AppError::Validation(
                "End date must be after start date".to_string(),
            ));
        }

        let event = storage
            .create_event(NewEvent {
                title: payload.title,
                description: payload.description,
                location: payload.location,
                start_date: payload.start_date,
                end_date: payload.end_date,
                max_participants: payload.max_participants,
                image_url: payload.image_url,
                status: payload
                    .status
                    .unwrap_or_else(|| event_statuses::ACTIVE.to_string()),
            })
            .await?;

        info!(event_id = %event.id, title = %event.title, "Event created");

        let capacity = event.capacity(0);
        Ok(EventResponse::new(event, capacity))
    }

    /// Get event by ID with its attendees
    pub async fn get_event(storage: &dyn Storage, id: &Uuid) -> AppResult<EventDetailResponse> {
        let event = Self::find_event(storage, id).await?;

        let attendees = storage.list_attendees(id).await?;
        let capacity = event.capacity(attendees.len() as i64);

        Ok(EventDetailResponse {
            event: EventResponse::new(event, capacity),
            attendees,
        })
    }

    /// Update event
    pub async fn update_event(
        storage: &dyn Storage,
        id: &Uuid,
        payload: UpdateEventRequest,
    ) -> AppResult<EventResponse> {
        if matches!(payload.max_participants, Some(Some(max)) if max < 1) {
            return Err(AppError::Validation(
                "max_participants must be at least 1".to_string(),
            ));
        }
        if matches!(&payload.image_url, Some(Some(url)) if !url.validate_url()) {
            return Err(AppError::Validation("image_url must be a valid URL".to_string()));
        }

        let mut event = Self::find_event(storage, id).await?;

        EventChanges {
            title: payload.title,
            description: payload.description,
            location: payload.location,
            start_date: payload.start_date,
            end_date: payload.end_date,
            max_participants: payload.max_participants,
            image_url: payload.image_url,
            status: payload.status,
        }
        .apply_to(&mut event);

        if event.end_date <= event.start_date {
            return Err(AppError::Validation(
                "End date must be after start date".to_string(),
            ));
        }

        let updated = storage.save_event(&event).await?;
        let registered_count = storage.registered_count(id).await?;

        info!(event_id = %updated.id, "Event updated");

        let capacity = updated.capacity(registered_count);
        Ok(EventResponse::new(updated, capacity))
    }

    /// Delete event together with its registrations
    pub async fn delete_event(storage: &dyn Storage, id: &Uuid) -> AppResult<()> {
        storage.delete_event(id).await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// List active upcoming events
    pub async fn list_events(
        storage: &dyn Storage,
        query: ListEventsQuery,
    ) -> AppResult<EventsListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let filter = EventFilter {
            search: non_empty(query.search),
            location: non_empty(query.location),
            starts_after: parse_date_param("start_date", query.start_date)?,
            ends_before: parse_date_param("end_date", query.end_date)?,
            sort_by: query
                .sort_by
                .as_deref()
                .and_then(|s| event_sort_columns::ALL.iter().find(|c| **c == s).copied())
                .unwrap_or(event_sort_columns::START_DATE),
            sort_order: match query.sort_order.as_deref() {
                Some(o) if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
                _ => SortOrder::Asc,
            },
            offset: (i64::from(page) - 1) * i64::from(per_page),
            limit: i64::from(per_page),
        };

        let (rows, total) = storage.list_events(&filter, Utc::now()).await?;

        Ok(EventsListResponse {
            events: rows.into_iter().map(EventResponse::from).collect(),
            total,
            page,
            per_page,
            last_page: last_page(total, per_page),
        })
    }

    async fn find_event(storage: &dyn Storage, id: &Uuid) -> AppResult<Event> {
        storage
            .find_event(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_date_param(
    name: &str,
    value: Option<String>,
) -> AppResult<Option<chrono::DateTime<Utc>>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => parse_datetime(&raw)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{name} must be a valid date"))),
    }
}
