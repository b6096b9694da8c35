//! Event request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::{
    constants::{MAX_EVENT_DESCRIPTION_LENGTH, MAX_EVENT_LOCATION_LENGTH, MAX_EVENT_TITLE_LENGTH},
    utils::{validate_event_status, validate_not_blank},
};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Create event request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(
        length(min = 1, max = MAX_EVENT_TITLE_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = MAX_EVENT_DESCRIPTION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub description: String,

    #[validate(
        length(min = 1, max = MAX_EVENT_LOCATION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub location: String,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    /// Seat limit; absent or null means unbounded
    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,

    #[validate(url)]
    pub image_url: Option<String>,

    /// Defaults to `active`
    #[validate(custom(function = "validate_event_status"))]
    pub status: Option<String>,
}

/// Update event request; every field is optional
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(
        length(min = 1, max = MAX_EVENT_TITLE_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,

    #[validate(
        length(min = 1, max = MAX_EVENT_DESCRIPTION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub description: Option<String>,

    #[validate(
        length(min = 1, max = MAX_EVENT_LOCATION_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub location: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    /// `null` removes the seat limit
    #[serde(default, deserialize_with = "deserialize_some")]
    pub max_participants: Option<Option<i32>>,

    /// `null` removes the image
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image_url: Option<Option<String>>,

    #[validate(custom(function = "validate_event_status"))]
    pub status: Option<String>,
}

/// List events query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    /// Events starting on or after this date
    pub start_date: Option<String>,
    /// Events ending on or before this date
    pub end_date: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
