//! Utility functions

pub mod time;
pub mod validation;

pub use time::{last_page, parse_datetime};
pub use validation::{validate_event_status, validate_not_blank};
