//! Input validation utilities
//!
//! Custom validators plugged into `#[validate(custom(...))]` on request DTOs.

use validator::ValidationError;

use crate::constants;

/// Validate event status
pub fn validate_event_status(status: &str) -> Result<(), ValidationError> {
    if constants::event_statuses::ALL.contains(&status) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_status");
        err.message = Some("Status must be one of: active, cancelled, completed".into());
        Err(err)
    }
}

/// Reject strings that are empty once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
