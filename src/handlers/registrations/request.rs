//! Registration request DTOs

use serde::Deserialize;

/// My registrations query parameters
#[derive(Debug, Deserialize)]
pub struct MyRegistrationsQuery {
    pub page: Option<u32>,
}
