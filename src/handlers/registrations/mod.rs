//! Registration handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::state::AppState;

/// Routes for the caller's own registrations.
///
/// `POST /events/{id}/register` lives with the event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/my-registrations", get(handler::my_registrations))
        .route("/registrations/{id}", delete(handler::cancel_registration))
}
