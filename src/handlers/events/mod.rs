//! Event management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::registrations, state::AppState};

/// Event routes
///
/// Listing and detail are public; writes authenticate through the
/// `AuthenticatedUser` extractor.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_events).post(handler::create_event))
        .route(
            "/{id}",
            get(handler::get_event)
                .put(handler::update_event)
                .delete(handler::delete_event),
        )
        .route("/{id}/register", post(registrations::register_for_event))
}
