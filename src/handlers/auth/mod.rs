//! Authentication handlers

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

use crate::state::AppState;

/// Public authentication routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
}

/// Routes that need a signed-in user
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(handler::logout))
        .route("/user", get(handler::get_current_user))
}
