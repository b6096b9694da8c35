//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod event;
pub mod registration;
pub mod user;

pub use event::*;
pub use registration::*;
pub use user::*;
