//! Business logic services

pub mod auth_service;
pub mod event_service;
pub mod registration_service;

pub use auth_service::AuthService;
pub use event_service::EventService;
pub use registration_service::RegistrationService;
