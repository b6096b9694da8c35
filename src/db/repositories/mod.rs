//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod event_repo;
pub mod registration_repo;
pub mod user_repo;

pub use event_repo::EventRepository;
pub use registration_repo::RegistrationRepository;
pub use user_repo::UserRepository;
