//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

/// Storage backend identifiers
pub mod storage_backends {
    pub const POSTGRES: &str = "postgres";
    pub const MEMORY: &str = "memory";
}

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Maximum user name length
pub const MAX_NAME_LENGTH: u64 = 255;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "user";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, USER];
}

// =============================================================================
// EVENTS & REGISTRATIONS
// =============================================================================

/// Event lifecycle statuses
pub mod event_statuses {
    pub const ACTIVE: &str = "active";
    pub const CANCELLED: &str = "cancelled";
    pub const COMPLETED: &str = "completed";

    /// All event statuses
    pub const ALL: &[&str] = &[ACTIVE, CANCELLED, COMPLETED];
}

/// Registration lifecycle statuses
pub mod registration_statuses {
    pub const REGISTERED: &str = "registered";
    pub const CANCELLED: &str = "cancelled";
}

/// Columns the event listing may be sorted by
pub mod event_sort_columns {
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const TITLE: &str = "title";
    pub const LOCATION: &str = "location";
    pub const CREATED_AT: &str = "created_at";

    pub const ALL: &[&str] = &[START_DATE, END_DATE, TITLE, LOCATION, CREATED_AT];
}

/// Maximum event title length
pub const MAX_EVENT_TITLE_LENGTH: u64 = 255;

/// Maximum event location length
pub const MAX_EVENT_LOCATION_LENGTH: u64 = 255;

/// Maximum event description length
pub const MAX_EVENT_DESCRIPTION_LENGTH: u64 = 65535;

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;
