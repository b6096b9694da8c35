//! Time utilities

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a query-string datetime.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Number of pages needed for `total` items, at least 1
pub fn last_page(total: i64, per_page: u32) -> i64 {
    let per_page = i64::from(per_page.max(1));
    ((total + per_page - 1) / per_page).max(1)
}
