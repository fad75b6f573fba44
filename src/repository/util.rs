//! Repository utilities.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::result::{DatabaseErrorKind, Error};

/// Wrap a non-Diesel failure (connection setup, JSON encoding) as a Diesel
/// error so repositories expose a single error type.
pub fn to_diesel_error(e: impl std::fmt::Display) -> Error {
    Error::DatabaseError(DatabaseErrorKind::Unknown, Box::new(e.to_string()))
}

/// Format a timestamp for storage.
///
/// Always microsecond precision with a `Z` suffix, so text comparison in SQL
/// orders the same way as the instants do.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
