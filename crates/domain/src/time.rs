//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for event dates and token lifetimes.
pub type Timestamp = DateTime<Utc>;

/// Parse an RFC 3339 timestamp (e.g. `2025-01-01T10:00:00Z`) into UTC.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] when `input` is not RFC 3339.
pub fn parse_timestamp(input: &str) -> Result<Timestamp, ValidationError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.to_utc())
        .map_err(|_| ValidationError::InvalidTimestamp(input.to_string()))
}
