//! Timestamps recorded by the bootstrap hook.

use chrono::{DateTime, Utc};

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a timestamp previously written with [`format`].
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when `value` is not RFC 3339.
pub fn parse(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.to_utc())
}

/// Render a timestamp as RFC 3339 for storage.
#[must_use]
pub fn format(ts: Timestamp) -> String {
    ts.to_rfc3339()
}
