//! `createdAt` parsing.
//!
//! Backends disagree on how they print the join date: some emit RFC 3339 with
//! an offset, others print a zone-less local date-time straight from the
//! database column (`2024-03-05T10:11:12.123456`). Both are accepted; a
//! zone-less value is taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// Returned when a timestamp matches none of the accepted layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampError {
    input: String,
}

impl TimestampError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised timestamp: {:?}", self.input)
    }
}

impl std::error::Error for TimestampError {}

const NAIVE_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp with or without an offset.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(naive.and_utc());
        }
    }

    // Date-only values show up from hand-seeded accounts
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(TimestampError {
        input: raw.to_string(),
    })
}

#[cfg(feature = "serde")]
pub(crate) mod serde_lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }
}
