//! Provider date strings to UTC instants.
//!
//! Two shapes are seen in the wild: `2017-05-03T06:04:45Z` and `2017-05-03 06:04:45`
//! (no zone, already UTC). Both may carry fractional seconds.

use super::error::MistaError;
use crate::channels::channel::DatePolicy;
use chrono::{DateTime, NaiveDateTime, Utc};

const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const SPACED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse a provider timestamp. Fails closed on any other format.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MistaError> {
    let s = raw.trim();
    NaiveDateTime::parse_from_str(s, ISO_UTC_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, SPACED_FORMAT))
        .map(|naive| naive.and_utc())
        .map_err(|_| MistaError::MalformedTimestamp(raw.to_string()))
}

/// Resolve an optional date field under the channel's policy.
pub fn resolve_timestamp(
    raw: Option<&str>,
    policy: DatePolicy,
) -> Result<Option<DateTime<Utc>>, MistaError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_timestamp(s).map(Some),
        None => match policy {
            DatePolicy::Optional => Ok(None),
            DatePolicy::Required => Err(MistaError::MalformedTimestamp(String::new())),
        },
    }
}
