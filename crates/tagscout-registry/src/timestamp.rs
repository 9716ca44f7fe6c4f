//! Parsing and rendering of image creation timestamps.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};

use crate::oci::ImageConfig;

/// Parses a `created` value into an offset-aware instant.
///
/// A trailing `Z` is rewritten to `+00:00` first. Values without an offset
/// are taken as UTC. Anything unparseable yields `None`.
///
/// # Examples
///
/// ```
/// use tagscout_registry::timestamp::parse_created;
///
/// let z = parse_created("2023-06-01T00:00:00Z").unwrap();
/// let offset = parse_created("2023-06-01T00:00:00+00:00").unwrap();
/// assert_eq!(z, offset);
/// assert!(parse_created("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_created(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let normalized = value
        .strip_suffix('Z')
        .map_or(Cow::Borrowed(value), |rest| Cow::Owned(format!("{rest}+00:00")));

    DateTime::parse_from_rfc3339(&normalized).ok().or_else(|| {
        NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Extracts the creation time from a raw config blob.
///
/// Malformed JSON and a missing or unparseable `created` field all count as
/// "no timestamp".
#[must_use]
pub fn created_from_config(body: &[u8]) -> Option<DateTime<FixedOffset>> {
    match serde_json::from_slice::<ImageConfig>(body) {
        Ok(config) => config.created.as_deref().and_then(parse_created),
        Err(e) => {
            tracing::debug!(error = %e, "Config blob is not valid JSON");
            None
        }
    }
}

/// Renders an instant as ISO 8601 with an explicit numeric offset.
///
/// Fractional seconds are truncated to microseconds and left out entirely
/// when zero.
///
/// # Examples
///
/// ```
/// use tagscout_registry::timestamp::{format_created, parse_created};
///
/// let created = parse_created("2023-06-01T00:00:00Z").unwrap();
/// assert_eq!(format_created(&created), "2023-06-01T00:00:00+00:00");
/// ```
#[must_use]
pub fn format_created(created: &DateTime<FixedOffset>) -> String {
    let format = if created.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    created.to_rfc3339_opts(format, false)
}
