//! Timestamp parsing for service payloads
//!
//! The order service writes timestamps in several shapes depending on the
//! endpoint: RFC 3339 with offset, RFC 2822 HTTP dates, or naive ISO / SQL
//! datetimes in the restaurant's local time. Everything is normalized to
//! `DateTime<Utc>` here.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serializer};

/// Business time zone of the service (naive timestamps are local to it)
pub const BUSINESS_TZ: Tz = chrono_tz::Europe::Rome;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp in any of the shapes the service emits
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(local_to_utc)
}

/// Interpret a naive datetime in the business time zone
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// non-existent ones (spring-forward gap) are shifted forward one hour.
pub fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match BUSINESS_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => {
            tracing::debug!(%naive, "Ambiguous local timestamp, using earlier instant");
            Some(earliest.with_timezone(&Utc))
        }
        LocalResult::None => {
            tracing::debug!(%naive, "Local timestamp falls in DST gap, shifting forward");
            BUSINESS_TZ
                .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

/// Calendar day of `at` in the business time zone
pub fn business_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&BUSINESS_TZ).date_naive()
}

/// Serde adapter for required timestamps
pub mod lenient {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// Serde adapter for optional timestamps (`null`, missing and `""` are `None`)
pub mod lenient_option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_some(&dt.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        }
    }
}
