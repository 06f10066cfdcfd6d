//! Flexible date parsing for catalog search parameters.
//!
//! Upstream catalogs and API clients hand us dates in a handful of formats;
//! we accept any of them rather than pinning a single representation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Datetime formats tried in order, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats. Slash dates are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y%m%d",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized date string: {value:?}")]
pub struct DateParseError {
    pub value: String,
}

/// Parse a calendar date/time from an optional string.
///
/// A missing, empty, or whitespace-only value is a valid "no date" case and
/// returns `Ok(None)`. A non-empty value that matches none of the accepted
/// formats is an error. Date-only inputs resolve to midnight.
pub fn parse_date(value: Option<&str>) -> Result<Option<NaiveDateTime>, DateParseError> {
    let value = match value {
        None => return Ok(None),
        Some(v) => v.trim(),
    };

    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.naive_utc()));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(Some(dt));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(Some(d.and_time(NaiveTime::MIN)));
        }
    }

    Err(DateParseError {
        value: value.to_string(),
    })
}
