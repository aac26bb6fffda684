use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{BsError, BsResult};

pub fn date_from_str(s: &str) -> BsResult<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y%m%d",
        "%Y-%m-%d",
        "%Y%m%dT%H%M%S",        // ISO 8601 Basic
        "%Y-%m-%dT%H:%M:%S%.f", // ISO 8601 Extended
    ];

    let s = s.trim();
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        // RFC 3339
        return Ok(datetime.date_naive());
    }

    Err(BsError::Invalid {
        code: "INVALID_DATE",
        message: format!("Unable to parse date '{s}'"),
    })
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses the audit timestamp written by the database default.
pub fn timestamp_from_str(s: &str) -> BsResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s.trim())?.with_timezone(&Utc))
}
