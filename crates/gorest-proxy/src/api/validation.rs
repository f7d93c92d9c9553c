//! Field-level validation of submitted payloads
//!
//! Helpers accumulate messages into a caller-owned list so a single response
//! can report every problem with a payload at once.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use gorest_api::ParseEnumError;

/// Require a non-blank string field
pub(crate) fn required(
    field: &str,
    value: Option<String>,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        Some(_) => {
            errors.push(format!("{field} must not be empty"));
            None
        }
        None => {
            errors.push(format!("{field} is required"));
            None
        }
    }
}

/// Validate a field that may be omitted but must not be blank when present
pub(crate) fn optional(
    field: &str,
    value: Option<String>,
    errors: &mut Vec<String>,
) -> Option<String> {
    value.and_then(|v| required(field, Some(v), errors))
}

/// Require a value that looks like an email address
pub(crate) fn email(value: String, errors: &mut Vec<String>) -> Option<String> {
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if valid {
        Some(value)
    } else {
        errors.push(format!("email '{value}' is not a valid email address"));
        None
    }
}

/// Parse an enumerated field, accepting any letter case
pub(crate) fn enumerated<T>(value: String, errors: &mut Vec<String>) -> Option<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    value
        .parse()
        .map_err(|e: ParseEnumError| errors.push(e.to_string()))
        .ok()
}

/// Parse a due date given as RFC 3339 or as a plain `YYYY-MM-DD` date
pub(crate) fn due_date(value: String, errors: &mut Vec<String>) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let midnight = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0));
    if let Some(midnight) = midnight {
        return Some(midnight.and_utc());
    }
    errors.push(format!("due_on '{value}' is not a valid date"));
    None
}
