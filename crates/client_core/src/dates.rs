//! Birth date handling: the store hands out ISO dates or full timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const EDIT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, EDIT_FORMAT) {
        return Some(date);
    }
    // timestamps are reduced to their UTC calendar day
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Plain `YYYY-MM-DD` for the edit form. Unparseable input is kept as-is so
/// submitting an untouched draft never rewrites it.
pub fn to_edit_value(raw: &str) -> String {
    parse_calendar_date(raw)
        .map(|date| date.format(EDIT_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn to_display_value(raw: &str) -> String {
    parse_calendar_date(raw)
        .map(|date| date.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}
