//! Calendar helpers shared by the analytics modules.
//!
//! All analytics run on the writer's local wall clock: session timestamps
//! carrying an offset are converted to local time, timestamps without one
//! are taken as already local.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::WritingSession;

/// Parse a session `date` into a local date-time.
///
/// Accepts RFC 3339 (`2024-03-02T10:00:00.000Z`), a naive date-time
/// (`2024-03-02T10:00:00`) or a bare date (`2024-03-02`, local midnight).
/// Returns `None` for anything else.
///
/// Bare dates are local midnight, not UTC midnight: `2024-03-02` stays on
/// March 2 in every time zone, including those west of UTC.
pub fn parse_session_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

/// Local date-time of a session, or `None` if its date is malformed.
pub fn session_datetime(session: &WritingSession) -> Option<NaiveDateTime> {
    let parsed = parse_session_date(&session.date);
    if parsed.is_none() {
        tracing::debug!(session_id = %session.id, date = %session.date, "Skipping unparseable session date");
    }
    parsed
}

/// Calendar day of a session, or `None` if its date is malformed.
pub fn session_day(session: &WritingSession) -> Option<NaiveDate> {
    session_datetime(session).map(|dt| dt.date())
}

/// 00:00:00.000 of the given day.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Short `dd/mm` label used on chart axes.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// ISO 8601 week key: the week belongs to the year of its Thursday.
pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Calendar month key.
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
