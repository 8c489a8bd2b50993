//! Month-at-a-glance calendar of writing days.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::dates::session_day;
use crate::types::WritingSession;

/// One day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// Day of month, 1-based
    pub day: u32,
    /// At least one session falls on this day
    pub has_session: bool,
}

/// Grid for the month containing `today`, Sunday-first.
///
/// Leading `None` cells pad the first week up to the weekday of the 1st.
pub fn calendar_month(sessions: &[WritingSession], today: NaiveDate) -> Vec<Option<CalendarDay>> {
    let Some(first) = today.with_day(1) else {
        return Vec::new();
    };

    let written: HashSet<NaiveDate> = sessions
        .iter()
        .filter_map(session_day)
        .filter(|d| d.year() == first.year() && d.month() == first.month())
        .collect();

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<CalendarDay>> = vec![None; leading];

    let mut day = Some(first);
    while let Some(d) = day.filter(|d| d.month() == first.month()) {
        cells.push(Some(CalendarDay {
            day: d.day(),
            has_session: written.contains(&d),
        }));
        day = d.succ_opt();
    }

    cells
}
