//! Date-range and project filters over session lists.

use chrono::{Days, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::dates::{session_datetime, start_of_day};
use crate::types::WritingSession;

/// Time window applied to the dashboard views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFilter {
    /// Every session ever logged
    All,
    #[default]
    #[serde(rename = "last-7-days")]
    Last7Days,
    #[serde(rename = "last-30-days")]
    Last30Days,
    #[serde(rename = "last-6-months")]
    Last6Months,
    #[serde(rename = "last-1-year")]
    Last1Year,
}

impl DateFilter {
    /// Every selector, widest last.
    pub const ALL: [DateFilter; 5] = [
        DateFilter::Last7Days,
        DateFilter::Last30Days,
        DateFilter::Last6Months,
        DateFilter::Last1Year,
        DateFilter::All,
    ];

    /// Returns the identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::All => "all",
            DateFilter::Last7Days => "last-7-days",
            DateFilter::Last30Days => "last-30-days",
            DateFilter::Last6Months => "last-6-months",
            DateFilter::Last1Year => "last-1-year",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            DateFilter::All => "All time",
            DateFilter::Last7Days => "Last 7 days",
            DateFilter::Last30Days => "Last 30 days",
            DateFilter::Last6Months => "Last 6 months",
            DateFilter::Last1Year => "Last year",
        }
    }

    /// Inclusive lower bound for `now`, or `None` when unbounded.
    ///
    /// The interval is subtracted from the current moment and the result
    /// snapped to the start of that calendar day.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let today = now.date();
        let day = match self {
            DateFilter::All => return None,
            DateFilter::Last7Days => today.checked_sub_days(Days::new(7)),
            DateFilter::Last30Days => today.checked_sub_days(Days::new(30)),
            DateFilter::Last6Months => today.checked_sub_months(Months::new(6)),
            DateFilter::Last1Year => today.checked_sub_months(Months::new(12)),
        };
        // Underflow past the calendar's minimum means everything qualifies.
        day.map(start_of_day)
    }
}

impl std::str::FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DateFilter::All),
            "last-7-days" | "7days" => Ok(DateFilter::Last7Days),
            "last-30-days" | "30days" => Ok(DateFilter::Last30Days),
            "last-6-months" | "6months" => Ok(DateFilter::Last6Months),
            "last-1-year" | "1year" => Ok(DateFilter::Last1Year),
            _ => Err(format!(
                "unknown date filter: {} (expected all, last-7-days, last-30-days, last-6-months or last-1-year)",
                s
            )),
        }
    }
}

impl std::fmt::Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keep the sessions dated on or after the filter's cutoff.
///
/// Relative order is preserved. There is no upper bound, so future-dated
/// sessions stay in. Sessions with a malformed date are dropped.
pub fn filter_by_date(
    sessions: &[WritingSession],
    filter: DateFilter,
    now: NaiveDateTime,
) -> Vec<WritingSession> {
    let cutoff = filter.cutoff(now);

    sessions
        .iter()
        .filter(|s| match session_datetime(s) {
            Some(dt) => cutoff.map_or(true, |c| dt >= c),
            None => false,
        })
        .cloned()
        .collect()
}

/// Restrict sessions to one project, or pass everything through for `None`.
pub fn filter_by_project(
    sessions: &[WritingSession],
    project_id: Option<&str>,
) -> Vec<WritingSession> {
    match project_id {
        Some(id) => sessions
            .iter()
            .filter(|s| s.project_id.as_deref() == Some(id))
            .cloned()
            .collect(),
        None => sessions.to_vec(),
    }
}
