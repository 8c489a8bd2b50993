//! Writing streaks: consecutive calendar days with at least one session.
//!
//! Two different questions are answered here and they intentionally use
//! different inputs. [`current_streak`] is asked of whatever session set
//! the dashboard is scoped to (one project or all of them), while
//! [`max_streak`] feeds achievements and is always asked of every session.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::dates::session_day;
use crate::types::WritingSession;

/// Distinct calendar days with activity, ascending.
pub fn unique_days(sessions: &[WritingSession]) -> BTreeSet<NaiveDate> {
    sessions.iter().filter_map(session_day).collect()
}

/// Length of the streak that is still alive on `today`.
///
/// The most recent writing day must be today or yesterday, otherwise the
/// streak is broken and this returns 0. From there the walk goes back one
/// day at a time and stops at the first gap.
pub fn current_streak(sessions: &[WritingSession], today: NaiveDate) -> u32 {
    let days = unique_days(sessions);

    let Some(&latest) = days.last() else {
        return 0;
    };

    let yesterday = today.pred_opt();
    if latest != today && Some(latest) != yesterday {
        return 0;
    }

    let mut streak = 1u32;
    let mut expected = latest.pred_opt();
    for &day in days.iter().rev().skip(1) {
        if Some(day) == expected {
            streak += 1;
            expected = day.pred_opt();
        } else {
            break;
        }
    }

    streak
}

/// A run of consecutive writing days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakRun {
    /// Number of days in the run
    pub length: u32,
    /// First day of the run
    pub start: NaiveDate,
    /// Last day of the run
    pub end: NaiveDate,
}

/// The longest run of consecutive writing days. Ties keep the earliest run.
pub fn longest_run(sessions: &[WritingSession]) -> Option<StreakRun> {
    let days = unique_days(sessions);
    let mut iter = days.iter().copied();
    let first = iter.next()?;

    let mut best = StreakRun {
        length: 1,
        start: first,
        end: first,
    };
    let mut current = best;

    for day in iter {
        if current.end.succ_opt() == Some(day) {
            current.length += 1;
            current.end = day;
        } else {
            current = StreakRun {
                length: 1,
                start: day,
                end: day,
            };
        }

        if current.length > best.length {
            best = current;
        }
    }

    Some(best)
}

/// All-time best streak in days; 0 with no sessions.
pub fn max_streak(sessions: &[WritingSession]) -> u32 {
    longest_run(sessions).map_or(0, |run| run.length)
}
