//! Daily, weekly and per-project goal progress.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use super::dates::session_datetime;
use crate::types::{Project, UserSettings, WritingSession};

/// `min(100, round(actual / goal * 100))`, or 0 when there is no goal.
pub fn goal_progress(actual: u64, goal: u64) -> u8 {
    if goal == 0 {
        return 0;
    }
    let pct = (actual as f64 / goal as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// Progress toward the user's word goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    /// Words dated today
    pub words_today: u64,
    pub daily_goal: u64,
    pub daily_progress: u8,
    /// Words dated within the last 7 × 24 hours
    pub words_last_week: u64,
    pub weekly_goal: u64,
    pub weekly_progress: u8,
}

impl GoalProgress {
    /// Compute from the user's full session history (not project-scoped).
    ///
    /// "Today" is the calendar day of `now`. The week is a rolling window
    /// starting exactly seven days before `now`, not a calendar week.
    pub fn compute(
        sessions: &[WritingSession],
        settings: &UserSettings,
        now: NaiveDateTime,
    ) -> Self {
        let today = now.date();
        let week_start = now - Duration::days(7);

        let mut words_today = 0u64;
        let mut words_last_week = 0u64;
        for session in sessions {
            let Some(at) = session_datetime(session) else {
                continue;
            };
            if at.date() == today {
                words_today = words_today.saturating_add(session.word_count);
            }
            if at >= week_start {
                words_last_week = words_last_week.saturating_add(session.word_count);
            }
        }

        Self {
            words_today,
            daily_goal: settings.daily_word_goal,
            daily_progress: goal_progress(words_today, settings.daily_word_goal),
            words_last_week,
            weekly_goal: settings.weekly_word_goal,
            weekly_progress: goal_progress(words_last_week, settings.weekly_word_goal),
        }
    }

    /// Whether today's goal has been met.
    pub fn daily_goal_met(&self) -> bool {
        self.daily_goal > 0 && self.words_today >= self.daily_goal
    }
}

/// Progress of `words` toward a project's target, 0 without a target.
pub fn project_progress(words: u64, project: Option<&Project>) -> u8 {
    match project.and_then(|p| p.target_word_count) {
        Some(target) => goal_progress(words, target),
        None => 0,
    }
}
