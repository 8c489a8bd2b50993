//! Aggregates over a (usually filtered) session list: headline numbers,
//! the per-day word series, the per-session metrics series and strategy
//! usage counts.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::dates::{day_label, session_datetime};
use crate::types::WritingSession;

/// Headline numbers for a set of sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionTotals {
    /// Number of sessions
    pub session_count: u64,
    /// Sum of word counts
    pub total_words: u64,
    /// Rounded mean words per session (0 for no sessions)
    pub average_words_per_session: u64,
    /// Mean stress level to one decimal place (0 for no sessions)
    pub average_stress: f64,
}

/// Compute totals and averages. Never divides by zero.
pub fn summarize(sessions: &[WritingSession]) -> SessionTotals {
    let session_count = sessions.len() as u64;
    let total_words = sessions
        .iter()
        .map(|s| s.word_count)
        .fold(0u64, u64::saturating_add);

    if session_count == 0 {
        return SessionTotals::default();
    }

    let stress_sum: u64 = sessions.iter().map(|s| u64::from(s.stress_level)).sum();
    let mean_stress = stress_sum as f64 / session_count as f64;

    SessionTotals {
        session_count,
        total_words,
        average_words_per_session: (total_words as f64 / session_count as f64).round() as u64,
        average_stress: (mean_stress * 10.0).round() / 10.0,
    }
}

/// Words written on one chart day, split by project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyWords {
    /// `dd/mm` label the day is grouped under
    #[serde(rename = "date")]
    pub label: String,
    /// First calendar date seen under this label
    #[serde(skip)]
    pub day: NaiveDate,
    /// Words per project id, with general sessions under `general`
    #[serde(flatten)]
    pub by_project: BTreeMap<String, u64>,
    /// Sum over every project for the day
    pub total: u64,
}

impl DailyWords {
    /// Words for one project key on this day.
    pub fn words_for(&self, key: &str) -> u64 {
        self.by_project.get(key).copied().unwrap_or(0)
    }
}

/// One point of the stress/difficulty/rating trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsPoint {
    /// `dd/mm` label
    #[serde(rename = "date")]
    pub label: String,
    #[serde(skip)]
    pub at: NaiveDateTime,
    pub stress_level: u8,
    pub difficulty_level: u8,
    pub session_rating: u8,
}

/// Writing strategies tracked per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Skeleton,
    Drafts,
    TimeManagement,
    Multitasking,
}

impl Strategy {
    /// Every tracked strategy in display order.
    pub const ALL: [Strategy; 4] = [
        Strategy::Skeleton,
        Strategy::Drafts,
        Strategy::TimeManagement,
        Strategy::Multitasking,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Skeleton => "Skeleton",
            Strategy::Drafts => "Drafts",
            Strategy::TimeManagement => "Time management",
            Strategy::Multitasking => "Multitasking",
        }
    }

    /// Whether the session used this strategy.
    pub fn used_in(&self, session: &WritingSession) -> bool {
        match self {
            Strategy::Skeleton => session.used_skeleton,
            Strategy::Drafts => session.used_drafts,
            Strategy::TimeManagement => session.used_time_strategy,
            Strategy::Multitasking => session.was_multitasking,
        }
    }
}

/// Usage count for one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyUsage {
    pub strategy: Strategy,
    pub sessions: u64,
}

/// Sessions with a valid date, oldest first. Same-instant sessions keep
/// their input order.
fn chronological(sessions: &[WritingSession]) -> Vec<(NaiveDateTime, &WritingSession)> {
    let mut dated: Vec<_> = sessions
        .iter()
        .filter_map(|s| session_datetime(s).map(|dt| (dt, s)))
        .collect();
    // sort_by_key is stable
    dated.sort_by_key(|(dt, _)| *dt);
    dated
}

/// Group words by chart day, then by project.
///
/// Days are keyed by their `dd/mm` label and appear in chronological order
/// of first occurrence.
pub fn daily_words(sessions: &[WritingSession]) -> Vec<DailyWords> {
    let mut days: Vec<DailyWords> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (dt, session) in chronological(sessions) {
        let label = day_label(dt.date());
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            days.push(DailyWords {
                label,
                day: dt.date(),
                by_project: BTreeMap::new(),
                total: 0,
            });
            days.len() - 1
        });

        let day = &mut days[slot];
        let words = day
            .by_project
            .entry(session.project_key().to_string())
            .or_insert(0);
        *words = words.saturating_add(session.word_count);
        day.total = day.total.saturating_add(session.word_count);
    }

    days
}

/// One trend point per dated session, oldest first.
pub fn metrics_series(sessions: &[WritingSession]) -> Vec<MetricsPoint> {
    chronological(sessions)
        .into_iter()
        .map(|(at, s)| MetricsPoint {
            label: day_label(at.date()),
            at,
            stress_level: s.stress_level,
            difficulty_level: s.difficulty_level,
            session_rating: s.session_rating,
        })
        .collect()
}

/// Count sessions per strategy, omitting strategies nobody used.
pub fn strategy_usage(sessions: &[WritingSession]) -> Vec<StrategyUsage> {
    Strategy::ALL
        .iter()
        .map(|&strategy| StrategyUsage {
            strategy,
            sessions: sessions.iter().filter(|s| strategy.used_in(s)).count() as u64,
        })
        .filter(|usage| usage.sessions > 0)
        .collect()
}
