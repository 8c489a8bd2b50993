//! Dashboard composition.
//!
//! Wires the filter, aggregator, streak, goal and achievement modules
//! together with the scopes each number is defined over:
//!
//! | Output | Session set |
//! |--------|-------------|
//! | KPIs, word and metric series, strategies, calendar | project scope, then date filter |
//! | Current streak | project scope, no date filter |
//! | Goals, trophies | every session |

use chrono::NaiveDateTime;
use serde::Serialize;

use super::achievements::{evaluate_trophies, AchievementStats, TrophyStatus};
use super::aggregate::{
    daily_words, metrics_series, strategy_usage, summarize, DailyWords, MetricsPoint,
    SessionTotals, StrategyUsage,
};
use super::calendar::{calendar_month, CalendarDay};
use super::filter::{filter_by_date, filter_by_project, DateFilter};
use super::goals::{project_progress, GoalProgress};
use super::streaks::current_streak;
use crate::types::{Project, UserData};

/// What the dashboard is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    /// Date range for KPIs and series
    pub filter: DateFilter,
    /// Restrict to one project; `None` shows everything
    pub project_id: Option<String>,
}

impl DashboardQuery {
    pub fn new(filter: DateFilter) -> Self {
        Self {
            filter,
            project_id: None,
        }
    }

    pub fn for_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// Everything the dashboard shows, derived fresh from raw records.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub filter: DateFilter,
    /// Selected project, when it exists
    pub project: Option<Project>,
    /// Totals and averages over the filtered view
    pub totals: SessionTotals,
    /// Current streak of the project-scoped history
    pub current_streak: u32,
    /// Words per day, split by project
    pub words_over_time: Vec<DailyWords>,
    /// Stress, difficulty and rating per session
    pub metrics: Vec<MetricsPoint>,
    pub strategies: Vec<StrategyUsage>,
    pub goals: GoalProgress,
    /// Progress of the filtered total toward the selected project's target
    pub project_progress: u8,
    /// Current month, Sunday-first
    pub calendar: Vec<Option<CalendarDay>>,
    pub achievement_stats: AchievementStats,
    pub trophies: Vec<TrophyStatus>,
}

impl DashboardView {
    /// Number of unlocked trophies.
    pub fn unlocked_count(&self) -> usize {
        self.trophies.iter().filter(|t| t.unlocked).count()
    }

    /// Format the current streak for display (e.g., "3 days").
    pub fn streak_display(&self) -> String {
        match self.current_streak {
            1 => "1 day".to_string(),
            n => format!("{} days", n),
        }
    }
}

/// Build the dashboard for one user's data.
pub fn build_dashboard(data: &UserData, query: &DashboardQuery, now: NaiveDateTime) -> DashboardView {
    let project_id = query.project_id.as_deref();
    let project = project_id.and_then(|id| data.projects.iter().find(|p| p.id == id).cloned());

    let scoped = filter_by_project(&data.sessions, project_id);
    let filtered = filter_by_date(&scoped, query.filter, now);

    let totals = summarize(&filtered);
    let achievement_stats = AchievementStats::from_sessions(&data.sessions);

    tracing::debug!(
        sessions = data.sessions.len(),
        scoped = scoped.len(),
        filtered = filtered.len(),
        filter = %query.filter,
        "Building dashboard"
    );

    DashboardView {
        filter: query.filter,
        project_progress: project_progress(totals.total_words, project.as_ref()),
        project,
        current_streak: current_streak(&scoped, now.date()),
        words_over_time: daily_words(&filtered),
        metrics: metrics_series(&filtered),
        strategies: strategy_usage(&filtered),
        goals: GoalProgress::compute(&data.sessions, &data.settings, now),
        calendar: calendar_month(&filtered, now.date()),
        trophies: evaluate_trophies(&achievement_stats),
        achievement_stats,
        totals,
    }
}
