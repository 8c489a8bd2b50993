//! Analytics module for parnaso
//!
//! Derives everything the dashboard shows from raw session records:
//! - Date-range and project filtering
//! - Totals, averages and chart series
//! - Current and all-time streaks
//! - Goal progress and the month calendar
//! - Trophy evaluation
//!
//! Every function here is pure and infallible. Results are recomputed from
//! the full session list on each call and nothing derived is stored.
//! Sessions whose `date` cannot be parsed are left out of any view that
//! needs a date.

pub mod achievements;
pub mod aggregate;
pub mod calendar;
pub mod dashboard;
pub mod dates;
pub mod filter;
pub mod goals;
pub mod streaks;

pub use achievements::{
    evaluate_sessions, evaluate_trophies, find_trophy, AchievementStats, Trophy, TrophyCategory,
    TrophyIcon, TrophyStatus, TROPHIES,
};
pub use aggregate::{
    daily_words, metrics_series, strategy_usage, summarize, DailyWords, MetricsPoint,
    SessionTotals, Strategy, StrategyUsage,
};
pub use calendar::{calendar_month, CalendarDay};
pub use dashboard::{build_dashboard, DashboardQuery, DashboardView};
pub use dates::parse_session_date;
pub use filter::{filter_by_date, filter_by_project, DateFilter};
pub use goals::{goal_progress, project_progress, GoalProgress};
pub use streaks::{current_streak, longest_run, max_streak, unique_days, StreakRun};
