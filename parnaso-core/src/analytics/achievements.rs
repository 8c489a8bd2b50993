//! Trophies: named thresholds over all-time writing statistics.
//!
//! Unlocking is not an event. Every query recomputes [`AchievementStats`]
//! from the full session history and compares each trophy's metric against
//! its threshold, so there is no stored "achieved" flag and no unlock date.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use super::dates::{iso_week_key, month_key, session_day};
use super::goals::goal_progress;
use super::streaks::max_streak;
use crate::types::WritingSession;

/// What a trophy measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrophyCategory {
    /// Best single calendar day
    Daily,
    /// Best single ISO week
    Weekly,
    /// Best single calendar month
    Monthly,
    /// Lifetime words
    Total,
    /// Longest run of consecutive writing days
    Streak,
}

/// Reads the statistic a category is measured against.
pub type MetricFn = fn(&AchievementStats) -> u64;

impl TrophyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrophyCategory::Daily => "daily",
            TrophyCategory::Weekly => "weekly",
            TrophyCategory::Monthly => "monthly",
            TrophyCategory::Total => "total",
            TrophyCategory::Streak => "streak",
        }
    }

    /// Evaluation function for this category.
    pub fn metric(&self) -> MetricFn {
        match self {
            TrophyCategory::Daily => |s: &AchievementStats| s.max_daily_words,
            TrophyCategory::Weekly => |s: &AchievementStats| s.max_weekly_words,
            TrophyCategory::Monthly => |s: &AchievementStats| s.max_monthly_words,
            TrophyCategory::Total => |s: &AchievementStats| s.total_words,
            TrophyCategory::Streak => |s: &AchievementStats| u64::from(s.max_streak),
        }
    }

    /// Current value of this category's metric.
    pub fn current_value(&self, stats: &AchievementStats) -> u64 {
        (self.metric())(stats)
    }
}

impl std::fmt::Display for TrophyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Badge shown next to a trophy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrophyIcon {
    Fire,
    Shield,
    Medal,
    Trophy,
    Crown,
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trophy {
    /// Stable identifier
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Minimum metric value that unlocks the trophy
    pub threshold: u64,
    pub category: TrophyCategory,
    pub icon: TrophyIcon,
}

/// The fixed trophy catalog. Thresholds rise within each category.
pub const TROPHIES: &[Trophy] = &[
    Trophy {
        id: "daily_500",
        title: "Quick Start",
        description: "Write 500 words in one day",
        threshold: 500,
        category: TrophyCategory::Daily,
        icon: TrophyIcon::Shield,
    },
    Trophy {
        id: "daily_1000",
        title: "Deep Flow",
        description: "Write 1,000 words in one day",
        threshold: 1000,
        category: TrophyCategory::Daily,
        icon: TrophyIcon::Shield,
    },
    Trophy {
        id: "daily_2000",
        title: "Hyperfocus",
        description: "Write 2,000 words in one day",
        threshold: 2000,
        category: TrophyCategory::Daily,
        icon: TrophyIcon::Shield,
    },
    Trophy {
        id: "weekly_3000",
        title: "Weekend Warrior",
        description: "3,000 words in one week",
        threshold: 3000,
        category: TrophyCategory::Weekly,
        icon: TrophyIcon::Medal,
    },
    Trophy {
        id: "weekly_7000",
        title: "Marathoner",
        description: "7,000 words in one week",
        threshold: 7000,
        category: TrophyCategory::Weekly,
        icon: TrophyIcon::Medal,
    },
    Trophy {
        id: "monthly_10000",
        title: "Junior Novelist",
        description: "10,000 words in one month",
        threshold: 10000,
        category: TrophyCategory::Monthly,
        icon: TrophyIcon::Trophy,
    },
    Trophy {
        id: "monthly_30000",
        title: "Best Seller",
        description: "30,000 words in one month",
        threshold: 30000,
        category: TrophyCategory::Monthly,
        icon: TrophyIcon::Trophy,
    },
    Trophy {
        id: "streak_3",
        title: "Spark",
        description: "Write 3 days in a row",
        threshold: 3,
        category: TrophyCategory::Streak,
        icon: TrophyIcon::Fire,
    },
    Trophy {
        id: "streak_7",
        title: "On Fire",
        description: "Write 7 days in a row",
        threshold: 7,
        category: TrophyCategory::Streak,
        icon: TrophyIcon::Fire,
    },
    Trophy {
        id: "total_50000",
        title: "The Great Book",
        description: "50,000 words in total",
        threshold: 50000,
        category: TrophyCategory::Total,
        icon: TrophyIcon::Crown,
    },
];

/// Look up a catalog entry by id.
pub fn find_trophy(id: &str) -> Option<&'static Trophy> {
    TROPHIES.iter().find(|t| t.id == id)
}

/// All-time statistics trophies are measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AchievementStats {
    pub max_daily_words: u64,
    pub max_weekly_words: u64,
    pub max_monthly_words: u64,
    pub total_words: u64,
    pub max_streak: u32,
}

impl AchievementStats {
    /// Compute from the complete, unfiltered session history.
    ///
    /// Sessions with malformed dates still count toward `total_words` but
    /// not toward any calendar bucket or the streak.
    pub fn from_sessions(sessions: &[WritingSession]) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }

        let dated: Vec<(NaiveDate, u64)> = sessions
            .iter()
            .filter_map(|s| session_day(s).map(|day| (day, s.word_count)))
            .collect();

        Self {
            max_daily_words: max_bucket(&dated, |day| day),
            max_weekly_words: max_bucket(&dated, iso_week_key),
            max_monthly_words: max_bucket(&dated, month_key),
            total_words: sessions
                .iter()
                .map(|s| s.word_count)
                .fold(0u64, u64::saturating_add),
            max_streak: max_streak(sessions),
        }
    }
}

/// Sum words per bucket and return the largest bucket (0 when empty).
fn max_bucket<K, F>(dated: &[(NaiveDate, u64)], key: F) -> u64
where
    K: Eq + Hash,
    F: Fn(NaiveDate) -> K,
{
    let mut buckets: HashMap<K, u64> = HashMap::new();
    for &(day, words) in dated {
        let total = buckets.entry(key(day)).or_insert(0);
        *total = total.saturating_add(words);
    }
    buckets.into_values().max().unwrap_or(0)
}

/// Evaluation of one trophy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrophyStatus {
    pub trophy: &'static Trophy,
    /// Current value of the trophy's metric
    pub current_value: u64,
    /// `current_value >= threshold`
    pub unlocked: bool,
    /// Percent of the threshold reached, 100 once unlocked
    pub progress_pct: u8,
}

impl TrophyStatus {
    /// Evaluate a single trophy.
    pub fn evaluate(trophy: &'static Trophy, stats: &AchievementStats) -> Self {
        let current_value = trophy.category.current_value(stats);
        let unlocked = current_value >= trophy.threshold;
        // A locked trophy never reads as complete, even when rounding says 100.
        let progress_pct = if unlocked {
            100
        } else {
            goal_progress(current_value, trophy.threshold).min(99)
        };

        Self {
            trophy,
            current_value,
            unlocked,
            progress_pct,
        }
    }
}

/// Evaluate the whole catalog, in catalog order.
pub fn evaluate_trophies(stats: &AchievementStats) -> Vec<TrophyStatus> {
    TROPHIES
        .iter()
        .map(|trophy| TrophyStatus::evaluate(trophy, stats))
        .collect()
}

/// Evaluate the catalog straight from the full session history.
pub fn evaluate_sessions(sessions: &[WritingSession]) -> Vec<TrophyStatus> {
    evaluate_trophies(&AchievementStats::from_sessions(sessions))
}
