//! Core domain types for parnaso
//!
//! These types mirror the records a writer produces: logged sessions, the
//! projects they belong to, and per-user goal settings. The JSON shape uses
//! camelCase field names so that exported session lists can be re-imported
//! unchanged.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One logged writing event with a word count and self-reported ratings |
//! | **General session** | A session not associated with any Project |
//! | **Project** | A named body of work sessions can be attributed to |
//! | **Streak** | Count of consecutive calendar days with at least one session |
//! | **Trophy** | A named threshold on an aggregate metric, evaluated fresh on every query |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key used for sessions without a project in per-project breakdowns.
pub const GENERAL_KEY: &str = "general";

/// Generate a fresh random record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================
// Writing sessions
// ============================================

/// A single logged writing session.
///
/// Sessions are append-only: once stored they are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingSession {
    /// Unique identifier
    pub id: String,
    /// Owning project; `None` means a general session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// ISO date-time the session counts toward. Only the calendar date is
    /// used for bucketing; unparseable values are excluded from dated views.
    pub date: String,

    /// Free-form start time (display only)
    #[serde(default)]
    pub start_time: String,
    /// Free-form end time (display only)
    #[serde(default)]
    pub end_time: String,
    /// Words produced
    pub word_count: u64,

    /// 1 (tranquil) to 5 (stressful)
    pub stress_level: u8,
    #[serde(default)]
    pub used_skeleton: bool,
    #[serde(default)]
    pub used_drafts: bool,

    /// 1 to 5, how often the writer stopped to correct themselves
    pub auto_correction_frequency: u8,
    /// 1 (none) to 5 (intense)
    pub difficulty_level: u8,
    #[serde(default)]
    pub specific_difficulties: String,

    #[serde(default)]
    pub was_multitasking: bool,
    #[serde(default)]
    pub multitasking_description: String,
    #[serde(default)]
    pub used_time_strategy: bool,
    #[serde(default)]
    pub time_strategy_description: String,

    #[serde(default)]
    pub self_rewarded: bool,
    #[serde(default)]
    pub reward_description: String,
    /// 1 (terrible) to 5 (excellent)
    pub session_rating: u8,
}

impl WritingSession {
    /// Create a session with neutral ratings and no strategy flags set.
    pub fn new(id: impl Into<String>, date: impl Into<String>, word_count: u64) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            date: date.into(),
            start_time: String::new(),
            end_time: String::new(),
            word_count,
            stress_level: 3,
            used_skeleton: false,
            used_drafts: false,
            auto_correction_frequency: 3,
            difficulty_level: 3,
            specific_difficulties: String::new(),
            was_multitasking: false,
            multitasking_description: String::new(),
            used_time_strategy: false,
            time_strategy_description: String::new(),
            self_rewarded: false,
            reward_description: String::new(),
            session_rating: 3,
        }
    }

    /// Attach the session to a project.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Key of the per-project bucket this session falls into.
    pub fn project_key(&self) -> &str {
        self.project_id.as_deref().unwrap_or(GENERAL_KEY)
    }

    /// Whether this session has no project.
    pub fn is_general(&self) -> bool {
        self.project_id.is_none()
    }
}

// ============================================
// Projects
// ============================================

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "archived" => Ok(ProjectStatus::Archived),
            _ => Err(format!("unknown project status: {}", s)),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A body of work that sessions can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Hex color used when charting this project
    pub color: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Optional total word target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Palette new projects pick their color from.
pub const DEFAULT_PROJECT_COLORS: [&str; 10] = [
    "#f87171", "#fb923c", "#fbbf24", "#a3e635", "#34d399", "#22d3ee", "#818cf8", "#e879f9",
    "#f43f5e", "#64748b",
];

// ============================================
// Settings
// ============================================

/// Per-user word goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub daily_word_goal: u64,
    pub weekly_word_goal: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            daily_word_goal: 500,
            weekly_word_goal: 3500,
        }
    }
}

// ============================================
// Admin views
// ============================================

/// Everything stored for one user, as returned for admin inspection.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub sessions: Vec<WritingSession>,
    pub projects: Vec<Project>,
    pub settings: UserSettings,
}

/// Totals across a set of users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_words: u64,
    pub total_sessions: u64,
}
