//! Database repository layer
//!
//! Provides per-user query and insert operations for sessions, projects and
//! settings, plus the admin operations that span users. Every method takes
//! the user id explicitly.

use crate::analytics::parse_session_date;
use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Column list shared by session inserts and selects.
const SESSION_COLUMNS: &str = "id, project_id, date, start_time, end_time, word_count, \
     stress_level, used_skeleton, used_drafts, auto_correction_frequency, difficulty_level, \
     specific_difficulties, was_multitasking, multitasking_description, used_time_strategy, \
     time_strategy_description, self_rewarded, reward_description, session_rating";

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn();
        super::schema::run_migrations(&conn)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ============================================
    // Session operations
    // ============================================

    /// Append a session to the user's history
    pub fn save_session(&self, user_id: &str, session: &WritingSession) -> Result<()> {
        validate_session(session)?;

        let conn = self.conn();
        if session_exists(&conn, user_id, &session.id)? {
            return Err(Error::InvalidSession {
                id: session.id.clone(),
                message: "a session with this id already exists".to_string(),
            });
        }
        insert_session(&conn, user_id, session)?;

        tracing::info!(
            user = user_id,
            session = %session.id,
            words = session.word_count,
            project = session.project_key(),
            "Saved session"
        );
        Ok(())
    }

    /// Append many sessions in one transaction.
    ///
    /// `sessions` is taken in the same newest-first order `get_sessions`
    /// returns, so an exported list reads back unchanged after import.
    /// Nothing is stored if any session is invalid or already present.
    pub fn save_sessions(&self, user_id: &str, sessions: &[WritingSession]) -> Result<usize> {
        for session in sessions {
            validate_session(session)?;
        }

        let mut conn = self.conn();
        let tx = conn.transaction()?;
        for session in sessions.iter().rev() {
            if session_exists(&tx, user_id, &session.id)? {
                return Err(Error::InvalidSession {
                    id: session.id.clone(),
                    message: "a session with this id already exists".to_string(),
                });
            }
            insert_session(&tx, user_id, session)?;
        }
        tx.commit()?;

        tracing::info!(user = user_id, count = sessions.len(), "Imported sessions");
        Ok(sessions.len())
    }

    /// All sessions of a user, most recently logged first
    pub fn get_sessions(&self, user_id: &str) -> Result<Vec<WritingSession>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sessions WHERE user_id = ? ORDER BY seq DESC",
            SESSION_COLUMNS
        ))?;

        let sessions = stmt
            .query_map([user_id], Self::row_to_session)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    /// Remove every session of a user
    pub fn clear_sessions(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn();
        let removed = conn.execute("DELETE FROM sessions WHERE user_id = ?", [user_id])?;
        tracing::info!(user = user_id, removed, "Cleared sessions");
        Ok(removed)
    }

    fn row_to_session(row: &Row) -> rusqlite::Result<WritingSession> {
        Ok(WritingSession {
            id: row.get("id")?,
            project_id: row.get("project_id")?,
            date: row.get("date")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            word_count: row.get::<_, i64>("word_count")?.max(0) as u64,
            stress_level: row.get("stress_level")?,
            used_skeleton: row.get("used_skeleton")?,
            used_drafts: row.get("used_drafts")?,
            auto_correction_frequency: row.get("auto_correction_frequency")?,
            difficulty_level: row.get("difficulty_level")?,
            specific_difficulties: row.get("specific_difficulties")?,
            was_multitasking: row.get("was_multitasking")?,
            multitasking_description: row.get("multitasking_description")?,
            used_time_strategy: row.get("used_time_strategy")?,
            time_strategy_description: row.get("time_strategy_description")?,
            self_rewarded: row.get("self_rewarded")?,
            reward_description: row.get("reward_description")?,
            session_rating: row.get("session_rating")?,
        })
    }

    // ============================================
    // Settings operations
    // ============================================

    /// Stored settings for a user, or `defaults` when none were saved
    pub fn get_settings(&self, user_id: &str, defaults: UserSettings) -> Result<UserSettings> {
        let conn = self.conn();
        let stored = conn
            .query_row(
                "SELECT daily_word_goal, weekly_word_goal FROM settings WHERE user_id = ?",
                [user_id],
                |row| {
                    Ok(UserSettings {
                        daily_word_goal: row.get::<_, i64>(0)?.max(0) as u64,
                        weekly_word_goal: row.get::<_, i64>(1)?.max(0) as u64,
                    })
                },
            )
            .optional()?;
        Ok(stored.unwrap_or(defaults))
    }

    /// Insert or replace a user's settings
    pub fn save_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
        validate_settings(settings)?;

        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO settings (user_id, daily_word_goal, weekly_word_goal, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                daily_word_goal = excluded.daily_word_goal,
                weekly_word_goal = excluded.weekly_word_goal,
                updated_at = excluded.updated_at
            "#,
            params![
                user_id,
                to_sql_int(settings.daily_word_goal),
                to_sql_int(settings.weekly_word_goal),
                Utc::now().to_rfc3339(),
            ],
        )?;

        tracing::info!(
            user = user_id,
            daily = settings.daily_word_goal,
            weekly = settings.weekly_word_goal,
            "Saved settings"
        );
        Ok(())
    }

    // ============================================
    // Project operations
    // ============================================

    /// All projects of a user, in creation order
    pub fn get_projects(&self, user_id: &str) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, color, status, target_word_count, created_at
             FROM projects WHERE user_id = ? ORDER BY seq ASC",
        )?;

        let projects = stmt
            .query_map([user_id], Self::row_to_project)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    /// Get a project by ID
    pub fn get_project(&self, user_id: &str, project_id: &str) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, description, color, status, target_word_count, created_at
             FROM projects WHERE user_id = ?1 AND id = ?2",
            params![user_id, project_id],
            Self::row_to_project,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Get a project by ID, failing with [`Error::ProjectNotFound`]
    pub fn require_project(&self, user_id: &str, project_id: &str) -> Result<Project> {
        self.get_project(user_id, project_id)?
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }

    /// Insert a project, or update it in place when the id already exists
    pub fn save_project(&self, user_id: &str, project: &Project) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO projects (user_id, id, name, description, color, status, target_word_count, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id, id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                color = excluded.color,
                status = excluded.status,
                target_word_count = excluded.target_word_count
            "#,
            params![
                user_id,
                project.id,
                project.name,
                project.description,
                project.color,
                project.status.as_str(),
                project.target_word_count.map(to_sql_int),
                project.created_at.to_rfc3339(),
            ],
        )?;

        tracing::info!(user = user_id, project = %project.id, "Saved project");
        Ok(())
    }

    fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
        let status_str: String = row.get("status")?;
        let created_at_str: String = row.get("created_at")?;
        let target: Option<i64> = row.get("target_word_count")?;

        Ok(Project {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            color: row.get("color")?,
            status: status_str.parse().unwrap_or_default(),
            target_word_count: target.map(|t| t.max(0) as u64),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    // ============================================
    // Whole-user operations
    // ============================================

    /// Empty a user's sessions and projects and drop saved settings, so
    /// later reads fall back to the defaults.
    pub fn clear_all_data(&self, user_id: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sessions WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM projects WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM settings WHERE user_id = ?", [user_id])?;
        tx.commit()?;

        tracing::info!(user = user_id, "Cleared all data");
        Ok(())
    }

    /// Everything stored for a user
    pub fn get_user_data(&self, user_id: &str, defaults: UserSettings) -> Result<UserData> {
        Ok(UserData {
            sessions: self.get_sessions(user_id)?,
            projects: self.get_projects(user_id)?,
            settings: self.get_settings(user_id, defaults)?,
        })
    }

    /// Whether any session, project or settings row belongs to the user
    pub fn user_exists(&self, user_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sessions WHERE user_id = ?1)
                 OR EXISTS(SELECT 1 FROM projects WHERE user_id = ?1)
                 OR EXISTS(SELECT 1 FROM settings WHERE user_id = ?1)",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Remove every row that belongs to a user.
    ///
    /// Fails with [`Error::UserNotFound`] when the user owns no data.
    pub fn delete_user_data(&self, user_id: &str) -> Result<()> {
        if !self.user_exists(user_id)? {
            return Err(Error::UserNotFound(user_id.to_string()));
        }
        self.clear_all_data(user_id)?;
        tracing::warn!(user = user_id, "Deleted user data");
        Ok(())
    }

    // ============================================
    // Admin operations
    // ============================================

    /// Every user id that owns any data, sorted
    pub fn list_users(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT user_id FROM sessions
             UNION SELECT user_id FROM projects
             UNION SELECT user_id FROM settings
             ORDER BY 1",
        )?;

        let users = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(users)
    }

    /// Word and session totals summed over the given users
    pub fn global_stats(&self, user_ids: &[String]) -> Result<GlobalStats> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT COUNT(*), COALESCE(SUM(word_count), 0) FROM sessions WHERE user_id = ?",
        )?;

        let mut stats = GlobalStats::default();
        for user_id in user_ids {
            let (sessions, words): (i64, i64) =
                stmt.query_row([user_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
            stats.total_sessions = stats.total_sessions.saturating_add(sessions.max(0) as u64);
            stats.total_words = stats.total_words.saturating_add(words.max(0) as u64);
        }
        Ok(stats)
    }
}

/// Largest word count a single session may record.
pub const MAX_SESSION_WORDS: u64 = u32::MAX as u64;

/// Reject sessions whose ratings fall outside 1..=5, whose word count
/// exceeds [`MAX_SESSION_WORDS`] or whose date does not parse.
pub fn validate_session(session: &WritingSession) -> Result<()> {
    let invalid = |message: String| Error::InvalidSession {
        id: session.id.clone(),
        message,
    };

    if session.id.trim().is_empty() {
        return Err(invalid("id must not be empty".to_string()));
    }

    let ratings = [
        ("stressLevel", session.stress_level),
        ("autoCorrectionFrequency", session.auto_correction_frequency),
        ("difficultyLevel", session.difficulty_level),
        ("sessionRating", session.session_rating),
    ];
    for (name, value) in ratings {
        if !(1..=5).contains(&value) {
            return Err(invalid(format!("{} must be between 1 and 5, got {}", name, value)));
        }
    }

    if session.word_count > MAX_SESSION_WORDS {
        return Err(invalid(format!(
            "wordCount must be at most {}, got {}",
            MAX_SESSION_WORDS, session.word_count
        )));
    }

    if parse_session_date(&session.date).is_none() {
        return Err(invalid(format!("unparseable date '{}'", session.date)));
    }

    Ok(())
}

/// Goals must be positive.
pub fn validate_settings(settings: &UserSettings) -> Result<()> {
    if settings.daily_word_goal == 0 {
        return Err(Error::InvalidSettings(
            "daily word goal must be greater than zero".to_string(),
        ));
    }
    if settings.weekly_word_goal == 0 {
        return Err(Error::InvalidSettings(
            "weekly word goal must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn session_exists(conn: &Connection, user_id: &str, session_id: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sessions WHERE user_id = ?1 AND id = ?2)",
        params![user_id, session_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn insert_session(conn: &Connection, user_id: &str, s: &WritingSession) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO sessions (user_id, {}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
            SESSION_COLUMNS
        ),
        params![
            user_id,
            s.id,
            s.project_id,
            s.date,
            s.start_time,
            s.end_time,
            to_sql_int(s.word_count),
            s.stress_level,
            s.used_skeleton,
            s.used_drafts,
            s.auto_correction_frequency,
            s.difficulty_level,
            s.specific_difficulties,
            s.was_multitasking,
            s.multitasking_description,
            s.used_time_strategy,
            s.time_strategy_description,
            s.self_rewarded,
            s.reward_description,
            s.session_rating,
        ],
    )?;
    Ok(())
}

/// SQLite integers are signed; saturate counts beyond `i64::MAX`.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
