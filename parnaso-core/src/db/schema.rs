//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.
//! Every table is keyed by `user_id`; there is no notion of a current user
//! anywhere in the store.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: sessions, projects, settings
    r#"
    -- Sessions are append-only. `seq` records logging order so reads can
    -- return the most recently logged session first.
    CREATE TABLE sessions (
        seq                         INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id                     TEXT NOT NULL,
        id                          TEXT NOT NULL,
        project_id                  TEXT,
        date                        TEXT NOT NULL,
        start_time                  TEXT NOT NULL DEFAULT '',
        end_time                    TEXT NOT NULL DEFAULT '',
        word_count                  INTEGER NOT NULL,
        stress_level                INTEGER NOT NULL,
        used_skeleton               INTEGER NOT NULL DEFAULT 0,
        used_drafts                 INTEGER NOT NULL DEFAULT 0,
        auto_correction_frequency   INTEGER NOT NULL,
        difficulty_level            INTEGER NOT NULL,
        specific_difficulties       TEXT NOT NULL DEFAULT '',
        was_multitasking            INTEGER NOT NULL DEFAULT 0,
        multitasking_description    TEXT NOT NULL DEFAULT '',
        used_time_strategy          INTEGER NOT NULL DEFAULT 0,
        time_strategy_description   TEXT NOT NULL DEFAULT '',
        self_rewarded               INTEGER NOT NULL DEFAULT 0,
        reward_description          TEXT NOT NULL DEFAULT '',
        session_rating              INTEGER NOT NULL,

        UNIQUE(user_id, id)
    );

    CREATE INDEX idx_sessions_user_seq ON sessions(user_id, seq DESC);
    CREATE INDEX idx_sessions_user_project ON sessions(user_id, project_id);

    -- Projects keep their creation position when updated in place.
    CREATE TABLE projects (
        seq                 INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id             TEXT NOT NULL,
        id                  TEXT NOT NULL,
        name                TEXT NOT NULL,
        description         TEXT NOT NULL DEFAULT '',
        color               TEXT NOT NULL,
        status              TEXT NOT NULL,      -- 'active', 'completed', 'archived'
        target_word_count   INTEGER,
        created_at          DATETIME NOT NULL,

        UNIQUE(user_id, id)
    );

    CREATE INDEX idx_projects_user_seq ON projects(user_id, seq);

    CREATE TABLE settings (
        user_id             TEXT PRIMARY KEY,
        daily_word_goal     INTEGER NOT NULL,
        weekly_word_goal    INTEGER NOT NULL,
        updated_at          DATETIME NOT NULL
    );
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version = get_schema_version(conn)?;

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_reach_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('sessions', 'projects', 'settings')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
