//! Integration tests for parnaso storage and analytics
//!
//! These tests store sessions through the public `Database` API, read them
//! back per user and run the dashboard and trophy engine over the result.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use parnaso_core::analytics::{
    build_dashboard, evaluate_sessions, filter_by_date, max_streak, DashboardQuery, DateFilter,
};
use parnaso_core::db::Database;
use parnaso_core::types::{Project, ProjectStatus, UserSettings, WritingSession};
use parnaso_core::{Config, Error};
use tempfile::TempDir;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn open_db() -> Database {
    parnaso_core::logging::init_test();
    let db = Database::open_in_memory().expect("open in-memory db");
    db.migrate().expect("migrate");
    db
}

fn project(id: &str, target: Option<u64>) -> Project {
    Project {
        id: id.to_string(),
        name: id.to_uppercase(),
        description: String::new(),
        color: "#34d399".to_string(),
        status: ProjectStatus::Active,
        target_word_count: target,
        created_at: Utc::now(),
    }
}

/// Sessions on June 13, 14 and 15, plus an old one in January.
fn seed(db: &Database, user: &str) {
    db.save_project(user, &project("essay", Some(2000))).unwrap();

    let mut sessions = vec![
        WritingSession::new("jan", "2024-01-10T09:00:00", 1200),
        WritingSession::new("d13", "2024-06-13T09:00:00", 300).with_project("essay"),
        WritingSession::new("d14", "2024-06-14T09:00:00", 400),
        WritingSession::new("d15", "2024-06-15T09:00:00", 500).with_project("essay"),
    ];
    sessions[1].used_skeleton = true;
    sessions[2].used_skeleton = true;
    sessions[3].used_drafts = true;
    sessions[3].stress_level = 1;

    for session in &sessions {
        db.save_session(user, session).unwrap();
    }
}

// ============================================
// Store + engine
// ============================================

#[test]
fn test_dashboard_from_stored_data() {
    let db = open_db();
    seed(&db, "ana");

    let data = db.get_user_data("ana", UserSettings::default()).unwrap();
    let view = build_dashboard(&data, &DashboardQuery::new(DateFilter::Last7Days), now());

    assert_eq!(view.totals.session_count, 3);
    assert_eq!(view.totals.total_words, 1200);
    assert_eq!(view.totals.average_words_per_session, 400);
    assert_eq!(view.current_streak, 3);

    let labels: Vec<&str> = view.words_over_time.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["13/06", "14/06", "15/06"]);
    assert_eq!(view.words_over_time[0].words_for("essay"), 300);
    assert_eq!(view.words_over_time[1].words_for("general"), 400);

    assert_eq!(view.goals.words_today, 500);
    assert_eq!(view.goals.daily_progress, 100);
    assert_eq!(view.goals.words_last_week, 1200);

    // 2,400 words overall: Quick Start, Deep Flow (the January day) and Spark
    assert_eq!(view.achievement_stats.total_words, 2400);
    assert_eq!(view.unlocked_count(), 3);
}

#[test]
fn test_project_dashboard_from_stored_data() {
    let db = open_db();
    seed(&db, "ana");

    let data = db.get_user_data("ana", UserSettings::default()).unwrap();
    let query = DashboardQuery::new(DateFilter::All).for_project("essay");
    let view = build_dashboard(&data, &query, now());

    assert_eq!(view.totals.total_words, 800);
    assert_eq!(view.project_progress, 40);
    // June 14 was a general session, so the project streak is only today
    assert_eq!(view.current_streak, 1);
}

#[test]
fn test_filter_over_stored_sessions() {
    let db = open_db();
    seed(&db, "ana");

    let sessions = db.get_sessions("ana").unwrap();
    assert_eq!(filter_by_date(&sessions, DateFilter::Last30Days, now()).len(), 3);
    assert_eq!(filter_by_date(&sessions, DateFilter::Last1Year, now()).len(), 4);
    assert_eq!(max_streak(&sessions), 3);
}

#[test]
fn test_trophies_follow_new_sessions() {
    let db = open_db();
    seed(&db, "ana");

    let before = evaluate_sessions(&db.get_sessions("ana").unwrap());
    let hyperfocus = before.iter().find(|t| t.trophy.id == "daily_2000").unwrap();
    assert!(!hyperfocus.unlocked);
    assert_eq!(hyperfocus.progress_pct, 60);

    db.save_session("ana", &WritingSession::new("big", "2024-06-15T20:00:00", 1500))
        .unwrap();

    let after = evaluate_sessions(&db.get_sessions("ana").unwrap());
    let hyperfocus = after.iter().find(|t| t.trophy.id == "daily_2000").unwrap();
    assert!(hyperfocus.unlocked);
    assert_eq!(hyperfocus.progress_pct, 100);
}

#[test]
fn test_settings_drive_goal_progress() {
    let db = open_db();
    seed(&db, "ana");
    db.save_settings(
        "ana",
        &UserSettings {
            daily_word_goal: 1000,
            weekly_word_goal: 2400,
        },
    )
    .unwrap();

    let data = db.get_user_data("ana", UserSettings::default()).unwrap();
    let view = build_dashboard(&data, &DashboardQuery::default(), now());
    assert_eq!(view.goals.daily_progress, 50);
    assert_eq!(view.goals.weekly_progress, 50);
}

// ============================================
// Multi-user behavior
// ============================================

#[test]
fn test_users_do_not_see_each_other() {
    let db = open_db();
    seed(&db, "ana");
    db.save_session("ben", &WritingSession::new("only", "2024-06-15T10:00:00", 50))
        .unwrap();

    let ben = db.get_user_data("ben", UserSettings::default()).unwrap();
    let view = build_dashboard(&ben, &DashboardQuery::new(DateFilter::All), now());
    assert_eq!(view.totals.total_words, 50);
    assert!(ben.projects.is_empty());

    let users = db.list_users().unwrap();
    assert_eq!(users, vec!["ana".to_string(), "ben".to_string()]);
    let stats = db.global_stats(&users).unwrap();
    assert_eq!(stats.total_words, 2450);
    assert_eq!(stats.total_sessions, 5);
}

#[test]
fn test_reset_then_delete() {
    let db = open_db();
    seed(&db, "ana");

    db.clear_all_data("ana").unwrap();
    let data = db.get_user_data("ana", UserSettings::default()).unwrap();
    assert!(data.sessions.is_empty());
    assert!(data.projects.is_empty());

    let view = build_dashboard(&data, &DashboardQuery::default(), now());
    assert_eq!(view.totals.session_count, 0);
    assert_eq!(view.current_streak, 0);
    assert_eq!(view.unlocked_count(), 0);

    assert!(matches!(
        db.delete_user_data("ana"),
        Err(Error::UserNotFound(_))
    ));
}

// ============================================
// Files on disk
// ============================================

#[test]
fn test_import_exported_json_into_file_db() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("data").join("parnaso.db");

    let exported = r#"[
        {"id": "2", "date": "2024-06-15T08:00:00.000Z", "wordCount": 700,
         "stressLevel": 2, "autoCorrectionFrequency": 2, "difficultyLevel": 3,
         "sessionRating": 4, "usedTimeStrategy": true, "timeStrategyDescription": "Pomodoro"},
        {"id": "1", "date": "2024-06-14", "wordCount": 300,
         "stressLevel": 4, "autoCorrectionFrequency": 3, "difficultyLevel": 4,
         "sessionRating": 2}
    ]"#;
    let sessions: Vec<WritingSession> = serde_json::from_str(exported).unwrap();

    {
        let db = Database::open(&db_path).unwrap();
        db.migrate().unwrap();
        assert_eq!(db.save_sessions("ana", &sessions).unwrap(), 2);
    }

    let db = Database::open(&db_path).unwrap();
    db.migrate().unwrap();
    let stored = db.get_sessions("ana").unwrap();
    assert_eq!(stored, sessions);
    assert_eq!(stored[0].time_strategy_description, "Pomodoro");
}

#[test]
fn test_config_points_at_database() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("custom.db");
    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[goals]\ndaily_word_goal = 750\n\n[storage]\ndatabase_path = {:?}\n",
            db_path
        ),
    )
    .unwrap();

    let config = Config::load_from(&config_path).unwrap();
    assert_eq!(config.resolved_database_path(), db_path);

    let db = Database::open(&config.resolved_database_path()).unwrap();
    db.migrate().unwrap();
    let settings = db
        .get_settings("ana", config.goals.default_settings())
        .unwrap();
    assert_eq!(settings.daily_word_goal, 750);
    assert_eq!(settings.weekly_word_goal, 3500);
    assert!(db_path.exists());
}
