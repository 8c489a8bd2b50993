use parnaso_core::{Database, UserSettings};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("parnaso/parnaso.db")
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("parnaso");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }

    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("failed to write file");
        path
    }
}

fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    Command::new(PathBuf::from(assert_cmd::cargo::cargo_bin!("parnaso")))
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute parnaso: {e}"))
}

fn run_ok(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run(env, args);
    if !output.status.success() {
        panic!(
            "parnaso {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn run_json(env: &CliTestEnv, args: &[&str]) -> Value {
    let stdout = run_ok(env, args);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("expected JSON from parnaso {}: {e}\n{stdout}", args.join(" ")))
}

fn run_err(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run(env, args);
    assert!(
        !output.status.success(),
        "parnaso {} should have failed",
        args.join(" ")
    );
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn log_then_stats_reports_totals() {
    let env = CliTestEnv::new();

    let stdout = run_ok(
        &env,
        &["log", "--user", "ana", "--words", "1200", "--date", "2024-03-01T10:00:00"],
    );
    assert!(stdout.contains("Logged 1,200 words"), "got:\n{stdout}");
    run_ok(
        &env,
        &[
            "log", "-u", "ana", "-w", "300", "-d", "2024-03-02", "--stress", "5", "--skeleton",
            "--time-strategy", "Pomodoro",
        ],
    );

    let view = run_json(&env, &["stats", "-u", "ana", "--filter", "all", "--format", "json"]);
    assert_eq!(view["totals"]["total_words"], 1500);
    assert_eq!(view["totals"]["session_count"], 2);
    assert_eq!(view["totals"]["average_words_per_session"], 750);
    assert_eq!(view["totals"]["average_stress"], 4.0);
    assert_eq!(view["words_over_time"][0]["date"], "01/03");
    assert_eq!(view["words_over_time"][1]["general"], 300);
    assert_eq!(view["achievement_stats"]["max_streak"], 2);

    let strategies = view["strategies"].as_array().unwrap();
    assert_eq!(strategies.len(), 2);

    assert!(env.db_path().exists());
    let db = Database::open(&env.db_path()).unwrap();
    db.migrate().unwrap();
    assert_eq!(db.get_sessions("ana").unwrap()[0].word_count, 300);
}

#[test]
fn session_logged_now_counts_toward_today() {
    let env = CliTestEnv::new();
    run_ok(&env, &["log", "-u", "ana", "-w", "250"]);

    let view = run_json(&env, &["stats", "-u", "ana", "--format", "json"]);
    assert_eq!(view["goals"]["words_today"], 250);
    assert_eq!(view["goals"]["daily_progress"], 50);
    assert_eq!(view["current_streak"], 1);

    let text = run_ok(&env, &["stats", "-u", "ana"]);
    assert!(text.contains("SUMMARY"), "got:\n{text}");
    assert!(text.contains("1 day"), "got:\n{text}");
}

#[test]
fn project_sessions_and_progress() {
    let env = CliTestEnv::new();

    let stdout = run_ok(
        &env,
        &["project", "add", "-u", "ana", "Novel", "--id", "novel", "--target", "2000"],
    );
    assert!(stdout.contains("Added project Novel"), "got:\n{stdout}");

    run_ok(&env, &["log", "-u", "ana", "-w", "500", "-d", "2024-03-01", "-p", "novel"]);
    run_ok(&env, &["log", "-u", "ana", "-w", "100", "-d", "2024-03-01"]);

    let view = run_json(
        &env,
        &["stats", "-u", "ana", "-f", "all", "-p", "novel", "--format", "json"],
    );
    assert_eq!(view["project"]["name"], "Novel");
    assert_eq!(view["totals"]["total_words"], 500);
    assert_eq!(view["project_progress"], 25);
    // Trophies look at every session, not just the project
    assert_eq!(view["achievement_stats"]["total_words"], 600);

    let stdout = run_ok(
        &env,
        &["project", "add", "-u", "ana", "Novel II", "--id", "novel", "--status", "completed"],
    );
    assert!(stdout.contains("Updated project"), "got:\n{stdout}");

    let projects = run_json(&env, &["project", "list", "-u", "ana", "--format", "json"]);
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Novel II");
    assert_eq!(projects[0]["status"], "completed");
}

#[test]
fn unknown_project_is_rejected() {
    let env = CliTestEnv::new();

    let stderr = run_err(&env, &["log", "-u", "ana", "-w", "10", "-p", "ghost"]);
    assert!(stderr.contains("project not found: ghost"), "got:\n{stderr}");

    let stderr = run_err(&env, &["stats", "-u", "ana", "-p", "ghost"]);
    assert!(stderr.contains("project not found"), "got:\n{stderr}");
}

#[test]
fn invalid_input_is_rejected() {
    let env = CliTestEnv::new();

    run_err(&env, &["log", "-u", "ana", "-w", "10", "--stress", "6"]);
    let stderr = run_err(&env, &["log", "-u", "ana", "-w", "10", "-d", "last tuesday"]);
    assert!(stderr.contains("unparseable date"), "got:\n{stderr}");
    let stderr = run_err(&env, &["log", "-u", "ana", "-w", "9223372036854775807"]);
    assert!(stderr.contains("wordCount must be at most"), "got:\n{stderr}");
    run_err(&env, &["stats", "-u", "ana", "--filter", "fortnight"]);
    let stderr = run_err(&env, &["settings", "set", "-u", "ana", "--daily", "0"]);
    assert!(stderr.contains("greater than zero"), "got:\n{stderr}");

    let db = Database::open(&env.db_path()).unwrap();
    db.migrate().unwrap();
    assert!(db.get_sessions("ana").unwrap().is_empty());
}

#[test]
fn settings_use_config_defaults_until_saved() {
    let env = CliTestEnv::new();
    env.write_config("[goals]\ndaily_word_goal = 800\nweekly_word_goal = 5000\n");

    let settings = run_json(&env, &["settings", "show", "-u", "ana", "--format", "json"]);
    assert_eq!(settings["dailyWordGoal"], 800);
    assert_eq!(settings["weeklyWordGoal"], 5000);

    run_ok(&env, &["settings", "set", "-u", "ana", "--weekly", "6000"]);
    let settings = run_json(&env, &["settings", "show", "-u", "ana", "--format", "json"]);
    assert_eq!(settings["dailyWordGoal"], 800);
    assert_eq!(settings["weeklyWordGoal"], 6000);

    let db = Database::open(&env.db_path()).unwrap();
    db.migrate().unwrap();
    let stored = db.get_settings("ana", UserSettings::default()).unwrap();
    assert_eq!(stored.weekly_word_goal, 6000);
}

#[test]
fn import_then_trophies() {
    let env = CliTestEnv::new();
    let file = env.write_file(
        "sessions.json",
        r#"[
            {"id": "c", "date": "2024-02-03T09:00:00", "wordCount": 2100, "stressLevel": 2,
             "autoCorrectionFrequency": 2, "difficultyLevel": 2, "sessionRating": 5},
            {"id": "b", "date": "2024-02-02T09:00:00", "wordCount": 400, "stressLevel": 3,
             "autoCorrectionFrequency": 3, "difficultyLevel": 3, "sessionRating": 3},
            {"id": "a", "date": "2024-02-01T09:00:00", "wordCount": 499, "stressLevel": 3,
             "autoCorrectionFrequency": 3, "difficultyLevel": 3, "sessionRating": 3}
        ]"#,
    );

    let stdout = run_ok(&env, &["import", "-u", "ana", file.to_str().unwrap()]);
    assert!(stdout.contains("Imported 3 sessions"), "got:\n{stdout}");

    let trophies = run_json(&env, &["trophies", "-u", "ana", "--format", "json"]);
    let trophies = trophies.as_array().unwrap();
    assert_eq!(trophies.len(), 10);

    let find = |id: &str| {
        trophies
            .iter()
            .find(|t| t["trophy"]["id"] == id)
            .unwrap_or_else(|| panic!("missing trophy {id}"))
    };
    assert_eq!(find("daily_2000")["unlocked"], true);
    assert_eq!(find("weekly_3000")["unlocked"], false);
    assert_eq!(find("weekly_3000")["current_value"], 2999);
    assert_eq!(find("weekly_3000")["progress_pct"], 99);
    assert_eq!(find("streak_3")["unlocked"], true);

    let text = run_ok(&env, &["trophies", "-u", "ana"]);
    assert!(text.contains("Hyperfocus"), "got:\n{text}");

    // Importing the same file again must not duplicate anything
    run_err(&env, &["import", "-u", "ana", file.to_str().unwrap()]);
    let view = run_json(&env, &["stats", "-u", "ana", "-f", "all", "--format", "json"]);
    assert_eq!(view["totals"]["session_count"], 3);
}

#[test]
fn reset_and_admin_commands() {
    let env = CliTestEnv::new();
    run_ok(&env, &["log", "-u", "ana", "-w", "100", "-d", "2024-01-01"]);
    run_ok(&env, &["log", "-u", "ben", "-w", "50", "-d", "2024-01-01"]);
    run_ok(&env, &["project", "add", "-u", "carla", "Poems"]);

    let users = run_ok(&env, &["admin", "users"]);
    assert_eq!(users.lines().collect::<Vec<_>>(), vec!["ana", "ben", "carla"]);

    let stats = run_json(&env, &["admin", "stats", "--format", "json"]);
    assert_eq!(stats["totalWords"], 150);
    assert_eq!(stats["totalSessions"], 2);

    let data = run_json(&env, &["admin", "inspect", "ana"]);
    assert_eq!(data["sessions"][0]["wordCount"], 100);
    assert_eq!(data["settings"]["dailyWordGoal"], 500);

    let stderr = run_err(&env, &["reset", "-u", "ana"]);
    assert!(stderr.contains("--yes"), "got:\n{stderr}");
    run_ok(&env, &["reset", "-u", "ana", "--yes"]);
    let view = run_json(&env, &["stats", "-u", "ana", "-f", "all", "--format", "json"]);
    assert_eq!(view["totals"]["session_count"], 0);

    run_ok(&env, &["admin", "delete", "ben", "--yes"]);
    let users = run_ok(&env, &["admin", "users"]);
    assert_eq!(users.lines().collect::<Vec<_>>(), vec!["carla"]);

    let stderr = run_err(&env, &["admin", "inspect", "ben"]);
    assert!(stderr.contains("user not found"), "got:\n{stderr}");
}
