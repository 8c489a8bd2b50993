//! parnaso - writing habit tracker CLI
//!
//! Log writing sessions, manage projects and goals, and review stats,
//! streaks and trophies. Every command names the user it acts on.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/parnaso/parnaso.db (~/.local/share/parnaso/parnaso.db)
//! - Config: $XDG_CONFIG_HOME/parnaso/config.toml (~/.config/parnaso/config.toml)
//! - Logs: $XDG_STATE_HOME/parnaso/parnaso.log (~/.local/state/parnaso/parnaso.log)

mod render;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use parnaso_core::analytics::{build_dashboard, evaluate_sessions, DashboardQuery, DateFilter};
use parnaso_core::{
    new_id, Config, Database, Project, ProjectStatus, UserSettings, WritingSession,
    DEFAULT_PROJECT_COLORS,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "parnaso")]
#[command(about = "Track writing sessions, goals, streaks and trophies")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a writing session
    Log(LogArgs),

    /// Import a JSON array of sessions
    Import {
        #[command(flatten)]
        user: UserArg,

        /// JSON file holding the sessions, newest first
        file: PathBuf,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Show or change word goals
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Show the dashboard: totals, series, goals and calendar
    Stats {
        #[command(flatten)]
        user: UserArg,

        /// Date range (all, last-7-days, last-30-days, last-6-months, last-1-year); defaults to the config value
        #[arg(short, long)]
        filter: Option<DateFilter>,

        /// Restrict to one project
        #[arg(short, long)]
        project: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show trophy progress
    Trophies {
        #[command(flatten)]
        user: UserArg,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Delete a user's sessions and projects and reset their goals
    Reset {
        #[command(flatten)]
        user: UserArg,

        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Operations across all users
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(ClapArgs, Debug)]
struct UserArg {
    /// User the command acts on
    #[arg(short = 'u', long = "user", value_name = "USER")]
    user_id: String,
}

#[derive(ClapArgs, Debug)]
struct LogArgs {
    #[command(flatten)]
    user: UserArg,

    /// Words written
    #[arg(short, long)]
    words: u64,

    /// When the session happened (ISO 8601); defaults to now
    #[arg(short, long)]
    date: Option<String>,

    /// Project the session belongs to
    #[arg(short, long)]
    project: Option<String>,

    #[arg(long, default_value = "")]
    start_time: String,

    #[arg(long, default_value = "")]
    end_time: String,

    /// 1 (tranquil) to 5 (stressful)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    stress: u8,

    /// 1 (none) to 5 (intense)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    difficulty: u8,

    /// 1 (rarely) to 5 (constantly)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    auto_correction: u8,

    /// 1 (terrible) to 5 (excellent)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    rating: u8,

    /// Worked from an outline
    #[arg(long)]
    skeleton: bool,

    /// Wrote drafts first
    #[arg(long)]
    drafts: bool,

    /// What got in the way
    #[arg(long, default_value = "")]
    difficulties: String,

    /// Multitasking during the session, and on what
    #[arg(long, value_name = "DESCRIPTION")]
    multitasking: Option<String>,

    /// Time management technique used
    #[arg(long, value_name = "DESCRIPTION")]
    time_strategy: Option<String>,

    /// Reward taken after the session
    #[arg(long, value_name = "DESCRIPTION")]
    reward: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// Create or update a project
    Add {
        #[command(flatten)]
        user: UserArg,

        name: String,

        /// Project id; a random one is generated when omitted
        #[arg(long)]
        id: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        /// Hex color; picked from the palette when omitted
        #[arg(long)]
        color: Option<String>,

        /// Total word target
        #[arg(long)]
        target: Option<u64>,

        #[arg(long, default_value = "active")]
        status: ProjectStatus,
    },

    /// List projects in creation order
    List {
        #[command(flatten)]
        user: UserArg,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Show the current goals
    Show {
        #[command(flatten)]
        user: UserArg,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Change one or both goals
    Set {
        #[command(flatten)]
        user: UserArg,

        #[arg(long)]
        daily: Option<u64>,

        #[arg(long)]
        weekly: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// List every user with stored data
    Users,

    /// Words and sessions summed over all users
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Dump everything stored for a user as JSON
    Inspect { user: String },

    /// Remove everything stored for a user
    Delete {
        user: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = parnaso_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let db_path = config.resolved_database_path();
    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    db.migrate().context("failed to run migrations")?;

    tracing::debug!(command = ?args.command, "Running command");

    let now = Local::now().naive_local();

    match args.command {
        Command::Log(log) => cmd_log(&db, log),
        Command::Import { user, file } => cmd_import(&db, &user.user_id, &file),
        Command::Project { command } => cmd_project(&db, command),
        Command::Settings { command } => cmd_settings(&db, &config, command),
        Command::Stats {
            user,
            filter,
            project,
            format,
        } => {
            let filter = match filter {
                Some(f) => f,
                None => config.dashboard.filter()?,
            };
            cmd_stats(&db, &config, &user.user_id, filter, project, format, now)
        }
        Command::Trophies { user, format } => cmd_trophies(&db, &user.user_id, format),
        Command::Reset { user, yes } => cmd_reset(&db, &user.user_id, yes),
        Command::Admin { command } => cmd_admin(&db, &config, command),
    }
}

fn cmd_log(db: &Database, args: LogArgs) -> Result<()> {
    let user = &args.user.user_id;

    if let Some(project_id) = &args.project {
        db.require_project(user, project_id)?;
    }

    let session = WritingSession {
        id: new_id(),
        project_id: args.project,
        date: args.date.unwrap_or_else(|| Utc::now().to_rfc3339()),
        start_time: args.start_time,
        end_time: args.end_time,
        word_count: args.words,
        stress_level: args.stress,
        used_skeleton: args.skeleton,
        used_drafts: args.drafts,
        auto_correction_frequency: args.auto_correction,
        difficulty_level: args.difficulty,
        specific_difficulties: args.difficulties,
        was_multitasking: args.multitasking.is_some(),
        multitasking_description: args.multitasking.unwrap_or_default(),
        used_time_strategy: args.time_strategy.is_some(),
        time_strategy_description: args.time_strategy.unwrap_or_default(),
        self_rewarded: args.reward.is_some(),
        reward_description: args.reward.unwrap_or_default(),
        session_rating: args.rating,
    };

    db.save_session(user, &session)
        .context("failed to save session")?;

    println!(
        "Logged {} words for {} ({})",
        parnaso_core::format::format_words(session.word_count),
        user,
        session.project_key()
    );
    Ok(())
}

fn cmd_import(db: &Database, user: &str, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let sessions: Vec<WritingSession> =
        serde_json::from_str(&content).context("failed to parse session list")?;

    let imported = db
        .save_sessions(user, &sessions)
        .context("failed to import sessions")?;

    println!("Imported {} sessions for {}", imported, user);
    Ok(())
}

fn cmd_project(db: &Database, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Add {
            user,
            name,
            id,
            description,
            color,
            target,
            status,
        } => {
            let existing = db.get_projects(&user.user_id)?;
            let id = id.unwrap_or_else(new_id);
            let previous = existing.iter().find(|p| p.id == id);

            let color = color.unwrap_or_else(|| match previous {
                Some(p) => p.color.clone(),
                None => DEFAULT_PROJECT_COLORS[existing.len() % DEFAULT_PROJECT_COLORS.len()]
                    .to_string(),
            });

            let project = Project {
                id,
                name,
                description,
                color,
                status,
                target_word_count: target,
                created_at: previous.map(|p| p.created_at).unwrap_or_else(Utc::now),
            };
            db.save_project(&user.user_id, &project)?;

            let verb = if previous.is_some() { "Updated" } else { "Added" };
            println!("{} project {} ({})", verb, project.name, project.id);
            Ok(())
        }
        ProjectCommand::List { user, format } => {
            let projects = db.get_projects(&user.user_id)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&projects)?),
                OutputFormat::Text => render::print_projects(&projects),
            }
            Ok(())
        }
    }
}

fn cmd_settings(db: &Database, config: &Config, command: SettingsCommand) -> Result<()> {
    let defaults = config.goals.default_settings();

    match command {
        SettingsCommand::Show { user, format } => {
            let settings = db.get_settings(&user.user_id, defaults)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
                OutputFormat::Text => render::print_settings(&user.user_id, &settings),
            }
            Ok(())
        }
        SettingsCommand::Set {
            user,
            daily,
            weekly,
        } => {
            if daily.is_none() && weekly.is_none() {
                bail!("nothing to change: pass --daily and/or --weekly");
            }

            let current = db.get_settings(&user.user_id, defaults)?;
            let settings = UserSettings {
                daily_word_goal: daily.unwrap_or(current.daily_word_goal),
                weekly_word_goal: weekly.unwrap_or(current.weekly_word_goal),
            };
            db.save_settings(&user.user_id, &settings)?;

            render::print_settings(&user.user_id, &settings);
            Ok(())
        }
    }
}

fn cmd_stats(
    db: &Database,
    config: &Config,
    user: &str,
    filter: DateFilter,
    project: Option<String>,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<()> {
    if let Some(project_id) = &project {
        db.require_project(user, project_id)?;
    }

    let data = db.get_user_data(user, config.goals.default_settings())?;
    let mut query = DashboardQuery::new(filter);
    if let Some(project_id) = project {
        query = query.for_project(project_id);
    }

    let view = build_dashboard(&data, &query, now);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => render::print_dashboard(user, &view, &data.projects, now),
    }
    Ok(())
}

fn cmd_trophies(db: &Database, user: &str, format: OutputFormat) -> Result<()> {
    let sessions = db.get_sessions(user)?;
    let trophies = evaluate_sessions(&sessions);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trophies)?),
        OutputFormat::Text => render::print_trophies(&trophies),
    }
    Ok(())
}

fn cmd_reset(db: &Database, user: &str, yes: bool) -> Result<()> {
    if !yes {
        bail!("this deletes all sessions and projects of {}; pass --yes to confirm", user);
    }

    db.clear_all_data(user)?;
    println!("Cleared all data for {}", user);
    Ok(())
}

fn cmd_admin(db: &Database, config: &Config, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Users => {
            for user in db.list_users()? {
                println!("{}", user);
            }
            Ok(())
        }
        AdminCommand::Stats { format } => {
            let users = db.list_users()?;
            let stats = db.global_stats(&users)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Text => render::print_global_stats(users.len(), &stats),
            }
            Ok(())
        }
        AdminCommand::Inspect { user } => {
            if !db.user_exists(&user)? {
                return Err(parnaso_core::Error::UserNotFound(user).into());
            }
            let data = db.get_user_data(&user, config.goals.default_settings())?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        AdminCommand::Delete { user, yes } => {
            if !yes {
                bail!("this deletes everything stored for {}; pass --yes to confirm", user);
            }
            db.delete_user_data(&user)?;
            println!("Deleted all data for {}", user);
            Ok(())
        }
    }
}
