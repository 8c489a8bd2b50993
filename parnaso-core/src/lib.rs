//! # parnaso-core
//!
//! Core library for parnaso, a writing-habit tracker.
//!
//! This library provides:
//! - Domain types for writing sessions, projects and settings
//! - An analytics engine deriving stats, streaks, goals and trophies
//! - Database storage layer with SQLite, scoped per user
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Raw session records are the only thing persisted. Every derived number
//! (totals, series, streaks, trophy state) is recomputed from the full
//! session list on each query by the pure functions in [`analytics`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Local;
//! use parnaso_core::analytics::{build_dashboard, DashboardQuery, DateFilter};
//! use parnaso_core::{Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&config.resolved_database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let data = db
//!     .get_user_data("ana", config.goals.default_settings())
//!     .expect("failed to read data");
//! let view = build_dashboard(
//!     &data,
//!     &DashboardQuery::new(DateFilter::Last30Days),
//!     Local::now().naive_local(),
//! );
//! println!("{} words", view.totals.total_words);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
