//! Database layer for parnaso
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for per-user queries
//! - Admin operations spanning users

pub mod repo;
pub mod schema;

pub use repo::Database;
