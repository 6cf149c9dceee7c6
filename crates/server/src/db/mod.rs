//! Database operations for the Mesa `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `categories` / `items` - The menu catalog
//! - `carts` / `cart_lines` - One open cart per user, optimistically versioned
//! - `orders` / `order_lines` - Immutable order snapshots plus a mutable status
//!
//! Queries are bound at runtime (no compile-time verification), so the
//! workspace builds without a reachable database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p mesa-cli -- migrate
//! ```

pub mod carts;
pub mod items;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use items::ItemRepository;
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Timed out waiting for the database (pool exhausted or unreachable).
    #[error("database unavailable: {0}")]
    Timeout(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The record changed underneath us (optimistic version mismatch) or a
    /// constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::Timeout(e),
            other => Self::Database(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The bounded `acquire_timeout` keeps persistence calls from hanging; a
/// saturated pool surfaces as [`RepositoryError::Timeout`].
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
