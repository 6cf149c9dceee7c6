//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Read the database URL from `MESA_DATABASE_URL` or `DATABASE_URL`.
fn database_url() -> Result<SecretString, CliError> {
    let _ = dotenvy::dotenv();

    std::env::var("MESA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("MESA_DATABASE_URL".to_string()))
}

/// Connect with a small pool; CLI commands are short-lived.
async fn connect() -> Result<PgPool, CliError> {
    let url = database_url()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(url.expose_secret())
        .await?;
    Ok(pool)
}
