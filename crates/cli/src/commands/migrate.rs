//! `mesa-cli migrate` - run the server database migrations.

use super::{CliError, connect};

/// Run all pending migrations from `crates/server/migrations/`.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("running migrations");
    sqlx::migrate!("../server/migrations").run(&pool).await?;
    tracing::info!("migrations complete");

    Ok(())
}
