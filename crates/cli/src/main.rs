//! Mesa CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mesa-cli migrate
//!
//! # Seed the catalog with sample data
//! mesa-cli seed
//! ```
//!
//! Reads the database URL from `MESA_DATABASE_URL` (or `DATABASE_URL`),
//! loading `.env` if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mesa-cli")]
#[command(author, version, about = "Mesa CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with sample categories and items
    Seed,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mesa_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
    };

    if let Err(e) = result {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}
