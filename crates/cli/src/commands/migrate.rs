//! Database migration command.
//!
//! Applies the migrations in `crates/storefront/migrations/` (schema
//! `storefront` plus the `tower_sessions` session table). Already-applied
//! migrations are skipped, so the command is safe to re-run.

use jungle_storefront::db::MIGRATOR;

use super::{CliError, connect};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
