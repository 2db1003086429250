//! Database migration command.
//!
//! Applies the embedded `shop` schema migrations from `crates/api/migrations/`
//! and then the tower-sessions store migration. The API server never
//! migrates on startup.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run all database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running shop schema migrations...");
    kiosk_api::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Running session store migration...");
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
