//! Database migration command.
//!
//! Runs the storefront SQL migrations and the tower-sessions table
//! migration in one go. The server never migrates on startup; this command
//! is the only migration path.
//!
//! # Environment Variables
//!
//! - `AROURA_DATABASE_URL` (falls back to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all storefront migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is unset, the connection
/// fails, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("AROURA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("AROURA_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
