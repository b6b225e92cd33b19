//! Database operations for the storefront `PostgreSQL`.
//!
//! # Database: `aroura_storefront`
//!
//! The catalog is static and lives in the binary; the database stores only
//! per-identity documents and orders:
//!
//! ## Tables
//!
//! - `storefront.collection_document` - server-persisted carts and wishlists,
//!   one JSONB document per (identity, kind)
//! - `storefront.order` - checkout orders and their payment state
//! - `tower_sessions.session` - tower-sessions storage (created by the
//!   session store's own migration)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p aroura-cli -- migrate
//! ```

pub mod collections;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use collections::{CollectionKind, PgRemoteStore};
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate gateway order id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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
