//! Schema bootstrap for the product store.
//!
//! Migrations are embedded at compile time from `backend/migrations` and are
//! applied over a short-lived synchronous `PgConnection`, off the async
//! runtime. Applying them twice is harmless: Diesel records every applied
//! version in `__diesel_schema_migrations`.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::config::DatabaseSettings;

use super::pool::{DbPool, PoolConfig, PoolError};

/// Embedded migrations from the backend/migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while preparing the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitDbError {
    /// The migration connection could not be established.
    #[error("failed to connect for migrations: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// A migration failed to apply or revert.
    #[error("failed to apply migrations: {message}")]
    Migration {
        /// Underlying failure description.
        message: String,
    },
    /// The connection pool could not be built.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl InitDbError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a migration error with the given message.
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }
}

fn establish(database_url: &str) -> Result<PgConnection, InitDbError> {
    PgConnection::establish(database_url).map_err(|err| InitDbError::connection(err.to_string()))
}

/// Apply every pending migration and return how many were applied.
///
/// # Errors
///
/// Returns [`InitDbError::Connection`] when the database is unreachable and
/// [`InitDbError::Migration`] when a migration fails.
pub fn run_migrations(database_url: &str) -> Result<usize, InitDbError> {
    let mut conn = establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| InitDbError::migration(err.to_string()))?;
    Ok(applied.len())
}

/// Revert every applied migration, then apply them all again.
///
/// This drops and recreates the `products` table, discarding its rows.
///
/// # Errors
///
/// Same as [`run_migrations`].
pub fn recreate_schema(database_url: &str) -> Result<usize, InitDbError> {
    let mut conn = establish(database_url)?;
    let reverted = conn
        .revert_all_migrations(MIGRATIONS)
        .map_err(|err| InitDbError::migration(err.to_string()))?;
    info!(reverted = reverted.len(), "reverted database schema");
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| InitDbError::migration(err.to_string()))?;
    Ok(applied.len())
}

/// Bring the schema up to date and open the connection pool.
///
/// The returned pool is the storage context for
/// [`DieselProductRepository`](super::DieselProductRepository). Calling this
/// again against an initialised database applies nothing.
///
/// # Errors
///
/// Returns [`InitDbError`] when migrations cannot be applied or the pool
/// cannot be built.
pub async fn init_db(settings: &DatabaseSettings) -> Result<DbPool, InitDbError> {
    let database_url = settings.uri().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&database_url))
        .await
        .map_err(|err| InitDbError::migration(err.to_string()))??;
    info!(applied, "database schema is up to date");

    let pool = DbPool::new(PoolConfig::from(settings)).await?;
    info!(
        max_connections = settings.max_connections(),
        "database pool ready"
    );
    Ok(pool)
}
