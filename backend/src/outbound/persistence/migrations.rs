//! Embedded schema migrations applied at startup.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{error, info};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply pending migrations over a dedicated synchronous connection.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a migration
/// fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

/// Apply migrations on the blocking pool, logging instead of failing.
///
/// Returns whether the schema is known to be current.
pub async fn apply_migrations_logged(database_url: String) -> bool {
    let result = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url)).await;
    match result {
        Ok(Ok(count)) => {
            info!(applied = count, "database migrations complete");
            true
        }
        Ok(Err(err)) => {
            error!(error = %err, "database migrations failed");
            false
        }
        Err(err) => {
            error!(error = %err, "database migration task did not complete");
            false
        }
    }
}
