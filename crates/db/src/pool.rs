//! Autocommit connection used by the read-only report and the student menu.
//!
//! The pool is capped at one connection: every exercise talks to the store
//! through exactly one connection at a time. The transactional product
//! session does not use it; it owns a bare connection through
//! [`crate::Gateway`].

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::info;

use crate::{DbConfig, DbError};

/// Type alias for the one-connection pool.
pub type DbPool = AnyPool;

/// Open the connection described by `config`.
///
/// The connection is opened eagerly so that connectivity problems surface
/// here, at startup, rather than on the first statement.
pub async fn connect(config: &DbConfig) -> Result<DbPool, DbError> {
    sqlx::any::install_default_drivers();

    info!("Connecting to database at {}", config.redacted());
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(config.url())
        .await?;
    Ok(pool)
}

/// Create the exercise tables if they are missing, using the embedded
/// migrations in `./migrations` (relative to the workspace root).
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("Running database migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A migrated, private in-memory SQLite store.
    pub async fn memory_pool() -> DbPool {
        let config = DbConfig::from_url("sqlite::memory:").unwrap();
        let pool = connect(&config).await.expect("in-memory sqlite should open");
        run_migrations(&pool).await.expect("migrations should apply");
        pool
    }

    /// A migrated SQLite file in a fresh temp dir, for tests that reconnect.
    /// Keep the returned dir alive for the duration of the test.
    pub async fn file_store() -> (tempfile::TempDir, DbConfig) {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("nimbus.db").display());
        let config = DbConfig::from_url(url).unwrap();

        let pool = connect(&config).await.expect("sqlite file should open");
        run_migrations(&pool).await.expect("migrations should apply");
        pool.close().await;

        (dir, config)
    }
}
