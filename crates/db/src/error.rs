//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid database configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of a [`DbError`], used by callers that need to
/// decide between compensating (rollback) and simply reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The store could not be reached, or the connection was lost.
    Connectivity,
    /// A constraint (primary key, not-null, …) rejected the statement.
    Constraint,
    /// Any other statement-level failure: syntax, decoding, missing table.
    Statement,
    /// A lookup matched no row.
    NotFound,
    /// Bad connection settings; never reaches the store.
    Config,
}

impl DbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Sqlx(err) => classify(err),
            Self::NotFound => ErrorKind::NotFound,
            Self::Migration(_) => ErrorKind::Statement,
            Self::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    /// True when the failure came from the store itself and any open
    /// transaction must be considered tainted.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Connectivity | ErrorKind::Constraint | ErrorKind::Statement
        )
    }
}

fn classify(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ErrorKind::Connectivity,
        sqlx::Error::Configuration(_) => ErrorKind::Config,
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::Database(db_err) => match db_err.kind() {
            sqlx::error::ErrorKind::UniqueViolation
            | sqlx::error::ErrorKind::ForeignKeyViolation
            | sqlx::error::ErrorKind::NotNullViolation
            | sqlx::error::ErrorKind::CheckViolation => ErrorKind::Constraint,
            _ => ErrorKind::Statement,
        },
        _ => ErrorKind::Statement,
    }
}
