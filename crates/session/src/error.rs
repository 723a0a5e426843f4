//! Session-level error types.

use std::io;

use thiserror::Error;

/// Failures of the interactive input source.
///
/// Malformed numbers never show up here: the reader re-prompts for those.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input reached end-of-file.
    #[error("input closed")]
    Closed,

    #[error("console read failed: {0}")]
    Io(#[from] io::Error),
}

/// Errors that escape a menu operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Writing to the console failed.
    #[error("console write failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Input(#[from] InputError),

    /// The store rejected a statement or the connection failed.
    #[error("{0}")]
    Db(#[from] db::DbError),
}

impl SessionError {
    pub fn is_input_closed(&self) -> bool {
        matches!(self, Self::Input(InputError::Closed))
    }
}

/// Errors from rendering the employee report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Db(#[from] db::DbError),

    #[error("console write failed: {0}")]
    Io(#[from] io::Error),
}
