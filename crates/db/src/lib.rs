//! `db` crate — pure persistence layer.
//!
//! Provides the single store connection, the transaction-owning [`Gateway`],
//! typed row structs, and repository functions for every table in the
//! exercise schema. No menu or console logic lives here.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pool;
pub mod repository;

pub use config::DbConfig;
pub use error::{DbError, ErrorKind};
pub use gateway::Gateway;
pub use pool::DbPool;
