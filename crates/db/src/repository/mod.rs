//! Repository functions — one function per database operation.
//!
//! Every function takes the executor it should run on (the session's open
//! transaction, or the pool for autocommit work) and returns a
//! `Result<T, DbError>`. All caller-supplied values are bound as positional
//! parameters; nothing is formatted into SQL text.

pub mod employees;
pub mod products;
pub mod students;
