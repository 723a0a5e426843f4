//! `session` crate — the interactive side of the exercises.
//!
//! - [`products`]: the transactional product menu (manual commit/rollback).
//! - [`students`]: the autocommit student menu.
//! - [`employees`]: the one-shot employee report.
//!
//! All of them read through [`Console`] and render through [`view`].

pub mod console;
pub mod employees;
pub mod error;
pub mod products;
pub mod students;
pub mod view;

pub use console::Console;
pub use error::{InputError, SessionError};
pub use products::{ProductSession, SessionExit};
pub use students::StudentMenu;
