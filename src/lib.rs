//! Catalog core
//!
//! In-memory library catalog: administrators and students register and log
//! in, administrators add books, students borrow and return them. The
//! [`shell`] module provides a text menu on top of [`Services`].

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod shell;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Services;
