//! Application-level error type.
//!
//! Handlers are the sole error boundary for client-facing behavior: they
//! inspect database results directly and shape their own JSON responses, so
//! `AppError` only covers startup and plumbing failures surfaced by `main`.

use std::io;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
