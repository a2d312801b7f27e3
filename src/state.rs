//! Shared application state for request handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;

/// Shared application state, cloneable across handlers via Arc-wrapped config
/// and the internally reference-counted database pool.
///
/// The pool is passed in explicitly rather than held in a global so tests can
/// construct the state around an in-memory database.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: SqlitePool,
}

impl AppState {
    /// Creates a new application state from the given configuration and pool.
    pub fn new(config: AppConfig, db: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}
