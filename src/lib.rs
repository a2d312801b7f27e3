//! myapp library entrypoint.
//!
//! Modules:
//! - `config`: TOML configuration and shared constants
//! - `db`: pool setup, schema creation, and audit queries
//! - `error`: application-level error type
//! - `middleware`: request ID span middleware
//! - `models`: typed records for the audit tables
//! - `routes`: Axum router and the two request handlers
//! - `state`: shared handler state

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
