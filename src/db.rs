//! Database helpers: pool setup, schema creation, and append-only audit queries.
//!
//! All writers take the row timestamp as an argument instead of reading the
//! clock themselves, so callers (and tests) control time explicitly. Errors
//! are returned to the caller unchanged; nothing here retries or suppresses.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::models::{ApiLog, HealthStatus};

/// Connect the pool and create the schema if it does not exist yet.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    ensure_database_path(&config.url);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Create the file and parent directory behind a `sqlite:` URL if missing.
///
/// In-memory databases and non-sqlite URLs are left alone.
fn ensure_database_path(db_url: &str) {
    let Some(path_part) = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
    else {
        return;
    };
    let path_only = path_part.split('?').next().unwrap_or(path_part);
    if path_only.is_empty() || path_only == ":memory:" {
        return;
    }

    let path = Path::new(path_only);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path);
}

/// Create the two audit tables if absent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS health_status (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            status TEXT NOT NULL,
            message TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS api_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            endpoint TEXT NOT NULL,
            method TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            ip_address TEXT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Liveness probe: a trivial round-trip confirming the database is reachable.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Append one request to the audit log.
pub async fn record_api_log(
    pool: &SqlitePool,
    endpoint: &str,
    method: &str,
    ip_address: Option<&str>,
    timestamp: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO api_logs (endpoint, method, timestamp, ip_address) VALUES (?, ?, ?, ?)")
        .bind(endpoint)
        .bind(method)
        .bind(timestamp)
        .bind(ip_address)
        .execute(pool)
        .await?;
    Ok(())
}

/// Append one health-check outcome and return the stored record.
pub async fn record_health_status(
    pool: &SqlitePool,
    status: &str,
    message: &str,
    timestamp: DateTime<Utc>,
) -> Result<HealthStatus, sqlx::Error> {
    let result =
        sqlx::query("INSERT INTO health_status (timestamp, status, message) VALUES (?, ?, ?)")
            .bind(timestamp)
            .bind(status)
            .bind(message)
            .execute(pool)
            .await?;
    Ok(HealthStatus {
        id: result.last_insert_rowid(),
        timestamp,
        status: status.to_string(),
        message: message.to_string(),
    })
}

/// Most-recent-first health-check history.
pub async fn recent_health_statuses(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<HealthStatus>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, timestamp, status, message FROM health_status \
         ORDER BY timestamp DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Most-recent-first request audit trail.
pub async fn recent_api_logs(pool: &SqlitePool, limit: i64) -> Result<Vec<ApiLog>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, endpoint, method, timestamp, ip_address FROM api_logs \
         ORDER BY timestamp DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
