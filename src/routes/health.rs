//! Health check endpoint for deployment monitoring.
//!
//! Probes the database with a trivial query, records the outcome in the
//! health history, and audit-logs the request. This is the only endpoint
//! that surfaces failure to clients (HTTP 500), which makes it suitable for
//! external liveness monitoring.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use super::client_ip;
use crate::db;
use crate::models::HealthStatus;
use crate::state::AppState;

const HEALTHY_MESSAGE: &str = "Application is running properly";
const HEALTH_RECORD_MESSAGE: &str = "All systems operational";

/// Health response body. `timestamp` carries the stored time of the created
/// health record and is absent on the unhealthy branch.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: String,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

/// Health check handler.
///
/// The probe and the two writes form a single failure domain: any error takes
/// the unhealthy branch. The writes are independent statements, so a health
/// row may remain behind when the subsequent audit write fails.
#[instrument(name = "health_check", skip(state, headers))]
pub async fn health_check(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    headers: HeaderMap,
) -> (StatusCode, Json<HealthResponse>) {
    let ip = client_ip(&headers, Some(peer));

    match run_checks(&state, method.as_str(), ip.as_deref()).await {
        Ok(record) => {
            tracing::debug!(record = %record, "health check passed");
            (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy",
                    message: HEALTHY_MESSAGE.to_string(),
                    database: "connected",
                    timestamp: Some(record.timestamp.to_rfc3339()),
                }),
            )
        }
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "unhealthy",
                    message: format!("Database connection failed: {err}"),
                    database: "disconnected",
                    timestamp: None,
                }),
            )
        }
    }
}

/// Probe the connection, then persist the health record and the audit row.
async fn run_checks(
    state: &AppState,
    method: &str,
    ip: Option<&str>,
) -> Result<HealthStatus, sqlx::Error> {
    db::ping(&state.db).await?;

    let record =
        db::record_health_status(&state.db, "healthy", HEALTH_RECORD_MESSAGE, Utc::now()).await?;
    db::record_api_log(&state.db, "/health/", method, ip, Utc::now()).await?;

    Ok(record)
}
