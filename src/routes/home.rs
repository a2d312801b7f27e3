//! Welcome endpoint with per-request audit logging.
//!
//! The endpoint never fails from the client's point of view: when the audit
//! write cannot complete, the error is logged server-side and a degraded
//! welcome body is returned with a 200 status.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Method};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use super::client_ip;
use crate::config::APP_NAME;
use crate::db;
use crate::state::AppState;

const WELCOME_MESSAGE: &str = "Welcome to Django Backend with Azure PostgreSQL!";
const DEGRADED_MESSAGE: &str = "Welcome to Django Backend!";
const DEGRADED_NOTE: &str = "Database logging unavailable";

/// Welcome response body. The `database` label is present on the normal path,
/// the `note` only when audit logging was unavailable.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
    status: &'static str,
    app: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
}

/// Welcome handler.
///
/// Records the request in the audit log, then reports which database backend
/// is configured. An audit failure downgrades the body but keeps the 200.
#[instrument(name = "home", skip(state, headers))]
pub async fn home(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    headers: HeaderMap,
) -> Json<WelcomeResponse> {
    let ip = client_ip(&headers, Some(peer));

    match db::record_api_log(&state.db, "/", method.as_str(), ip.as_deref(), Utc::now()).await {
        Ok(()) => Json(WelcomeResponse {
            message: WELCOME_MESSAGE,
            status: "success",
            app: APP_NAME,
            database: Some(state.config.database.label()),
            note: None,
        }),
        Err(err) => {
            tracing::error!(error = %err, "audit write failed, serving degraded welcome");
            Json(WelcomeResponse {
                message: DEGRADED_MESSAGE,
                status: "success",
                app: APP_NAME,
                database: None,
                note: Some(DEGRADED_NOTE),
            })
        }
    }
}
