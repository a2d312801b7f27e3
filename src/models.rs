//! Typed records for the two append-only audit tables.
//!
//! Both tables are insert-only: rows are never updated or deleted by this
//! application, and any listing is most-recent-first. Retention is an
//! operational concern handled outside the service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Outcome of a single health-check invocation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HealthStatus {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    /// Free-form detail, may be empty.
    pub message: String,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Health Check - {} at {}", self.status, self.timestamp)
    }
}

/// One inbound request as seen by the audit trail.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApiLog {
    pub id: i64,
    pub endpoint: String,
    pub method: String,
    pub timestamp: DateTime<Utc>,
    /// Client address; None when extraction found nothing usable.
    pub ip_address: Option<String>,
}

impl fmt::Display for ApiLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.method, self.endpoint, self.timestamp)
    }
}
