//! Request ID middleware for correlating logs with requests.
//!
//! Wraps every request in a tracing span carrying a fresh UUID v4, the method,
//! and the path, then logs the status code and duration on completion. All
//! handler logs land inside this span, so server-side errors from the audit
//! writers can be traced back to the request that caused them.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Middleware that generates a request ID and creates a request span.
///
/// Installed as the outermost layer so the span covers the full request
/// lifecycle, handlers included.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}
