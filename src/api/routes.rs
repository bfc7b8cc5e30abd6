use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;
use crate::triggers::{batch_submit, content_event, notify_url};

use super::health::{health, stats};
use super::key::indexnow_key_file;
use super::metrics::prometheus_metrics;

/// Unauthenticated routes: health, metrics and the IndexNow key file
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // IndexNow key verification
        .route("/{key_file}", get(indexnow_key_file))
}

/// Notification endpoints, mounted under `/api/v1`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // CMS content mutation hook
        .route("/content/events", post(content_event))
        // Direct submission
        .route("/index/notify", post(notify_url))
        .route("/index/batch", post(batch_submit))
}
