//! Prometheus scrape endpoint.

use axum::{http::header, response::IntoResponse};

use crate::error::{AppError, Result};
use crate::metrics::encode_metrics;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics
pub async fn prometheus_metrics() -> Result<impl IntoResponse> {
    let output = encode_metrics()
        .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], output))
}
