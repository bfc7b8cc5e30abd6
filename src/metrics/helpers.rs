//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    NOTIFICATIONS_TOTAL, PROVIDER_ENABLED, SUBMISSIONS_TOTAL, SUBMISSION_DURATION,
    TOKEN_REQUESTS_TOTAL, URLS_SUBMITTED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording provider submission metrics
pub struct SubmissionMetrics;

impl SubmissionMetrics {
    /// Record a submission that the provider accepted
    pub fn record_success(provider: &str, urls: usize, elapsed: Duration) {
        SUBMISSIONS_TOTAL
            .with_label_values(&[provider, "success"])
            .inc();
        URLS_SUBMITTED_TOTAL
            .with_label_values(&[provider])
            .inc_by(urls as u64);
        SUBMISSION_DURATION
            .with_label_values(&[provider])
            .observe(elapsed.as_secs_f64());
    }

    /// Record a failed submission
    pub fn record_failure(provider: &str, elapsed: Duration) {
        SUBMISSIONS_TOTAL
            .with_label_values(&[provider, "failure"])
            .inc();
        SUBMISSION_DURATION
            .with_label_values(&[provider])
            .observe(elapsed.as_secs_f64());
    }

    /// Record whether a provider is configured
    pub fn set_enabled(provider: &str, enabled: bool) {
        PROVIDER_ENABLED
            .with_label_values(&[provider])
            .set(if enabled { 1 } else { 0 });
    }
}

/// Helper struct for recording token exchange metrics
pub struct TokenMetrics;

impl TokenMetrics {
    pub fn record_success() {
        TOKEN_REQUESTS_TOTAL.with_label_values(&["success"]).inc();
    }

    pub fn record_failure() {
        TOKEN_REQUESTS_TOTAL.with_label_values(&["failure"]).inc();
    }
}

/// Helper struct for recording notification metrics
pub struct NotificationMetrics;

impl NotificationMetrics {
    /// Record a fire-and-forget notification
    pub fn record_single() {
        NOTIFICATIONS_TOTAL.with_label_values(&["single"]).inc();
    }

    /// Record an awaited batch notification
    pub fn record_batch() {
        NOTIFICATIONS_TOTAL.with_label_values(&["batch"]).inc();
    }
}
