//! Prometheus metrics for the indexing notifier.
//!
//! - Submission metrics (per provider, success/failure, URLs submitted, latency)
//! - Token exchange metrics
//! - Notification metrics (single fire-and-forget vs awaited batch)

mod helpers;

pub use helpers::{encode_metrics, NotificationMetrics, SubmissionMetrics, TokenMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "indexing";

lazy_static! {
    // ============================================================================
    // Submission Metrics
    // ============================================================================

    /// Provider submissions by outcome
    pub static ref SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_submissions_total", METRIC_PREFIX),
        "Total provider submissions",
        &["provider", "outcome"]
    ).unwrap();

    /// URLs accepted by each provider
    pub static ref URLS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_urls_submitted_total", METRIC_PREFIX),
        "Total URLs accepted by a provider",
        &["provider"]
    ).unwrap();

    /// Wall time of a provider submission
    pub static ref SUBMISSION_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_submission_duration_seconds", METRIC_PREFIX),
        "Provider submission duration in seconds",
        &["provider"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    /// Whether a provider is configured (1) or disabled (0)
    pub static ref PROVIDER_ENABLED: IntGaugeVec = register_int_gauge_vec!(
        format!("{}_provider_enabled", METRIC_PREFIX),
        "Provider configuration state (1=enabled, 0=disabled)",
        &["provider"]
    ).unwrap();

    // ============================================================================
    // Token Metrics
    // ============================================================================

    /// OAuth token exchanges by outcome
    pub static ref TOKEN_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_token_requests_total", METRIC_PREFIX),
        "Total OAuth token exchanges",
        &["outcome"]
    ).unwrap();

    // ============================================================================
    // Notification Metrics
    // ============================================================================

    /// Notifications started, by mode
    pub static ref NOTIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_notifications_total", METRIC_PREFIX),
        "Total notifications started",
        &["mode"]
    ).unwrap();
}
