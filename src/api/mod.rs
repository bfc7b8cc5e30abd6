//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod key;
mod metrics;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use health::{health, stats, HealthResponse, StatsResponse};
pub use key::indexnow_key_file;
pub use metrics::prometheus_metrics;
pub use routes::{api_routes, public_routes};
