// Shared infrastructure
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod telemetry;

// Domain layer (business logic)
pub mod auth;
pub mod content;
pub mod indexing;

// Application layer
pub mod api;
pub mod server;
pub mod triggers;
