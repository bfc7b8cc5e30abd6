//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::indexing::NotifierStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub providers: Vec<ProviderHealthResponse>,
}

#[derive(Debug, Serialize)]
pub struct ProviderHealthResponse {
    pub name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub site_host: String,
    pub notifications: NotifierStatsSnapshot,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut providers: Vec<ProviderHealthResponse> = state
        .notifier
        .provider_names()
        .into_iter()
        .map(|name| ProviderHealthResponse {
            name: name.to_string(),
            enabled: true,
            reason: None,
        })
        .collect();

    providers.extend(
        state
            .notifier
            .disabled_providers()
            .iter()
            .map(|d| ProviderHealthResponse {
                name: d.name.to_string(),
                enabled: false,
                reason: Some(d.reason.clone()),
            }),
    );

    // Notifications are best-effort, so the service is healthy even with
    // nothing configured; it just has nothing to do.
    let status = if providers.iter().any(|p| p.enabled) {
        "healthy"
    } else {
        "idle"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        providers,
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        site_host: state.site.host().to_string(),
        notifications: state.notifier.stats(),
    })
}
