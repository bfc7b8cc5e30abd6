//! Search engine indexing notifications.
//!
//! # Provider Architecture
//!
//! Each search engine protocol is a [`NotificationProvider`]:
//!
//! - `IndexNowProvider`: one POST carrying a URL list and a shared key
//! - `GoogleIndexingProvider`: one bearer-authenticated POST per URL
//!
//! [`IndexingNotifier`] holds whichever providers are configured (zero, one or
//! both) and fans out to them. Use `create_notifier()` to build it from settings.

pub mod google;
pub mod indexnow;
mod notifier;
mod provider;
mod types;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AssertionSigner, ServiceAccountKey};
use crate::config::Settings;
use crate::content::SiteUrls;
use crate::http::HttpClient;
use crate::metrics::SubmissionMetrics;

pub use google::GoogleIndexingProvider;
pub use indexnow::IndexNowProvider;
pub use notifier::{DisabledProvider, IndexingNotifier, NotifierStatsSnapshot};
pub use provider::{NotificationProvider, ProviderError};
pub use types::{BatchSummary, IndexAction, ProviderSummary, SubmissionReport, UrlIntent};

/// Create the notifier with every provider the settings enable.
///
/// Missing or unusable credentials disable a provider; they never fail start-up.
pub fn create_notifier(settings: &Settings, site: &SiteUrls, http: &HttpClient) -> IndexingNotifier {
    let mut providers: Vec<Arc<dyn NotificationProvider>> = Vec::new();
    let mut disabled = Vec::new();

    match settings.indexnow.key() {
        Some(key) => {
            let key_location = settings
                .indexnow
                .key_location
                .clone()
                .unwrap_or_else(|| site.absolute(&format!("{}.txt", key)));

            tracing::info!(
                provider = indexnow::PROVIDER_NAME,
                endpoint = %settings.indexnow.endpoint,
                key_location = %key_location,
                "IndexNow provider enabled"
            );
            providers.push(Arc::new(IndexNowProvider::new(
                http.clone(),
                &settings.indexnow.endpoint,
                site.host(),
                key,
                &key_location,
            )));
        }
        None => disabled.push(DisabledProvider {
            name: indexnow::PROVIDER_NAME,
            reason: "INDEXNOW_KEY not configured".to_string(),
            optional: false,
        }),
    }

    match settings.google.credentials().map(ServiceAccountKey::from_json) {
        Some(Ok(key)) => {
            tracing::info!(
                provider = google::PROVIDER_NAME,
                client_email = %key.client_email,
                "Google Indexing API provider enabled"
            );
            let signer = AssertionSigner::new(
                key,
                &settings.google.scope,
                &settings.google.token_url,
            );
            providers.push(Arc::new(GoogleIndexingProvider::new(
                http.clone(),
                signer,
                &settings.google.token_url,
                &settings.google.publish_url,
                Duration::from_millis(settings.google.request_delay_ms),
            )));
        }
        Some(Err(e)) => {
            tracing::error!(
                provider = google::PROVIDER_NAME,
                error = %e,
                "Google credentials unusable, provider disabled"
            );
            disabled.push(DisabledProvider {
                name: google::PROVIDER_NAME,
                reason: e.to_string(),
                optional: true,
            });
        }
        None => disabled.push(DisabledProvider {
            name: google::PROVIDER_NAME,
            reason: "service account credentials not configured".to_string(),
            optional: true,
        }),
    }

    SubmissionMetrics::set_enabled(
        indexnow::PROVIDER_NAME,
        !disabled.iter().any(|d| d.name == indexnow::PROVIDER_NAME),
    );
    SubmissionMetrics::set_enabled(
        google::PROVIDER_NAME,
        !disabled.iter().any(|d| d.name == google::PROVIDER_NAME),
    );

    IndexingNotifier::new(providers, disabled)
}
