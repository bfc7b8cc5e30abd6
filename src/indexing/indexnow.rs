//! IndexNow: one POST announces a list of URLs to every participating engine.

use std::time::Instant;

use async_trait::async_trait;
use hyper::StatusCode;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::http::HttpClient;
use crate::metrics::SubmissionMetrics;

use super::{NotificationProvider, ProviderError, SubmissionReport, UrlIntent};

pub const PROVIDER_NAME: &str = "indexnow";

/// Upper bound on `urlList` length accepted per request
pub const MAX_URLS_PER_REQUEST: usize = 10_000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexNowRequest<'a> {
    host: &'a str,
    key: &'a str,
    key_location: &'a str,
    url_list: &'a [String],
}

pub struct IndexNowProvider {
    http: HttpClient,
    endpoint: String,
    host: String,
    key: String,
    key_location: String,
}

impl IndexNowProvider {
    pub fn new(
        http: HttpClient,
        endpoint: &str,
        host: &str,
        key: &str,
        key_location: &str,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            host: host.to_string(),
            key: key.to_string(),
            key_location: key_location.to_string(),
        }
    }

    async fn submit_chunk(&self, urls: &[String]) -> Result<(), ProviderError> {
        let body = IndexNowRequest {
            host: &self.host,
            key: &self.key,
            key_location: &self.key_location,
            url_list: urls,
        };

        let response = self
            .http
            .post_json(&self.endpoint, &body, None)
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER_NAME,
                source,
            })?;

        if response.status == StatusCode::OK || response.status == StatusCode::ACCEPTED {
            Ok(())
        } else {
            Err(ProviderError::Rejected {
                provider: PROVIDER_NAME,
                status: response.status.as_u16(),
                body: response.body,
            })
        }
    }
}

#[async_trait]
impl NotificationProvider for IndexNowProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// Removals are announced the same way as updates; engines recrawl and
    /// find the page gone.
    #[instrument(name = "indexnow.submit", skip(self, urls), fields(count = urls.len()))]
    async fn submit(
        &self,
        urls: &[String],
        _intent: UrlIntent,
    ) -> Result<SubmissionReport, ProviderError> {
        if urls.is_empty() {
            return Ok(SubmissionReport::new(PROVIDER_NAME, 0, 0));
        }

        let started = Instant::now();
        let mut accepted = 0;

        for chunk in urls.chunks(MAX_URLS_PER_REQUEST) {
            if let Err(e) = self.submit_chunk(chunk).await {
                SubmissionMetrics::record_failure(PROVIDER_NAME, started.elapsed());
                warn!(
                    provider = PROVIDER_NAME,
                    count = chunk.len(),
                    accepted = accepted,
                    error = %e,
                    "IndexNow submission failed"
                );

                // Earlier chunks already went through; report them as accepted
                if accepted == 0 {
                    return Err(e);
                }
                return Ok(SubmissionReport::new(
                    PROVIDER_NAME,
                    accepted,
                    urls.len() - accepted,
                ));
            }
            accepted += chunk.len();
        }

        SubmissionMetrics::record_success(PROVIDER_NAME, accepted, started.elapsed());
        info!(
            provider = PROVIDER_NAME,
            count = accepted,
            "Submitted URLs to IndexNow"
        );

        Ok(SubmissionReport::new(PROVIDER_NAME, accepted, 0))
    }
}
