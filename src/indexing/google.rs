//! Google Indexing API: one authenticated request per URL.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use hyper::StatusCode;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::auth::{AssertionSigner, TokenExchange};
use crate::http::HttpClient;
use crate::metrics::SubmissionMetrics;

use super::{NotificationProvider, ProviderError, SubmissionReport, UrlIntent};

pub const PROVIDER_NAME: &str = "google";

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    intent: UrlIntent,
}

pub struct GoogleIndexingProvider {
    http: HttpClient,
    publish_url: String,
    signer: AssertionSigner,
    tokens: TokenExchange,
    /// Courtesy pause between publish requests; there is no daily quota tracking
    request_delay: Duration,
}

impl GoogleIndexingProvider {
    pub fn new(
        http: HttpClient,
        signer: AssertionSigner,
        token_url: &str,
        publish_url: &str,
        request_delay: Duration,
    ) -> Self {
        Self {
            tokens: TokenExchange::new(http.clone(), token_url),
            http,
            publish_url: publish_url.to_string(),
            signer,
            request_delay,
        }
    }

    async fn publish(&self, url: &str, intent: UrlIntent, token: &str) -> Result<(), ProviderError> {
        let body = PublishRequest { url, intent };

        let response = self
            .http
            .post_json(&self.publish_url, &body, Some(token))
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER_NAME,
                source,
            })?;

        if response.is_success() {
            return Ok(());
        }

        if response.status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }

        Err(ProviderError::Rejected {
            provider: PROVIDER_NAME,
            status: response.status.as_u16(),
            body: response.body,
        })
    }
}

#[async_trait]
impl NotificationProvider for GoogleIndexingProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// URLs are published one at a time, in order. A failed URL is logged and
    /// the rest of the list still goes out.
    #[instrument(
        name = "google.submit",
        skip(self, urls),
        fields(count = urls.len(), intent = %intent)
    )]
    async fn submit(
        &self,
        urls: &[String],
        intent: UrlIntent,
    ) -> Result<SubmissionReport, ProviderError> {
        if urls.is_empty() {
            return Ok(SubmissionReport::new(PROVIDER_NAME, 0, 0));
        }

        let Some(token) = self.tokens.access_token(&self.signer).await else {
            // Already logged by the token exchange
            return Err(ProviderError::Unauthorized {
                provider: PROVIDER_NAME,
            });
        };

        let mut accepted = 0;
        let mut failed = 0;

        for (index, url) in urls.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let started = Instant::now();
            match self.publish(url, intent, &token).await {
                Ok(()) => {
                    accepted += 1;
                    SubmissionMetrics::record_success(PROVIDER_NAME, 1, started.elapsed());
                    debug!(provider = PROVIDER_NAME, url = %url, "Published URL notification");
                }
                Err(e) => {
                    failed += 1;
                    SubmissionMetrics::record_failure(PROVIDER_NAME, started.elapsed());
                    warn!(
                        provider = PROVIDER_NAME,
                        url = %url,
                        error = %e,
                        "URL notification failed"
                    );
                }
            }
        }

        info!(
            provider = PROVIDER_NAME,
            accepted = accepted,
            failed = failed,
            intent = %intent,
            "Finished Google Indexing API submission"
        );

        Ok(SubmissionReport::new(PROVIDER_NAME, accepted, failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_body_shape() {
        let body = PublishRequest {
            url: "https://example.com/blog/x",
            intent: UrlIntent::UrlDeleted,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"url": "https://example.com/blog/x", "type": "URL_DELETED"})
        );
    }
}
