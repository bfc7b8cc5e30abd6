use async_trait::async_trait;
use thiserror::Error;

use crate::http::HttpError;

use super::{SubmissionReport, UrlIntent};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider}: request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: HttpError,
    },

    #[error("{provider}: upstream returned {status}: {body}")]
    Rejected {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider}: no access token available")]
    Unauthorized { provider: &'static str },
}

/// A search engine endpoint that can be told about changed URLs.
///
/// Implementations log their own per-URL failures; an `Err` means the
/// submission as a whole did not reach the upstream.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Short name used in logs and metrics
    fn name(&self) -> &'static str;

    async fn submit(
        &self,
        urls: &[String],
        intent: UrlIntent,
    ) -> Result<SubmissionReport, ProviderError>;
}
