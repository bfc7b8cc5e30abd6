use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indexing::IndexAction;

/// Request to announce a single URL
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    /// Absolute URL on the configured site
    pub url: String,
    pub action: IndexAction,
}

/// Request to announce many URLs and wait for the outcome
#[derive(Debug, Deserialize)]
pub struct BatchSubmitRequest {
    pub urls: Vec<String>,
}

/// Response for fire-and-forget notifications
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    /// Whether a notification was started
    pub queued: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<IndexAction>,
    pub timestamp: DateTime<Utc>,
}

impl NotifyResponse {
    pub fn queued(url: String, action: IndexAction) -> Self {
        Self {
            queued: true,
            url: Some(url),
            action: Some(action),
            timestamp: Utc::now(),
        }
    }

    pub fn skipped() -> Self {
        Self {
            queued: false,
            url: None,
            action: None,
            timestamp: Utc::now(),
        }
    }
}
