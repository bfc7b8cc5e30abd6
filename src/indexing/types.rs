use serde::{Deserialize, Serialize};

/// What happened to the content behind a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexAction {
    /// Published or changed
    Update,
    /// Removed or unpublished
    Delete,
}

impl IndexAction {
    pub fn intent(self) -> UrlIntent {
        match self {
            IndexAction::Update => UrlIntent::UrlUpdated,
            IndexAction::Delete => UrlIntent::UrlDeleted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IndexAction::Update => "update",
            IndexAction::Delete => "delete",
        }
    }
}

/// Notification type understood by the per-URL indexing API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlIntent {
    UrlUpdated,
    UrlDeleted,
}

impl UrlIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlIntent::UrlUpdated => "URL_UPDATED",
            UrlIntent::UrlDeleted => "URL_DELETED",
        }
    }
}

impl std::fmt::Display for UrlIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one provider submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub provider: &'static str,
    /// URLs the provider accepted
    pub accepted: usize,
    /// URLs the provider rejected or that could not be sent
    pub failed: usize,
}

impl SubmissionReport {
    pub fn new(provider: &'static str, accepted: usize, failed: usize) -> Self {
        Self {
            provider,
            accepted,
            failed,
        }
    }
}

/// Per-provider line of a batch summary
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSummary {
    pub provider: &'static str,
    pub accepted: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a batch submission, for logs and the maintenance tooling
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_urls: usize,
    pub providers: Vec<ProviderSummary>,
    /// Providers skipped because they are not configured
    pub disabled: Vec<&'static str>,
}

impl BatchSummary {
    pub fn all_accepted(&self) -> bool {
        self.providers
            .iter()
            .all(|p| p.error.is_none() && p.failed == 0)
    }
}
