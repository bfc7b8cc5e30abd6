use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::metrics::NotificationMetrics;

use super::{
    BatchSummary, IndexAction, NotificationProvider, ProviderSummary, SubmissionReport, UrlIntent,
};

/// A provider left out because it is not configured
#[derive(Debug, Clone)]
pub struct DisabledProvider {
    pub name: &'static str,
    pub reason: String,
    /// Optional providers are reported at debug level instead of warn
    pub optional: bool,
}

/// Statistics for the notifier
#[derive(Debug, Default)]
pub struct NotifierStats {
    /// `notify` calls
    pub notifications: AtomicU64,
    /// `batch_notify` calls
    pub batches: AtomicU64,
    /// Provider submissions that reached the upstream
    pub submissions_succeeded: AtomicU64,
    /// Provider submissions that failed as a whole
    pub submissions_failed: AtomicU64,
    /// Individual URLs rejected inside otherwise successful submissions
    pub urls_failed: AtomicU64,
}

impl NotifierStats {
    pub fn snapshot(&self) -> NotifierStatsSnapshot {
        NotifierStatsSnapshot {
            notifications: self.notifications.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            submissions_succeeded: self.submissions_succeeded.load(Ordering::Relaxed),
            submissions_failed: self.submissions_failed.load(Ordering::Relaxed),
            urls_failed: self.urls_failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of notifier statistics
#[derive(Debug, Clone, Serialize)]
pub struct NotifierStatsSnapshot {
    pub notifications: u64,
    pub batches: u64,
    pub submissions_succeeded: u64,
    pub submissions_failed: u64,
    pub urls_failed: u64,
}

/// Tells every configured search engine about changed URLs.
///
/// Nothing here ever returns an error to the caller: failures end up in logs,
/// metrics and [`NotifierStats`].
pub struct IndexingNotifier {
    providers: Vec<Arc<dyn NotificationProvider>>,
    disabled: Vec<DisabledProvider>,
    stats: NotifierStats,
}

impl IndexingNotifier {
    pub fn new(
        providers: Vec<Arc<dyn NotificationProvider>>,
        disabled: Vec<DisabledProvider>,
    ) -> Self {
        Self {
            providers,
            disabled,
            stats: NotifierStats::default(),
        }
    }

    /// A notifier with no providers at all
    pub fn disabled() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn disabled_providers(&self) -> &[DisabledProvider] {
        &self.disabled
    }

    pub fn stats(&self) -> NotifierStatsSnapshot {
        self.stats.snapshot()
    }

    /// Announce one URL in the background.
    ///
    /// Returns as soon as the work is spawned. The handle only exists for
    /// tests and shutdown; dropping it detaches the task and its result is
    /// discarded apart from logging.
    pub fn notify(self: &Arc<Self>, url: impl Into<String>, action: IndexAction) -> JoinHandle<()> {
        let url = url.into();
        let notification_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "notifier.notify",
            notification_id = %notification_id,
            url = %url,
            action = action.as_str()
        );

        self.stats.notifications.fetch_add(1, Ordering::Relaxed);
        NotificationMetrics::record_single();

        let notifier = Arc::clone(self);
        tokio::spawn(
            async move {
                notifier.notify_now(url, action).await;
            }
            .instrument(span),
        )
    }

    /// Run a single notification to completion, providers concurrently.
    pub async fn notify_now(&self, url: String, action: IndexAction) {
        self.log_disabled();

        if self.providers.is_empty() {
            return;
        }

        let urls = [url];
        let intent = action.intent();

        let submissions = self
            .providers
            .iter()
            .map(|provider| self.submit_to(provider.as_ref(), &urls, intent));
        let results = join_all(submissions).await;

        let failures = results.iter().filter(|r| r.error.is_some()).count();
        if failures > 0 {
            warn!(
                failed_providers = failures,
                total_providers = results.len(),
                "Indexing notification partially failed"
            );
        } else {
            debug!(providers = results.len(), "Indexing notification delivered");
        }
    }

    /// Submit many URLs and wait for the outcome.
    ///
    /// Providers run one after another: IndexNow receives the whole list in a
    /// single request, the per-URL provider walks it with its throttle delay.
    pub async fn batch_notify(&self, urls: &[String]) -> BatchSummary {
        self.stats.batches.fetch_add(1, Ordering::Relaxed);
        NotificationMetrics::record_batch();
        self.log_disabled();

        let mut providers = Vec::with_capacity(self.providers.len());

        if !urls.is_empty() {
            for provider in &self.providers {
                let summary = self
                    .submit_to(provider.as_ref(), urls, UrlIntent::UrlUpdated)
                    .await;
                providers.push(summary);
            }
        }

        let summary = BatchSummary {
            total_urls: urls.len(),
            providers,
            disabled: self.disabled.iter().map(|d| d.name).collect(),
        };

        info!(
            total_urls = summary.total_urls,
            providers = summary.providers.len(),
            all_accepted = summary.all_accepted(),
            "Batch indexing submission finished"
        );

        summary
    }

    async fn submit_to(
        &self,
        provider: &dyn NotificationProvider,
        urls: &[String],
        intent: UrlIntent,
    ) -> ProviderSummary {
        match provider.submit(urls, intent).await {
            Ok(SubmissionReport {
                provider: name,
                accepted,
                failed,
            }) => {
                self.stats
                    .submissions_succeeded
                    .fetch_add(1, Ordering::Relaxed);
                self.stats
                    .urls_failed
                    .fetch_add(failed as u64, Ordering::Relaxed);
                ProviderSummary {
                    provider: name,
                    accepted,
                    failed,
                    error: None,
                }
            }
            Err(e) => {
                self.stats.submissions_failed.fetch_add(1, Ordering::Relaxed);
                warn!(provider = provider.name(), error = %e, "Provider submission failed");
                ProviderSummary {
                    provider: provider.name(),
                    accepted: 0,
                    failed: urls.len(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn log_disabled(&self) {
        for disabled in &self.disabled {
            if disabled.optional {
                debug!(provider = disabled.name, reason = %disabled.reason, "Provider disabled");
            } else {
                warn!(provider = disabled.name, reason = %disabled.reason, "Provider disabled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every submission it receives
    struct RecordingProvider {
        name: &'static str,
        calls: Mutex<Vec<(Vec<String>, UrlIntent)>>,
        fail: bool,
    }

    impl RecordingProvider {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn calls(&self) -> Vec<(Vec<String>, UrlIntent)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn submit(
            &self,
            urls: &[String],
            intent: UrlIntent,
        ) -> Result<SubmissionReport, ProviderError> {
            self.calls.lock().unwrap().push((urls.to_vec(), intent));
            if self.fail {
                Err(ProviderError::Rejected {
                    provider: self.name,
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(SubmissionReport::new(self.name, urls.len(), 0))
            }
        }
    }

    /// Never finishes
    struct StalledProvider;

    #[async_trait]
    impl NotificationProvider for StalledProvider {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn submit(
            &self,
            _urls: &[String],
            _intent: UrlIntent,
        ) -> Result<SubmissionReport, ProviderError> {
            futures::future::pending().await
        }
    }

    fn providers(list: &[Arc<RecordingProvider>]) -> Vec<Arc<dyn NotificationProvider>> {
        list.iter()
            .map(|p| p.clone() as Arc<dyn NotificationProvider>)
            .collect()
    }

    #[tokio::test]
    async fn test_notify_maps_action_to_intent() {
        let provider = RecordingProvider::new("recording", false);
        let notifier = Arc::new(IndexingNotifier::new(providers(&[provider.clone()]), vec![]));

        notifier
            .notify("https://example.com/blog/a", IndexAction::Delete)
            .await
            .unwrap();
        notifier
            .notify("https://example.com/blog/b", IndexAction::Update)
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, vec!["https://example.com/blog/a".to_string()]);
        assert_eq!(calls[0].1, UrlIntent::UrlDeleted);
        assert_eq!(calls[1].1, UrlIntent::UrlUpdated);
    }

    #[tokio::test]
    async fn test_failing_provider_does_not_stop_others() {
        let failing = RecordingProvider::new("failing", true);
        let healthy = RecordingProvider::new("healthy", false);
        let notifier = Arc::new(IndexingNotifier::new(
            providers(&[failing.clone(), healthy.clone()]),
            vec![],
        ));

        notifier
            .notify("https://example.com/blog/a", IndexAction::Update)
            .await
            .unwrap();

        assert_eq!(failing.calls().len(), 1);
        assert_eq!(healthy.calls().len(), 1);

        let stats = notifier.stats();
        assert_eq!(stats.notifications, 1);
        assert_eq!(stats.submissions_failed, 1);
        assert_eq!(stats.submissions_succeeded, 1);
    }

    #[tokio::test]
    async fn test_notify_returns_before_providers_finish() {
        let notifier = Arc::new(IndexingNotifier::new(vec![Arc::new(StalledProvider) as Arc<dyn NotificationProvider>], vec![]));

        let started = std::time::Instant::now();
        let handle = notifier.notify("https://example.com/blog/a", IndexAction::Update);
        assert!(started.elapsed() < Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_no_providers_is_a_no_op() {
        let notifier = Arc::new(IndexingNotifier::disabled());
        notifier
            .notify("https://example.com/blog/a", IndexAction::Update)
            .await
            .unwrap();

        let summary = notifier.batch_notify(&["https://example.com/".to_string()]).await;
        assert!(summary.providers.is_empty());
        assert!(summary.all_accepted());
    }

    #[tokio::test]
    async fn test_batch_sends_whole_list_to_each_provider() {
        let first = RecordingProvider::new("first", false);
        let second = RecordingProvider::new("second", true);
        let notifier = IndexingNotifier::new(
            providers(&[first.clone(), second.clone()]),
            vec![DisabledProvider {
                name: "other",
                reason: "not configured".to_string(),
                optional: true,
            }],
        );

        let urls: Vec<String> = (1..=3)
            .map(|i| format!("https://example.com/blog/{}", i))
            .collect();
        let summary = notifier.batch_notify(&urls).await;

        assert_eq!(summary.total_urls, 3);
        assert_eq!(summary.disabled, vec!["other"]);
        assert_eq!(first.calls()[0].0, urls);
        assert_eq!(first.calls()[0].1, UrlIntent::UrlUpdated);
        assert_eq!(summary.providers[0].accepted, 3);
        assert_eq!(summary.providers[1].failed, 3);
        assert!(summary.providers[1].error.is_some());
        assert!(!summary.all_accepted());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_providers() {
        let provider = RecordingProvider::new("recording", false);
        let notifier = IndexingNotifier::new(providers(&[provider.clone()]), vec![]);

        let summary = notifier.batch_notify(&[]).await;
        assert_eq!(summary.total_urls, 0);
        assert!(provider.calls().is_empty());
    }
}
