use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::content::{ContentError, SiteUrls};
use crate::http::HttpClient;
use crate::indexing::{create_notifier, IndexingNotifier};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub site: Arc<SiteUrls>,
    pub notifier: Arc<IndexingNotifier>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, ContentError> {
        let site = SiteUrls::new(&settings.site)?;
        let http = HttpClient::new(&settings.http);
        let notifier = create_notifier(&settings, &site, &http);

        Ok(Self::with_notifier(settings, site, notifier))
    }

    /// Build state around an already assembled notifier
    pub fn with_notifier(settings: Settings, site: SiteUrls, notifier: IndexingNotifier) -> Self {
        Self {
            settings: Arc::new(settings),
            site: Arc::new(site),
            notifier: Arc::new(notifier),
            start_time: Instant::now(),
        }
    }
}
