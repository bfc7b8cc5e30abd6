//! Published content and how its changes map to indexing notifications.
//!
//! Only items that are `published` with a publish time that is not in the future
//! are visible on the site, so only those are ever announced to search engines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::SiteConfig;
use crate::indexing::IndexAction;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid site base URL '{0}': {1}")]
    InvalidBaseUrl(String, String),

    #[error("Invalid slug '{0}'")]
    InvalidSlug(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

/// A blog post as seen by the notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub slug: String,
    pub status: ContentStatus,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Whether the item is publicly visible at `now`.
    ///
    /// A published item without `published_at` counts as live: the CMS only
    /// omits the timestamp for items published immediately.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == ContentStatus::Published
            && self.published_at.map_or(true, |at| at <= now)
    }
}

/// A content mutation reported by the CMS
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ContentEvent {
    Created {
        item: ContentItem,
    },
    Updated {
        item: ContentItem,
        #[serde(default)]
        previous: Option<ContentItem>,
    },
    Deleted {
        item: ContentItem,
    },
}

impl ContentEvent {
    /// The item whose URL the notification concerns
    pub fn item(&self) -> &ContentItem {
        match self {
            ContentEvent::Created { item }
            | ContentEvent::Updated { item, .. }
            | ContentEvent::Deleted { item } => item,
        }
    }

    /// Decide what, if anything, search engines should be told.
    ///
    /// An update that takes a live item offline is announced as a removal.
    pub fn action(&self, now: DateTime<Utc>) -> Option<IndexAction> {
        match self {
            ContentEvent::Created { item } => item.is_live(now).then_some(IndexAction::Update),
            ContentEvent::Updated { item, previous } => {
                if item.is_live(now) {
                    Some(IndexAction::Update)
                } else if previous.as_ref().is_some_and(|p| p.is_live(now)) {
                    Some(IndexAction::Delete)
                } else {
                    None
                }
            }
            ContentEvent::Deleted { item } => item.is_live(now).then_some(IndexAction::Delete),
        }
    }
}

/// Builds absolute public URLs for content
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base_url: Url,
    blog_path: String,
}

impl SiteUrls {
    pub fn new(config: &SiteConfig) -> Result<Self, ContentError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ContentError::InvalidBaseUrl(config.base_url.clone(), e.to_string()))?;

        if base_url.host_str().is_none() {
            return Err(ContentError::InvalidBaseUrl(
                config.base_url.clone(),
                "missing host".to_string(),
            ));
        }

        let blog_path = config.blog_path.trim_matches('/').to_string();

        Ok(Self {
            base_url,
            blog_path,
        })
    }

    /// Host name used in IndexNow submissions
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of a site-relative path, appended to the base URL's own path
    pub fn absolute(&self, path: &str) -> String {
        let mut url = self.base_url.clone();
        let base_path = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{}/{}", base_path, path.trim_start_matches('/')));
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }

    /// Public URL of an article
    pub fn article_url(&self, slug: &str) -> Result<String, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::InvalidSlug(slug.to_string()));
        }

        if self.blog_path.is_empty() {
            Ok(self.absolute(slug))
        } else {
            Ok(self.absolute(&format!("{}/{}", self.blog_path, slug)))
        }
    }

    /// URLs of every item in `items` that is live at `now`
    pub fn live_urls(&self, items: &[ContentItem], now: DateTime<Utc>) -> Vec<String> {
        items
            .iter()
            .filter(|item| item.is_live(now))
            .filter_map(|item| match self.article_url(&item.slug) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(slug = %item.slug, error = %e, "Skipping item with unusable slug");
                    None
                }
            })
            .collect()
    }
}

/// Slugs are single path segments of lowercase letters, digits, `-` and `_`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
