//! HTTP notification handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use url::Url;

use crate::content::{ContentEvent, SiteUrls};
use crate::error::{AppError, Result};
use crate::indexing::BatchSummary;
use crate::server::AppState;

use super::models::{BatchSubmitRequest, NotifyRequest, NotifyResponse};

/// Upper bound on URLs in one batch request
const MAX_BATCH_URLS: usize = 10_000;

/// Content mutation hook called by the CMS after a post is saved or removed
#[tracing::instrument(
    name = "http.content_event",
    skip(state, event),
    fields(slug = %event.item().slug)
)]
pub async fn content_event(
    State(state): State<AppState>,
    Json(event): Json<ContentEvent>,
) -> Result<(StatusCode, Json<NotifyResponse>)> {
    let Some(action) = event.action(Utc::now()) else {
        tracing::debug!("Content change is not publicly visible, nothing to announce");
        return Ok((StatusCode::OK, Json(NotifyResponse::skipped())));
    };

    let url = state
        .site
        .article_url(&event.item().slug)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Detached: the response does not wait for search engines
    state.notifier.notify(url.clone(), action);

    Ok((StatusCode::ACCEPTED, Json(NotifyResponse::queued(url, action))))
}

/// Announce a single URL without waiting for the outcome
#[tracing::instrument(
    name = "http.notify_url",
    skip(state, request),
    fields(url = %request.url, action = request.action.as_str())
)]
pub async fn notify_url(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<(StatusCode, Json<NotifyResponse>)> {
    let url = validate_site_url(&state.site, &request.url)?;

    state.notifier.notify(url.clone(), request.action);

    Ok((
        StatusCode::ACCEPTED,
        Json(NotifyResponse::queued(url, request.action)),
    ))
}

/// Submit many URLs and wait for every provider to finish
#[tracing::instrument(
    name = "http.batch_submit",
    skip(state, request),
    fields(url_count = request.urls.len())
)]
pub async fn batch_submit(
    State(state): State<AppState>,
    Json(request): Json<BatchSubmitRequest>,
) -> Result<Json<BatchSummary>> {
    if request.urls.is_empty() {
        return Err(AppError::Validation("urls must not be empty".to_string()));
    }

    if request.urls.len() > MAX_BATCH_URLS {
        return Err(AppError::Validation(format!(
            "at most {} urls per batch",
            MAX_BATCH_URLS
        )));
    }

    let urls = request
        .urls
        .iter()
        .map(|url| validate_site_url(&state.site, url))
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(state.notifier.batch_notify(&urls).await))
}

/// Accept only absolute http(s) URLs on the configured site's host
fn validate_site_url(site: &SiteUrls, raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::Validation(format!("invalid url '{}': {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "url '{}' must use http or https",
            raw
        )));
    }

    if url.host_str() != Some(site.host()) {
        return Err(AppError::Validation(format!(
            "url '{}' is not on host {}",
            raw,
            site.host()
        )));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn site() -> SiteUrls {
        SiteUrls::new(&SiteConfig {
            base_url: "https://example.com".to_string(),
            blog_path: "/blog".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_validate_site_url() {
        let site = site();
        assert_eq!(
            validate_site_url(&site, "https://example.com/blog/x").unwrap(),
            "https://example.com/blog/x"
        );
        assert!(validate_site_url(&site, "https://other.com/blog/x").is_err());
        assert!(validate_site_url(&site, "ftp://example.com/x").is_err());
        assert!(validate_site_url(&site, "/blog/x").is_err());
    }
}
