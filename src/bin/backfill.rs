//! Resubmit every live article to the configured search engines.
//!
//! Usage: `backfill <items.json | ->`
//!
//! The input is a JSON array of content items as exported from the CMS
//! (`slug`, `status`, `published_at`). Only live items are submitted.

use std::io::Read;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use search_index_notifier::config::Settings;
use search_index_notifier::content::{ContentItem, SiteUrls};
use search_index_notifier::http::HttpClient;
use search_index_notifier::indexing::create_notifier;
use search_index_notifier::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    init_tracing(&settings.logging)?;

    let Some(source) = std::env::args().nth(1) else {
        bail!("usage: backfill <items.json | ->");
    };

    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read content items from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&source)
            .with_context(|| format!("Failed to read content items from {}", source))?
    };

    let items: Vec<ContentItem> =
        serde_json::from_str(&raw).context("Content items must be a JSON array")?;

    let site = SiteUrls::new(&settings.site)?;
    let urls = site.live_urls(&items, Utc::now());
    tracing::info!(
        items = items.len(),
        live = urls.len(),
        "Loaded content items"
    );

    if urls.is_empty() {
        tracing::warn!("No live content to submit");
        return Ok(());
    }

    let http = HttpClient::new(&settings.http);
    let notifier = create_notifier(&settings, &site, &http);
    let summary = notifier.batch_notify(&urls).await;

    for provider in &summary.providers {
        match &provider.error {
            Some(error) => tracing::error!(
                provider = provider.provider,
                error = %error,
                "Provider rejected the batch"
            ),
            None => tracing::info!(
                provider = provider.provider,
                accepted = provider.accepted,
                failed = provider.failed,
                "Provider finished"
            ),
        }
    }
    for name in &summary.disabled {
        tracing::warn!(provider = *name, "Provider skipped (not configured)");
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
