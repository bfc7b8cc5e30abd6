//! HTTP surface tests
//!
//! Drive the full router with `tower::ServiceExt::oneshot`, backed by a
//! notifier whose only provider records what it is asked to submit.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio_test::assert_ok;
use tower::ServiceExt;

use search_index_notifier::config::Settings;
use search_index_notifier::content::SiteUrls;
use search_index_notifier::indexing::{
    DisabledProvider, IndexingNotifier, NotificationProvider, ProviderError, SubmissionReport,
    UrlIntent,
};
use search_index_notifier::server::{create_app, AppState, API_KEY_HEADER};

const API_KEY: &str = "secret-api-key";

// =============================================================================
// Test harness
// =============================================================================

#[derive(Default)]
struct RecordingProvider {
    calls: Mutex<Vec<(Vec<String>, UrlIntent)>>,
}

impl RecordingProvider {
    fn calls(&self) -> Vec<(Vec<String>, UrlIntent)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn submit(
        &self,
        urls: &[String],
        intent: UrlIntent,
    ) -> Result<SubmissionReport, ProviderError> {
        self.calls.lock().unwrap().push((urls.to_vec(), intent));
        Ok(SubmissionReport::new("recording", urls.len(), 0))
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    provider: Arc<RecordingProvider>,
}

fn test_app(configure: impl FnOnce(&mut Settings)) -> TestApp {
    let mut settings = Settings::for_site("https://example.com");
    configure(&mut settings);

    let provider = Arc::new(RecordingProvider::default());
    let notifier = IndexingNotifier::new(
        vec![provider.clone() as Arc<dyn NotificationProvider>],
        vec![DisabledProvider {
            name: "google",
            reason: "service account credentials not configured".to_string(),
            optional: true,
        }],
    );
    let site = SiteUrls::new(&settings.site).unwrap();
    let state = AppState::with_notifier(settings, site, notifier);

    TestApp {
        router: create_app(state.clone()),
        state,
        provider,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn wait_for_calls(provider: &RecordingProvider, expected: usize) {
    for _ in 0..50 {
        if provider.calls().len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// =============================================================================
// Public routes
// =============================================================================

#[tokio::test]
async fn test_health_lists_providers() {
    let app = test_app(|_| {});

    let response = app.router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"][0]["name"], "recording");
    assert_eq!(body["providers"][0]["enabled"], true);
    assert_eq!(body["providers"][1]["name"], "google");
    assert_eq!(body["providers"][1]["enabled"], false);
}

#[tokio::test]
async fn test_key_file_served_for_configured_key() {
    let app = test_app(|s| s.indexnow.key = Some("abc123".to_string()));

    let response = app.router.clone().oneshot(get("/abc123.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "abc123");

    let response = app.router.oneshot(get("/other.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_key_file_absent_without_key() {
    let app = test_app(|_| {});

    let response = app.router.oneshot(get("/abc123.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_exposed() {
    let app = test_app(|_| {});

    let response = app.router.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Content events
// =============================================================================

#[tokio::test]
async fn test_published_item_is_announced() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/content/events",
            json!({
                "event": "created",
                "item": {"slug": "hello-world", "status": "published"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["queued"], true);
    assert_eq!(body["url"], "https://example.com/blog/hello-world");
    assert_eq!(body["action"], "update");

    wait_for_calls(&app.provider, 1).await;
    let calls = app.provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, vec!["https://example.com/blog/hello-world".to_string()]);
    assert_eq!(calls[0].1, UrlIntent::UrlUpdated);
}

#[tokio::test]
async fn test_draft_item_is_not_announced() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/content/events",
            json!({
                "event": "created",
                "item": {"slug": "work-in-progress", "status": "draft"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["queued"], false);
    assert_eq!(app.state.notifier.stats().notifications, 0);
}

#[tokio::test]
async fn test_unpublishing_update_announces_removal() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/content/events",
            json!({
                "event": "updated",
                "item": {"slug": "retired", "status": "archived"},
                "previous": {"slug": "retired", "status": "published"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["action"], "delete");

    wait_for_calls(&app.provider, 1).await;
    assert_eq!(app.provider.calls()[0].1, UrlIntent::UrlDeleted);
}

#[tokio::test]
async fn test_invalid_slug_is_rejected() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/content/events",
            json!({
                "event": "created",
                "item": {"slug": "../escape", "status": "published"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Direct submission
// =============================================================================

#[tokio::test]
async fn test_notify_endpoint_queues_url() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/index/notify",
            json!({"url": "https://example.com/blog/x", "action": "delete"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    wait_for_calls(&app.provider, 1).await;
    assert_eq!(app.provider.calls()[0].1, UrlIntent::UrlDeleted);
}

#[tokio::test]
async fn test_notify_rejects_foreign_host() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/index/notify",
            json!({"url": "https://elsewhere.org/blog/x", "action": "update"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.provider.calls().is_empty());
}

#[tokio::test]
async fn test_batch_endpoint_returns_summary() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/index/batch",
            json!({"urls": ["https://example.com/blog/a", "https://example.com/blog/b"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_urls"], 2);
    assert_eq!(body["providers"][0]["provider"], "recording");
    assert_eq!(body["providers"][0]["accepted"], 2);
    assert_eq!(body["disabled"], json!(["google"]));

    // Awaited, so the provider has already been called
    assert_eq!(app.provider.calls().len(), 1);
}

#[tokio::test]
async fn test_batch_rejects_empty_list() {
    let app = test_app(|_| {});

    let response = app
        .router
        .oneshot(post_json("/api/v1/index/batch", json!({"urls": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// API key
// =============================================================================

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let app = test_app(|s| s.api.key = Some(API_KEY.to_string()));
    let body = json!({"url": "https://example.com/blog/x", "action": "update"});

    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/v1/index/notify", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = post_json("/api/v1/index/notify", body);
    request
        .headers_mut()
        .insert(API_KEY_HEADER, API_KEY.parse().unwrap());
    let response = assert_ok!(app.router.clone().oneshot(request).await);
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // Public routes stay open
    let response = app.router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
