//! Outbound HTTP(S) client used by the indexing providers and the token exchange.

use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Method, Request, StatusCode};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use thiserror::Error;

use crate::config::HttpConfig;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Status and (lossily decoded) body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Thin wrapper around a pooled hyper client with a per-request timeout.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a JSON body, optionally bearer-authenticated
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        bearer_token: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| HttpError::InvalidRequest(format!("JSON serialization failed: {}", e)))?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8");

        if let Some(token) = bearer_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;

        self.send(request).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    pub async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let payload = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;

        self.send(request).await
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<HttpResponse, HttpError> {
        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?;

            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| HttpError::Body(e.to_string()))?
                .to_bytes();

            Ok(HttpResponse {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| HttpError::Timeout(self.timeout))?
    }
}
