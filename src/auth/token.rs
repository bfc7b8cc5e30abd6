//! OAuth2 JWT-bearer token exchange.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::http::HttpClient;
use crate::metrics::TokenMetrics;

use super::{AssertionSigner, AuthError};

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assumed token lifetime when the endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Cached OAuth2 access token.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Exchanges signed assertions for bearer tokens, keeping the last one until
/// shortly before it expires.
pub struct TokenExchange {
    http: HttpClient,
    token_url: String,
    cached_token: RwLock<Option<CachedToken>>,
    grace_period: Duration,
}

impl TokenExchange {
    pub fn new(http: HttpClient, token_url: &str) -> Self {
        Self {
            http,
            token_url: token_url.to_string(),
            cached_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Get a bearer token, or `None` if one could not be obtained.
    ///
    /// Failures are logged here and never propagate further.
    pub async fn access_token(&self, signer: &AssertionSigner) -> Option<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    debug!("Using cached access token");
                    return Some(token.access_token.clone());
                }
            }
        }

        match self.acquire_token(signer).await {
            Ok(token) => {
                TokenMetrics::record_success();
                let access_token = token.access_token.clone();
                *self.cached_token.write().await = Some(token);
                Some(access_token)
            }
            Err(e) => {
                TokenMetrics::record_failure();
                warn!(
                    issuer = %signer.issuer(),
                    error = %e,
                    "Failed to obtain access token"
                );
                None
            }
        }
    }

    /// Drop the cached token, forcing a new exchange on next use.
    pub async fn invalidate(&self) {
        *self.cached_token.write().await = None;
    }

    #[instrument(skip(self, signer), fields(token_url = %self.token_url))]
    async fn acquire_token(&self, signer: &AssertionSigner) -> Result<CachedToken, AuthError> {
        let assertion = signer.sign()?;

        let response = self
            .http
            .post_form(
                &self.token_url,
                &[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion.as_str())],
            )
            .await?;

        if !response.is_success() {
            return Err(AuthError::TokenRejected {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))?;

        if token_response.access_token.is_empty() {
            return Err(AuthError::InvalidTokenResponse(
                "access_token is empty".to_string(),
            ));
        }

        let expires_in = token_response
            .expires_in
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = Utc::now() + Duration::seconds(expires_in);

        debug!(
            "Acquired new access token, expires at {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ServiceAccountKey;
    use crate::config::HttpConfig;

    #[test]
    fn test_cached_token_expiry() {
        let token = CachedToken {
            access_token: "test".to_string(),
            expires_at: Utc::now() + Duration::minutes(10),
        };

        // Not expired with 5 minute grace
        assert!(!token.is_expired(Duration::minutes(5)));

        // Expired with 15 minute grace
        assert!(token.is_expired(Duration::minutes(15)));
    }

    #[test]
    fn test_token_response_without_expiry() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token": "ya29.abc", "token_type": "Bearer"}"#)
                .unwrap();
        assert_eq!(parsed.access_token, "ya29.abc");
        assert!(parsed.expires_in.is_none());
    }

    #[tokio::test]
    async fn test_signing_failure_yields_no_token() {
        let exchange = TokenExchange::new(
            HttpClient::new(&HttpConfig::default()),
            "http://127.0.0.1:9/token",
        );
        let signer = AssertionSigner::new(
            ServiceAccountKey {
                client_email: "a@b.c".to_string(),
                private_key: "garbage".to_string(),
            },
            "scope",
            "http://127.0.0.1:9/token",
        );

        assert!(exchange.access_token(&signer).await.is_none());
    }
}
