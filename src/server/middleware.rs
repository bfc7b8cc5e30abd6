use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use super::AppState;

/// Header carrying the shared secret for `/api/v1`
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Guards the CMS-facing routes with `api.key`.
///
/// Without a configured key every request passes (local development).
pub async fn api_key_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.settings.api.key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided.is_some_and(|key| key_matches(key, expected)) {
        return Ok(next.run(req).await);
    }

    tracing::warn!(
        path = %req.uri().path(),
        header_present = provided.is_some(),
        "Rejected request without a valid API key"
    );
    Err(StatusCode::UNAUTHORIZED)
}

/// Compare without leaking how many leading bytes matched
fn key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
