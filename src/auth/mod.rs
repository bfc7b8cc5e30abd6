//! Service account authentication for the per-URL indexing API.
//!
//! A signed RS256 assertion (`jwt`) is exchanged for a short-lived bearer
//! token at the OAuth token endpoint (`token`).

mod claims;
mod credentials;
mod jwt;
mod token;

use thiserror::Error;

pub use claims::{AssertionClaims, ASSERTION_LIFETIME_SECS};
pub use credentials::ServiceAccountKey;
pub use jwt::AssertionSigner;
pub use token::{TokenExchange, JWT_BEARER_GRANT_TYPE};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("Failed to sign assertion: {0}")]
    Signing(String),

    #[error("Token request failed: {0}")]
    Transport(#[from] crate::http::HttpError),

    #[error("Token endpoint returned {status}: {body}")]
    TokenRejected { status: u16, body: String },

    #[error("Failed to parse token response: {0}")]
    InvalidTokenResponse(String),
}
