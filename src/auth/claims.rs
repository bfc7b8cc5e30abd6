use serde::{Deserialize, Serialize};

/// Lifetime of a signed assertion, in seconds
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the JWT-bearer assertion sent to the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Service account email
    pub iss: String,
    /// Space-separated OAuth scopes being requested
    pub scope: String,
    /// Token endpoint the assertion is meant for
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(issuer: &str, scope: &str, audience: &str, issued_at: i64) -> Self {
        Self {
            iss: issuer.to_string(),
            scope: scope.to_string(),
            aud: audience.to_string(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }
}
