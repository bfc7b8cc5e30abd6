use serde::Deserialize;

use super::AuthError;

/// The subset of a service account key file needed to sign assertions
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
}

impl ServiceAccountKey {
    /// Parse the JSON key blob as downloaded from the cloud console.
    ///
    /// Keys pasted into env files often carry literal `\n` sequences instead of
    /// newlines; those are restored so the PEM parses.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let mut key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;

        if key.client_email.trim().is_empty() {
            return Err(AuthError::InvalidCredentials(
                "client_email is empty".to_string(),
            ));
        }

        if key.private_key.contains("\\n") {
            key.private_key = key.private_key.replace("\\n", "\n");
        }

        Ok(key)
    }
}

// Never print the private key
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
