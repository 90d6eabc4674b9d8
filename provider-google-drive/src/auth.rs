//! OAuth token refresh from stored credentials.
//!
//! Credentials are a small JSON file holding an OAuth client and a
//! long-lived refresh token obtained out of band. At startup the refresh
//! grant is exchanged once for a short-lived access token; the token is then
//! reused for the whole run. Authentication failure is fatal to the run, so
//! the token request is attempted exactly once.
//!
//! Token and secret values are never logged.

use crate::error::{DriveError, Result};
use crate::http::{HttpClient, HttpMethod, HttpRequest};
use bytes::Bytes;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Contents of the credentials file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Token endpoint override; Google's endpoint when absent
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl StoredCredentials {
    /// Load and validate credentials from a JSON file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            DriveError::MissingCredentials(format!("{}: {}", path.display(), e))
        })?;

        let creds: StoredCredentials = serde_json::from_slice(&raw).map_err(|e| {
            DriveError::MissingCredentials(format!("{}: {}", path.display(), e))
        })?;

        if creds.client_id.is_empty() || creds.client_secret.is_empty() {
            return Err(DriveError::MissingCredentials(
                "client_id and client_secret must be non-empty".to_string(),
            ));
        }
        if creds.refresh_token.is_empty() {
            return Err(DriveError::MissingCredentials(
                "refresh_token must be non-empty".to_string(),
            ));
        }

        debug!(path = %path.display(), "Loaded credentials");
        Ok(creds)
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

/// Token response from the OAuth provider.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Exchanges the stored refresh token for an access token.
pub struct Authenticator {
    credentials: StoredCredentials,
    http_client: Arc<dyn HttpClient>,
}

impl Authenticator {
    pub fn new(credentials: StoredCredentials, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            credentials,
            http_client,
        }
    }

    /// Perform the refresh grant once and return the access token.
    #[instrument(skip(self))]
    pub async fn access_token(&self) -> Result<String> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let encoded_body = serde_urlencoded::to_string(params)
            .map_err(|e| DriveError::AuthenticationFailed(format!("encoding request: {}", e)))?;

        let request = HttpRequest::new(HttpMethod::Post, self.credentials.token_uri())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(encoded_body));

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| DriveError::AuthenticationFailed(e.to_string()))?;

        if !response.is_success() {
            warn!(status = response.status, "Token refresh rejected");
            return Err(DriveError::AuthenticationFailed(format!(
                "token endpoint returned {}: {}",
                response.status,
                response.text()
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| DriveError::AuthenticationFailed(e.to_string()))?;

        info!(expires_in = token.expires_in, "Obtained access token");
        Ok(token.access_token)
    }
}
