//! OAuth 2.0 token endpoint client
//!
//! Implements the `refresh_token` grant of RFC 6749 §6 against Google's token
//! endpoint. One round trip per call; failures are reported, never retried.
//!
//! # Security
//!
//! Neither the refresh token, the client secret nor the returned access token
//! is ever written to a log field.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::TokenEndpoint;
//! use std::sync::Arc;
//!
//! # async fn example(secret: core_auth::AuthorizedUserSecret) -> core_auth::Result<()> {
//! # use bridge_traits::{http::HttpClient, time::SystemClock};
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let endpoint = TokenEndpoint::new(
//!     "https://oauth2.googleapis.com/token",
//!     http_client,
//!     Arc::new(SystemClock),
//! );
//! let token = endpoint.refresh(&secret).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AccessToken, AuthorizedUserSecret};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::time::Clock;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Client for the OAuth 2.0 token endpoint.
pub struct TokenEndpoint {
    token_url: String,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
}

impl TokenEndpoint {
    pub fn new(
        token_url: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            http_client,
            clock,
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchange the secret's refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NetworkError`] when the request cannot be sent
    /// - [`AuthError::TokenRefreshFailed`] when the endpoint answers non-2xx
    /// - [`AuthError::TokenExchangeFailed`] when the answer is not a token
    #[instrument(skip(self, secret), fields(token_url = %self.token_url))]
    pub async fn refresh(&self, secret: &AuthorizedUserSecret) -> Result<AccessToken> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", secret.refresh_token.as_str()),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
        ];

        let encoded_body = serde_urlencoded::to_string(params).map_err(|e| {
            AuthError::TokenExchangeFailed(format!("Failed to encode token request: {}", e))
        })?;

        debug!("Refreshing access token");

        let request = HttpRequest::new(HttpMethod::Post, self.token_url.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(encoded_body));

        let issued_at = self.clock.now();
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(status = response.status, "Token endpoint rejected refresh");

            return Err(AuthError::TokenRefreshFailed(format!(
                "Token endpoint returned {}: {}",
                response.status, error_body
            )));
        }

        let token_response: TokenResponse = response.json().map_err(|e| {
            AuthError::TokenExchangeFailed(format!("Failed to parse token response: {}", e))
        })?;

        if token_response.access_token.is_empty() {
            return Err(AuthError::TokenExchangeFailed(
                "Token endpoint returned an empty access token".to_string(),
            ));
        }

        debug!(expires_in = token_response.expires_in, "Access token refreshed");

        AccessToken::from_expires_in(
            token_response.access_token,
            token_response.expires_in,
            issued_at,
        )
        .ok_or_else(|| {
            AuthError::TokenExchangeFailed(format!(
                "Token endpoint returned an invalid lifetime: expires_in={}",
                token_response.expires_in
            ))
        })
    }
}

/// Token response from the OAuth provider.
#[derive(Debug, Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

fn default_expires_in() -> i64 {
    3600 // Default to 1 hour if not specified
}
