//! File-backed `authorized_user` credentials
//!
//! Google's `authorized_user` secret file carries an OAuth client and a
//! long-lived refresh token. [`FileCredentialSource`] reads and validates the
//! file; [`RefreshTokenCredentials`] turns it into short-lived access tokens.

use async_trait::async_trait;
use bridge_traits::{Clock, FileSystemAccess, HttpClient};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::credentials::{CredentialSource, Credentials};
use crate::error::{AuthError, Result};
use crate::oauth::TokenEndpoint;
use crate::types::{AccessToken, AuthorizedUserSecret};

/// Tokens this close to expiring are refreshed by `refresh_if_expired`
pub const REFRESH_MARGIN_SECS: i64 = 60;

const AUTHORIZED_USER: &str = "authorized_user";
const SERVICE_ACCOUNT: &str = "service_account";

/// Credentials that refresh through the `refresh_token` grant.
pub struct RefreshTokenCredentials {
    secret: AuthorizedUserSecret,
    endpoint: TokenEndpoint,
    clock: Arc<dyn Clock>,
    token: Option<AccessToken>,
}

impl RefreshTokenCredentials {
    pub fn new(secret: AuthorizedUserSecret, endpoint: TokenEndpoint, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            endpoint,
            clock,
            token: None,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.secret.client_id
    }
}

#[async_trait]
impl Credentials for RefreshTokenCredentials {
    fn access_token(&self) -> Option<AccessToken> {
        self.token.clone()
    }

    fn is_expired(&self) -> bool {
        let margin = Duration::seconds(REFRESH_MARGIN_SECS);
        self.token
            .as_ref()
            .map_or(true, |token| token.expires_within(self.clock.now(), margin))
    }

    async fn refresh_if_expired(&mut self) -> Result<()> {
        if self.is_expired() {
            self.refresh_access_token().await?;
        }
        Ok(())
    }

    async fn refresh_access_token(&mut self) -> Result<AccessToken> {
        let token = self.endpoint.refresh(&self.secret).await?;
        self.token = Some(token.clone());
        Ok(token)
    }
}

#[derive(Deserialize)]
struct SecretKind {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Parse an `authorized_user` secret file.
///
/// Files without a `type` field are accepted when they carry the required
/// keys; `service_account` files are rejected.
pub fn parse_secret(data: &[u8]) -> Result<AuthorizedUserSecret> {
    let SecretKind { kind } = serde_json::from_slice(data).map_err(|e| {
        AuthError::CredentialsUnavailable(format!("Secret file is not valid JSON: {}", e))
    })?;

    match kind.as_deref() {
        None | Some(AUTHORIZED_USER) => {}
        Some(SERVICE_ACCOUNT) => {
            return Err(AuthError::CredentialsUnavailable(
                "Service account secret files are not supported; use an authorized_user file"
                    .to_string(),
            ))
        }
        Some(other) => {
            return Err(AuthError::CredentialsUnavailable(format!(
                "Unsupported secret file type '{}'",
                other
            )))
        }
    }

    serde_json::from_slice(data).map_err(|e| {
        AuthError::CredentialsUnavailable(format!("Secret file is incomplete: {}", e))
    })
}

/// Loads [`RefreshTokenCredentials`] from a secret file on disk.
pub struct FileCredentialSource {
    path: PathBuf,
    token_url: String,
    file_system: Arc<dyn FileSystemAccess>,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
}

impl FileCredentialSource {
    pub fn new(
        path: impl Into<PathBuf>,
        token_url: impl Into<String>,
        file_system: Arc<dyn FileSystemAccess>,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            path: path.into(),
            token_url: token_url.into(),
            file_system,
            http_client,
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialSource for FileCredentialSource {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Box<dyn Credentials>> {
        let exists = self
            .file_system
            .exists(&self.path)
            .await
            .map_err(|e| AuthError::CredentialsUnavailable(e.to_string()))?;

        if !exists {
            return Err(AuthError::CredentialsUnavailable(format!(
                "Secret file not found: {}",
                self.path.display()
            )));
        }

        let data = self
            .file_system
            .read_file(&self.path)
            .await
            .map_err(|e| AuthError::CredentialsUnavailable(e.to_string()))?;

        let secret = parse_secret(&data)?;
        // A token_uri inside the file wins over the configured endpoint
        let token_url = secret
            .token_uri
            .clone()
            .unwrap_or_else(|| self.token_url.clone());

        debug!(client_id = %secret.client_id, token_url = %token_url, "Parsed secret file");

        let endpoint = TokenEndpoint::new(token_url, Arc::clone(&self.http_client), Arc::clone(&self.clock));
        info!("Loaded authorized_user credentials");

        Ok(Box::new(RefreshTokenCredentials::new(
            secret,
            endpoint,
            Arc::clone(&self.clock),
        )))
    }
}
