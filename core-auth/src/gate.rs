//! Credential gate guarding every remote call
//!
//! The gate owns the credential for its whole lifetime. On first use (or
//! whenever the held credential has no token or no expiration) it loads the
//! credential from its source and exchanges it for a token. On every call it
//! asks the credential to refresh if expired, then performs its own expiry
//! check against the injected clock and forces an exchange when the token is
//! missing its expiration or is not after "now".
//!
//! Callers serialize on an async mutex, so one refresh at a time.

use bridge_traits::Clock;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::credentials::{CredentialSource, Credentials};
use crate::error::{AuthError, Result};
use crate::types::AccessToken;

pub struct CredentialGate {
    source: Arc<dyn CredentialSource>,
    clock: Arc<dyn Clock>,
    credentials: Mutex<Option<Box<dyn Credentials>>>,
}

impl CredentialGate {
    /// Create a gate that loads its credential lazily from `source`.
    pub fn new(source: Arc<dyn CredentialSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            credentials: Mutex::new(None),
        }
    }

    /// Create a gate around an already initialized credential.
    ///
    /// `source` is still consulted if the credential later loses its token.
    pub fn with_credentials(
        credentials: Box<dyn Credentials>,
        source: Arc<dyn CredentialSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            clock,
            credentials: Mutex::new(Some(credentials)),
        }
    }

    /// Return a token that is valid right now.
    ///
    /// # Errors
    ///
    /// Any [`AuthError`] raised while loading, refreshing or exchanging the
    /// credential.
    #[instrument(skip(self))]
    pub async fn ensure_valid_token(&self) -> Result<AccessToken> {
        let mut guard = self.credentials.lock().await;

        if !guard.as_deref().is_some_and(|c| is_initialized(c)) {
            *guard = Some(self.initialize().await?);
        }

        let credentials = guard.as_mut().ok_or_else(|| {
            AuthError::CredentialsUnavailable("Credential initialization produced nothing".to_string())
        })?;

        credentials.refresh_if_expired().await?;

        if self.is_token_expired(&**credentials) {
            debug!("Access token expired, exchanging for a new one");
            return credentials.refresh_access_token().await;
        }

        credentials.access_token().ok_or_else(|| {
            AuthError::TokenExchangeFailed("Credential holds no access token".to_string())
        })
    }

    async fn initialize(&self) -> Result<Box<dyn Credentials>> {
        let mut credentials = self.source.load().await?;
        credentials.refresh_if_expired().await?;
        credentials.refresh_access_token().await?;
        info!("Credentials initialized");
        Ok(credentials)
    }

    fn is_token_expired(&self, credentials: &dyn Credentials) -> bool {
        match credentials.access_token() {
            Some(token) if is_initialized(credentials) => token.is_expired_at(self.clock.now()),
            _ => true,
        }
    }
}

/// A credential counts as initialized once it holds a token with a known expiration.
fn is_initialized(credentials: &dyn Credentials) -> bool {
    credentials
        .access_token()
        .is_some_and(|token| token.expires_at().is_some())
}
