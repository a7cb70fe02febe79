//! Credential capabilities consumed by the [`CredentialGate`](crate::CredentialGate).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::AccessToken;

/// A refreshable credential.
///
/// Owned exclusively by the gate; every mutating call takes `&mut self` so
/// refreshes can never interleave.
#[async_trait]
pub trait Credentials: Send + Sync {
    /// The token currently held, if one was ever obtained
    fn access_token(&self) -> Option<AccessToken>;

    /// Whether the held token needs refreshing
    fn is_expired(&self) -> bool;

    /// Refresh only when [`is_expired`](Self::is_expired) reports true
    async fn refresh_if_expired(&mut self) -> Result<()>;

    /// Exchange for a fresh token unconditionally
    async fn refresh_access_token(&mut self) -> Result<AccessToken>;
}

/// Produces [`Credentials`] from configured secret material.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn load(&self) -> Result<Box<dyn Credentials>>;
}
