use thiserror::Error;

/// Failures while obtaining or refreshing Google credentials.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The secret file could not be read, parsed or is of an unsupported kind
    #[error("Credentials unavailable: {0}")]
    CredentialsUnavailable(String),

    /// The token endpoint rejected the refresh request
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// The token endpoint answered with something that is not a usable token
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
