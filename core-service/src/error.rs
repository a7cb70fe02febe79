use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error(transparent)]
    Drive(#[from] provider_google_drive::DriveError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
