//! Error types for the Google Drive façade

use bridge_traits::error::BridgeError;
use core_auth::AuthError;
use thiserror::Error;

/// Message of every credential failure surfaced to callers
pub const OAUTH2_ERROR_MESSAGE: &str =
    "Error while getting access token for google api connection to initialize service.";

/// Message of every remote call failure surfaced to callers
pub const GENERAL_ERROR_MESSAGE: &str = "Error while performing action in google drive service";

/// Message raised when an upload yields no created file
pub const UPLOAD_RESULT_MISSING_MESSAGE: &str =
    "Error while performing upload action in google drive service, upload result null";

/// Underlying cause of a failed remote call
#[derive(Error, Debug)]
pub enum ProviderFailure {
    /// The API answered with a non-success status
    #[error("Google Drive API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered with a body that could not be understood
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Transport or local capability failure
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Folder creation returned no identifier
    #[error("Folder '{name}' was not created: no identifier returned")]
    FolderNotCreated { name: String },
}

/// Errors returned by the Google Drive façade
#[derive(Error, Debug)]
pub enum DriveError {
    /// Credential material could not be loaded, refreshed or exchanged
    #[error("{}", OAUTH2_ERROR_MESSAGE)]
    Security(#[source] AuthError),

    /// A remote call failed
    #[error("{}", GENERAL_ERROR_MESSAGE)]
    General(#[source] ProviderFailure),

    /// Upload completed without returning the created file
    #[error("{}", UPLOAD_RESULT_MISSING_MESSAGE)]
    UploadResultMissing,

    /// Folder path is empty or contains an empty segment
    #[error("Invalid folder path: {0}")]
    InvalidFolderPath(String),

    /// Local file cannot be uploaded (e.g. path has no file name)
    #[error("Invalid local file: {0}")]
    InvalidLocalFile(String),
}

impl From<AuthError> for DriveError {
    fn from(error: AuthError) -> Self {
        DriveError::Security(error)
    }
}

impl From<ProviderFailure> for DriveError {
    fn from(failure: ProviderFailure) -> Self {
        DriveError::General(failure)
    }
}

/// Result type for façade operations
pub type Result<T> = std::result::Result<T, DriveError>;

/// Result type for raw remote storage calls
pub type ApiResult<T> = std::result::Result<T, ProviderFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let error = ProviderFailure::Api {
            status: 404,
            message: "File not found: abc".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Google Drive API error (status 404): File not found: abc"
        );
    }

    #[test]
    fn test_general_error_keeps_cause() {
        let error: DriveError = ProviderFailure::Parse("unexpected EOF".to_string()).into();

        assert_eq!(error.to_string(), GENERAL_ERROR_MESSAGE);
        let source = error.source().expect("cause is preserved");
        assert!(source.to_string().contains("unexpected EOF"));
    }

    #[test]
    fn test_security_error_keeps_cause() {
        let error: DriveError = AuthError::TokenRefreshFailed("invalid_grant".to_string()).into();

        assert!(matches!(error, DriveError::Security(_)));
        assert_eq!(error.to_string(), OAUTH2_ERROR_MESSAGE);
        assert!(error.source().is_some());
    }

    #[test]
    fn test_upload_missing_has_no_cause() {
        let error = DriveError::UploadResultMissing;
        assert_eq!(error.to_string(), UPLOAD_RESULT_MISSING_MESSAGE);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_bridge_error_conversion() {
        let failure: ProviderFailure = BridgeError::OperationFailed("timeout".to_string()).into();
        assert!(matches!(failure, ProviderFailure::Bridge(_)));
    }
}
