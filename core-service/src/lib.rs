//! Core service façade and bootstrap helpers.
//!
//! This crate wires the capabilities held by a [`CoreConfig`] (HTTP,
//! filesystem, content sniffing, clock) into a ready [`GoogleDriveService`].
//! Desktop hosts typically enable the `desktop-shims` feature so that any
//! capability left out of the configuration falls back to the
//! `bridge-desktop` implementation.
//!
//! ```ignore
//! use core_service::bootstrap_from_env;
//! use provider_google_drive::{FolderPath, PageRequest};
//!
//! let core = bootstrap_from_env()?;
//! let path = FolderPath::new(["reports", "2024"])?;
//! let page = core.drive().list_folder_files(&path, PageRequest::default()).await?;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_auth::{CredentialGate, FileCredentialSource};
use core_runtime::CoreConfig;
use provider_google_drive::{GoogleDriveService, HttpDriveApi};
use tracing::{info, instrument};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    gate: Arc<CredentialGate>,
    drive: Arc<GoogleDriveService>,
}

impl CoreService {
    /// The drive operations.
    pub fn drive(&self) -> Arc<GoogleDriveService> {
        Arc::clone(&self.drive)
    }

    /// The configuration the service was built from.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Obtain a token now instead of on the first drive call.
    ///
    /// Lets hosts surface a broken secret file at startup.
    #[instrument(skip(self))]
    pub async fn warm_up(&self) -> Result<()> {
        self.gate.ensure_valid_token().await?;
        info!("Credentials ready");
        Ok(())
    }
}

/// Wire a [`CoreService`] from an explicit configuration.
///
/// Nothing touches the network here: the secret file is read and exchanged
/// lazily by the first operation (or by [`CoreService::warm_up`]).
pub fn bootstrap(config: CoreConfig) -> Result<CoreService> {
    config.validate()?;

    let source = FileCredentialSource::new(
        config.credentials_path.clone(),
        config.endpoints.token_url.clone(),
        Arc::clone(&config.file_system),
        Arc::clone(&config.http_client),
        Arc::clone(&config.clock),
    );
    let gate = Arc::new(CredentialGate::new(
        Arc::new(source),
        Arc::clone(&config.clock),
    ));

    let api = HttpDriveApi::with_endpoints(
        Arc::clone(&config.http_client),
        config.endpoints.api_base_url.clone(),
        config.endpoints.upload_base_url.clone(),
    )
    .with_timeout(config.request_timeout);

    let drive = GoogleDriveService::new(
        Arc::clone(&gate),
        Arc::new(api),
        Arc::clone(&config.content_type_detector),
        Arc::clone(&config.file_system),
    );

    info!(
        application = %config.application_name,
        credentials = %config.credentials_path.display(),
        "Drive service bootstrapped"
    );

    Ok(CoreService {
        config: Arc::new(config),
        gate,
        drive: Arc::new(drive),
    })
}

/// Wire a [`CoreService`] from `GOOGLE_DRIVE_*` environment variables.
pub fn bootstrap_from_env() -> Result<CoreService> {
    bootstrap(CoreConfig::from_env()?)
}
