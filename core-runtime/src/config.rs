//! # Core Configuration Module
//!
//! Provides configuration management for the drive façade.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every capability and setting the façade needs. It
//! enforces fail-fast validation so a misconfigured host learns about it at
//! startup instead of on the first remote call.
//!
//! ## Required Settings
//!
//! - `credentials_path` - Location of the Google secret file
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `FileSystemAccess` - Local file reads (desktop default: tokio fs)
//! - `ContentTypeDetector` - MIME sniffing (desktop default: magic bytes)
//! - `Clock` - Time source for token expiry (default: system clock)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults are
//! injected automatically for any capability that was not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .credentials_path("/etc/drive/credentials.json")
//!     .application_name("reports-uploader")
//!     .request_timeout(Duration::from_secs(60))
//!     .build()?;
//! ```
//!
//! Or from the process environment:
//!
//! ```ignore
//! // GOOGLE_DRIVE_CREDENTIALS=/etc/drive/credentials.json
//! let config = CoreConfig::from_env()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, ContentTypeDetector, FileSystemAccess, HttpClient, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the secret file path
pub const ENV_CREDENTIALS_PATH: &str = "GOOGLE_DRIVE_CREDENTIALS";
/// Environment variable overriding the application name
pub const ENV_APPLICATION_NAME: &str = "GOOGLE_DRIVE_APPLICATION_NAME";
/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "GOOGLE_DRIVE_TIMEOUT_SECS";

/// Application name used when none is configured
pub const DEFAULT_APPLICATION_NAME: &str = "drive-facade";
/// Request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound accepted for the request timeout
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Base URLs of the remote services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEndpoints {
    /// Drive v3 metadata API
    pub api_base_url: String,
    /// Drive v3 media upload API
    pub upload_base_url: String,
    /// OAuth2 token endpoint
    pub token_url: String,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base_url: "https://www.googleapis.com/upload/drive/v3".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

impl DriveEndpoints {
    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("api_base_url", &self.api_base_url),
            ("upload_base_url", &self.upload_base_url),
            ("token_url", &self.token_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(Error::Config(format!(
                    "Endpoint {} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        Ok(())
    }
}

/// Core configuration for the drive façade.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Path to the Google secret file
    pub credentials_path: PathBuf,

    /// Name reported to Google as the HTTP user agent
    pub application_name: String,

    /// Remote service base URLs
    pub endpoints: DriveEndpoints,

    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,

    /// HTTP client for API and token requests
    pub http_client: Arc<dyn HttpClient>,

    /// Local file system access for uploads and the secret file
    pub file_system: Arc<dyn FileSystemAccess>,

    /// MIME type detection for uploads
    pub content_type_detector: Arc<dyn ContentTypeDetector>,

    /// Time source for token expiry checks
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("credentials_path", &self.credentials_path)
            .field("application_name", &self.application_name)
            .field("endpoints", &self.endpoints)
            .field("request_timeout", &self.request_timeout)
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .field("content_type_detector", &"ContentTypeDetector { ... }")
            .field("clock", &"Clock { ... }")
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads `GOOGLE_DRIVE_CREDENTIALS` (required),
    /// `GOOGLE_DRIVE_APPLICATION_NAME` and `GOOGLE_DRIVE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        CoreConfigBuilder::from_lookup(|key| std::env::var(key).ok())?.build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Credentials path is not empty
    /// - Application name is not blank
    /// - Endpoints are http(s) URLs
    /// - Request timeout is within (0, 5 minutes]
    pub fn validate(&self) -> Result<()> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err(Error::Config(
                "Credentials path cannot be empty".to_string(),
            ));
        }

        if self.application_name.trim().is_empty() {
            return Err(Error::Config(
                "Application name cannot be empty".to_string(),
            ));
        }

        self.endpoints.validate()?;

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 5 minutes (300 seconds)".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing_error(capability: &str, purpose: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "{} implementation is required for {}. \
             Desktop: enable the 'desktop-shims' feature to use the default implementation. \
             Other hosts: inject an implementation through the config builder.",
            capability, purpose
        ),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(
    application_name: &str,
    timeout: Duration,
) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(application_name, timeout).map_err(|e| {
        Error::Internal(format!("Failed to initialize default HttpClient: {}", e))
    })?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(
    _application_name: &str,
    _timeout: Duration,
) -> Result<Arc<dyn HttpClient>> {
    Err(capability_missing_error("HttpClient", "Drive API and token requests"))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Ok(Arc::new(bridge_desktop::TokioFileSystem::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(capability_missing_error(
        "FileSystemAccess",
        "reading uploads and the credentials file",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_content_type_detector() -> Result<Arc<dyn ContentTypeDetector>> {
    Ok(Arc::new(bridge_desktop::MagicByteDetector::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_content_type_detector() -> Result<Arc<dyn ContentTypeDetector>> {
    Err(capability_missing_error(
        "ContentTypeDetector",
        "detecting upload MIME types",
    ))
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) to resolve defaults and
/// validate the result.
#[derive(Default)]
pub struct CoreConfigBuilder {
    credentials_path: Option<PathBuf>,
    application_name: Option<String>,
    endpoints: Option<DriveEndpoints>,
    request_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    content_type_detector: Option<Arc<dyn ContentTypeDetector>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CoreConfigBuilder {
    /// Seeds a builder from an environment-style lookup function.
    ///
    /// Unset variables leave the builder untouched; a malformed timeout is a
    /// configuration error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();

        if let Some(path) = lookup(ENV_CREDENTIALS_PATH) {
            builder = builder.credentials_path(path);
        }

        if let Some(name) = lookup(ENV_APPLICATION_NAME) {
            builder = builder.application_name(name);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        Ok(builder)
    }

    /// Sets the secret file path (required).
    pub fn credentials_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Sets the application name.
    ///
    /// Default: `drive-facade`
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Overrides the remote service base URLs.
    pub fn endpoints(mut self, endpoints: DriveEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Sets the HTTP request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system access implementation.
    ///
    /// If not provided, the desktop default (tokio fs-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Sets the content type detector implementation.
    pub fn content_type_detector(mut self, detector: Arc<dyn ContentTypeDetector>) -> Self {
        self.content_type_detector = Some(detector);
        self
    }

    /// Sets the time source. Defaults to the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when the credentials path is missing or a value is
    ///   out of range
    /// - [`Error::CapabilityMissing`] when a capability was not injected and
    ///   no desktop default is available
    pub fn build(self) -> Result<CoreConfig> {
        let credentials_path = self.credentials_path.ok_or_else(|| {
            Error::Config(format!(
                "Credentials path is required. Use .credentials_path() or set {}.",
                ENV_CREDENTIALS_PATH
            ))
        })?;

        let application_name = self
            .application_name
            .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string());
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(&application_name, request_timeout)?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let content_type_detector = match self.content_type_detector {
            Some(detector) => detector,
            None => provide_default_content_type_detector()?,
        };

        let config = CoreConfig {
            credentials_path,
            application_name,
            endpoints: self.endpoints.unwrap_or_default(),
            request_timeout,
            http_client,
            file_system,
            content_type_detector,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{FileMetadata, HttpRequest, HttpResponse};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;
    use std::path::Path;

    mock! {
        Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    mock! {
        Fs {}

        #[async_trait]
        impl FileSystemAccess for Fs {
            async fn exists(&self, path: &Path) -> BridgeResult<bool>;
            async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata>;
            async fn read_file(&self, path: &Path) -> BridgeResult<Bytes>;
        }
    }

    mock! {
        Detector {}

        #[async_trait]
        impl ContentTypeDetector for Detector {
            async fn detect(&self, path: &Path) -> BridgeResult<String>;
        }
    }

    fn builder_with_mocks() -> CoreConfigBuilder {
        CoreConfig::builder()
            .http_client(Arc::new(MockHttp::new()))
            .file_system(Arc::new(MockFs::new()))
            .content_type_detector(Arc::new(MockDetector::new()))
    }

    #[test]
    fn test_builder_requires_credentials_path() {
        let result = builder_with_mocks().build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Credentials path is required"));
    }

    #[test]
    fn test_builder_applies_defaults() {
        let config = builder_with_mocks()
            .credentials_path("/etc/drive/credentials.json")
            .build()
            .unwrap();

        assert_eq!(
            config.credentials_path,
            PathBuf::from("/etc/drive/credentials.json")
        );
        assert_eq!(config.application_name, DEFAULT_APPLICATION_NAME);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.endpoints, DriveEndpoints::default());
    }

    #[test]
    fn test_validate_rejects_blank_application_name() {
        let result = builder_with_mocks()
            .credentials_path("/creds.json")
            .application_name("   ")
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let result = builder_with_mocks()
            .credentials_path("/creds.json")
            .request_timeout(Duration::ZERO)
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be greater than 0"));
    }

    #[test]
    fn test_validate_rejects_excessive_timeout() {
        let result = builder_with_mocks()
            .credentials_path("/creds.json")
            .request_timeout(Duration::from_secs(301))
            .build();

        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let endpoints = DriveEndpoints {
            token_url: "ftp://oauth2.googleapis.com/token".to_string(),
            ..DriveEndpoints::default()
        };
        let result = builder_with_mocks()
            .credentials_path("/creds.json")
            .endpoints(endpoints)
            .build();

        assert!(result.unwrap_err().to_string().contains("token_url"));
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let vars: HashMap<&str, &str> = [
            (ENV_CREDENTIALS_PATH, "/srv/creds.json"),
            (ENV_APPLICATION_NAME, "nightly-backup"),
            (ENV_TIMEOUT_SECS, "45"),
        ]
        .into_iter()
        .collect();

        let config = CoreConfigBuilder::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap()
            .http_client(Arc::new(MockHttp::new()))
            .file_system(Arc::new(MockFs::new()))
            .content_type_detector(Arc::new(MockDetector::new()))
            .build()
            .unwrap();

        assert_eq!(config.credentials_path, PathBuf::from("/srv/creds.json"));
        assert_eq!(config.application_name, "nightly-backup");
        assert_eq!(config.request_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result = CoreConfigBuilder::from_lookup(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_http_client_without_shims() {
        let result = CoreConfig::builder()
            .credentials_path("/creds.json")
            .file_system(Arc::new(MockFs::new()))
            .content_type_detector(Arc::new(MockDetector::new()))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "HttpClient")
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_defaults() {
        let config = CoreConfig::builder()
            .credentials_path("/creds.json")
            .build()
            .expect("desktop defaults should succeed");

        assert_eq!(config.application_name, DEFAULT_APPLICATION_NAME);
    }

    #[test]
    fn test_debug_hides_capabilities() {
        let config = builder_with_mocks()
            .credentials_path("/creds.json")
            .build()
            .unwrap();

        let rendered = format!("{:?}", config);
        assert!(rendered.contains("HttpClient { ... }"));
        assert!(rendered.contains("/creds.json"));
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = builder_with_mocks()
            .credentials_path("/creds.json")
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.credentials_path, config.credentials_path);
        assert!(Arc::ptr_eq(&cloned.http_client, &config.http_client));
    }
}
