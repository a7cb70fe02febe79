//! Local Storage Abstractions
//!
//! Provides platform-agnostic traits for reading local files that are about
//! to be uploaded, and for sniffing their content type.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// File metadata information
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

/// File system access trait
///
/// Abstracts the read side of local file I/O so uploads and credential
/// loading can be exercised without touching the real disk.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn load(fs: &dyn FileSystemAccess, path: &Path) -> Result<Bytes> {
///     if !fs.exists(path).await? {
///         return Err(BridgeError::NotAvailable(path.display().to_string()));
///     }
///     fs.read_file(path).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get metadata for a file or directory
    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// Read entire file contents into memory
    async fn read_file(&self, path: &Path) -> Result<Bytes>;
}

/// Content type sniffing trait
///
/// Detects the MIME type of a local file. Implementations may look at the
/// file name, the leading bytes, or both. Detection never fails for an
/// unknown format: `application/octet-stream` is returned instead.
#[async_trait]
pub trait ContentTypeDetector: Send + Sync {
    /// Detect the MIME type of the file at `path`
    async fn detect(&self, path: &Path) -> Result<String>;
}
