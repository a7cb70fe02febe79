//! Google Drive façade
//!
//! [`GoogleDriveService`] is the public entry point. Every operation first
//! obtains a valid token from the [`CredentialGate`], then resolves folder
//! paths where one is involved, then issues its Drive calls. Failures are
//! never retried.

use bridge_traits::storage::{ContentTypeDetector, FileSystemAccess};
use bytes::{Bytes, BytesMut};
use core_auth::CredentialGate;
use core_runtime::logging::strip_path;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::{DriveApi, MediaContent, PermissionRequest};
use crate::error::{DriveError, ProviderFailure, Result};
use crate::listing::ListingEngine;
use crate::model::{FolderPath, PageRequest, RemoteFile, RemoteFileList};
use crate::query::{FILE_FIELDS, ID_FIELD};
use crate::resolver::FolderResolver;
use crate::types::NewFile;

pub struct GoogleDriveService {
    gate: Arc<CredentialGate>,
    api: Arc<dyn DriveApi>,
    content_types: Arc<dyn ContentTypeDetector>,
    file_system: Arc<dyn FileSystemAccess>,
    resolver: FolderResolver,
    listing: ListingEngine,
}

impl GoogleDriveService {
    pub fn new(
        gate: Arc<CredentialGate>,
        api: Arc<dyn DriveApi>,
        content_types: Arc<dyn ContentTypeDetector>,
        file_system: Arc<dyn FileSystemAccess>,
    ) -> Self {
        Self {
            gate,
            resolver: FolderResolver::new(Arc::clone(&api)),
            listing: ListingEngine::new(Arc::clone(&api)),
            api,
            content_types,
            file_system,
        }
    }

    async fn access_token(&self) -> Result<String> {
        let token = self.gate.ensure_valid_token().await?;
        Ok(token.value().to_string())
    }

    /// Permanently delete a file or folder.
    #[instrument(skip(self))]
    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        let token = self.access_token().await?;
        self.api.delete_file(&token, file_id).await?;
        info!("Deleted file");
        Ok(())
    }

    /// Download the full content of a file into memory.
    #[instrument(skip(self))]
    pub async fn download_file(&self, file_id: &str) -> Result<Bytes> {
        let token = self.access_token().await?;

        let mut sink = BytesMut::new();
        self.api.download_media(&token, file_id, &mut sink).await?;

        info!(bytes = sink.len(), "Downloaded file");
        Ok(sink.freeze())
    }

    /// Upload `local_file` into `path` without sharing it.
    pub async fn upload_file(&self, path: &FolderPath, local_file: &Path) -> Result<RemoteFile> {
        self.upload_file_with_visibility(path, local_file, false)
            .await
    }

    /// Upload `local_file` into `path`, creating missing folders.
    ///
    /// When `is_public` is set the uploaded file is shared with anyone
    /// holding its link before it is returned.
    ///
    /// # Errors
    ///
    /// [`DriveError::UploadResultMissing`] when the API accepts the upload but
    /// returns no file; no permission is granted in that case.
    #[instrument(
        skip(self, path, local_file),
        fields(path = %path, file = %strip_path(&local_file.to_string_lossy()))
    )]
    pub async fn upload_file_with_visibility(
        &self,
        path: &FolderPath,
        local_file: &Path,
        is_public: bool,
    ) -> Result<RemoteFile> {
        let token = self.access_token().await?;

        let name = local_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DriveError::InvalidLocalFile(local_file.display().to_string()))?;

        let local = self
            .file_system
            .metadata(local_file)
            .await
            .map_err(ProviderFailure::from)?;
        if local.is_directory {
            return Err(DriveError::InvalidLocalFile(format!(
                "{} is a directory",
                local_file.display()
            )));
        }

        let folder_id = self.resolver.resolve(&token, path).await?;

        let mime_type = self
            .content_types
            .detect(local_file)
            .await
            .map_err(ProviderFailure::from)?;
        let data = self
            .file_system
            .read_file(local_file)
            .await
            .map_err(ProviderFailure::from)?;

        let metadata = NewFile {
            name,
            mime_type: None,
            parents: vec![folder_id],
        };
        let content = MediaContent { mime_type, data };

        let created = self
            .api
            .create_file_with_content(&token, &metadata, content, FILE_FIELDS)
            .await?
            .ok_or(DriveError::UploadResultMissing)?;

        let file = RemoteFile::try_from(created)?;

        if is_public {
            self.grant_public_permission(&token, file.id()).await?;
        }

        info!(id = %file.id(), size = local.size, public = is_public, "Uploaded file");
        Ok(file)
    }

    /// Share a file with anyone holding its link, read-only.
    #[instrument(skip(self))]
    pub async fn set_public_permission(&self, file_id: &str) -> Result<()> {
        let token = self.access_token().await?;
        self.grant_public_permission(&token, file_id).await
    }

    async fn grant_public_permission(&self, token: &str, file_id: &str) -> Result<()> {
        self.api
            .create_permission(token, file_id, &PermissionRequest::anyone_reader(), ID_FIELD)
            .await?;
        info!(file_id, "Granted public read permission");
        Ok(())
    }

    /// One page of the files directly under `path`.
    #[instrument(skip(self, path, page), fields(path = %path))]
    pub async fn list_folder_files(&self, path: &FolderPath, page: PageRequest) -> Result<RemoteFileList> {
        let token = self.access_token().await?;
        Ok(self.listing.list(&token, path, &page, None).await?)
    }

    /// One page of the files under `path` whose name contains `name_filter`.
    #[instrument(skip(self, path, page), fields(path = %path))]
    pub async fn list_folder_files_by_name(
        &self,
        path: &FolderPath,
        name_filter: &str,
        page: PageRequest,
    ) -> Result<RemoteFileList> {
        let token = self.access_token().await?;
        Ok(self
            .listing
            .list(&token, path, &page, Some(name_filter))
            .await?)
    }

    /// The file under `path` named exactly `file_name`, if there is one.
    #[instrument(skip(self, path), fields(path = %path))]
    pub async fn find_file(&self, path: &FolderPath, file_name: &str) -> Result<Option<RemoteFile>> {
        let token = self.access_token().await?;
        Ok(self.listing.find(&token, path, file_name).await?)
    }
}
