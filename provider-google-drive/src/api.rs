//! Remote storage capability
//!
//! [`DriveApi`] is the narrow surface of the Drive v3 API the façade relies
//! on. [`crate::HttpDriveApi`] implements it over HTTP; tests substitute
//! recording doubles.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

use crate::error::ApiResult;
use crate::types::{DriveFile, FilesListResponse, NewFile, Permission};

/// Parameters of a files.list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub query: String,
    pub spaces: String,
    pub fields: String,
    /// Left to the API default when absent
    pub page_size: Option<u32>,
    pub page_token: Option<String>,
}

impl ListRequest {
    pub fn new(query: impl Into<String>, spaces: impl Into<String>, fields: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            spaces: spaces.into(),
            fields: fields.into(),
            page_size: None,
            page_token: None,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn page_token(mut self, page_token: Option<String>) -> Self {
        self.page_token = page_token;
        self
    }
}

/// Bytes uploaded together with file metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaContent {
    pub mime_type: String,
    pub data: Bytes,
}

/// Permission grant payload
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PermissionRequest {
    #[serde(rename = "type")]
    pub permission_type: String,
    pub role: String,
}

impl PermissionRequest {
    /// Anyone holding the link may read
    pub fn anyone_reader() -> Self {
        Self {
            permission_type: "anyone".to_string(),
            role: "reader".to_string(),
        }
    }
}

/// Drive v3 operations used by the façade.
///
/// Every call is a single round trip authorized with `access_token`. An
/// absent result (`Ok(None)`) means the API succeeded without returning the
/// resource.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// files.list
    async fn list_files(
        &self,
        access_token: &str,
        request: &ListRequest,
    ) -> ApiResult<Option<FilesListResponse>>;

    /// files.create without content
    async fn create_file(
        &self,
        access_token: &str,
        metadata: &NewFile,
        fields: &str,
    ) -> ApiResult<Option<DriveFile>>;

    /// files.create with a media body
    async fn create_file_with_content(
        &self,
        access_token: &str,
        metadata: &NewFile,
        content: MediaContent,
        fields: &str,
    ) -> ApiResult<Option<DriveFile>>;

    /// files.get with `alt=media`, appending the content to `sink`
    async fn download_media(
        &self,
        access_token: &str,
        file_id: &str,
        sink: &mut BytesMut,
    ) -> ApiResult<()>;

    /// files.delete
    async fn delete_file(&self, access_token: &str, file_id: &str) -> ApiResult<()>;

    /// permissions.create
    async fn create_permission(
        &self,
        access_token: &str,
        file_id: &str,
        permission: &PermissionRequest,
        fields: &str,
    ) -> ApiResult<Option<Permission>>;
}
