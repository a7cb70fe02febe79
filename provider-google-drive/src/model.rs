//! Value objects returned by and handed to the façade

use chrono::{DateTime, Utc};

use crate::error::{DriveError, ProviderFailure, Result};
use crate::types::DriveFile;

/// Prefix of the public export link of a file
pub const EXPORT_URL_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

/// Page size used when the caller does not choose one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the façade will ever request
pub const MAX_PAGE_SIZE: u32 = 100;

/// A file stored in the drive.
///
/// The export URL is derived from the identifier at construction time and
/// cannot be set on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    id: String,
    name: String,
    export_url: String,
    created_time: DateTime<Utc>,
}

impl RemoteFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_time: DateTime<Utc>) -> Self {
        let id = id.into();
        let export_url = format!("{}{}", EXPORT_URL_PREFIX, id);
        Self {
            id,
            name: name.into(),
            export_url,
            created_time,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn export_url(&self) -> &str {
        &self.export_url
    }

    pub fn created_time(&self) -> DateTime<Utc> {
        self.created_time
    }
}

impl TryFrom<DriveFile> for RemoteFile {
    type Error = ProviderFailure;

    fn try_from(file: DriveFile) -> std::result::Result<Self, Self::Error> {
        let id = file
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderFailure::Parse("File resource has no id".to_string()))?;
        let created_time = file.created_time.ok_or_else(|| {
            ProviderFailure::Parse(format!("File resource '{}' has no createdTime", id))
        })?;

        Ok(RemoteFile::new(id, file.name.unwrap_or_default(), created_time))
    }
}

/// One page of a folder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFileList {
    files: Vec<RemoteFile>,
    next_page_token: Option<String>,
}

impl RemoteFileList {
    pub fn new(files: Vec<RemoteFile>, next_page_token: Option<String>) -> Self {
        Self {
            files,
            next_page_token,
        }
    }

    /// Files in provider response order
    pub fn files(&self) -> &[RemoteFile] {
        &self.files
    }

    /// Token for the following page, if any
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_parts(self) -> (Vec<RemoteFile>, Option<String>) {
        (self.files, self.next_page_token)
    }
}

/// Root-to-leaf sequence of folder names.
///
/// Never empty and never contains an empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// # Errors
    ///
    /// [`DriveError::InvalidFolderPath`] for an empty path or an empty segment.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        if segments.is_empty() {
            return Err(DriveError::InvalidFolderPath(
                "path must contain at least one folder name".to_string(),
            ));
        }

        if let Some(index) = segments.iter().position(|s| s.is_empty()) {
            return Err(DriveError::InvalidFolderPath(format!(
                "segment {} is empty",
                index
            )));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments; never true for a constructed path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Page size and continuation token of a listing call.
///
/// `PageRequest::default()` asks for the first page of 20 files. Sizes above
/// [`MAX_PAGE_SIZE`] are clamped down and a size of zero is raised to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_size: u32,
    page_token: Option<String>,
}

impl PageRequest {
    pub fn new(page_size: u32, page_token: Option<String>) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            page_token,
        }
    }

    /// Default page size, continuing from `page_token`
    pub fn with_token(page_token: impl Into<String>) -> Self {
        Self::new(DEFAULT_PAGE_SIZE, Some(page_token.into()))
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, None)
    }
}
