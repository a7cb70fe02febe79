//! Folder path resolution
//!
//! Walks a [`FolderPath`] from the root, looking up each segment under the
//! folder resolved for the previous one and creating it when absent. Lookups
//! are strictly sequential and nothing is cached: the same path is resolved
//! from scratch on every call.
//!
//! When several folders share a name under the same parent the first one the
//! API returns wins. A failure part-way through leaves already created folders
//! in place, so a retry may create duplicates.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::api::{DriveApi, ListRequest};
use crate::error::{ApiResult, ProviderFailure};
use crate::model::FolderPath;
use crate::query::{self, DRIVE_SPACES, FOLDER_MIME_TYPE, FOLDER_QUERY_FIELDS, ID_FIELD};
use crate::types::NewFile;

pub struct FolderResolver {
    api: Arc<dyn DriveApi>,
}

impl FolderResolver {
    pub fn new(api: Arc<dyn DriveApi>) -> Self {
        Self { api }
    }

    /// Resolve `path` to the identifier of its last folder, creating missing
    /// folders along the way.
    ///
    /// # Errors
    ///
    /// Any failed lookup or creation aborts the walk. A creation that returns
    /// no identifier yields [`ProviderFailure::FolderNotCreated`].
    #[instrument(skip(self, access_token, path), fields(path = %path))]
    pub async fn resolve(&self, access_token: &str, path: &FolderPath) -> ApiResult<String> {
        let mut parent_id: Option<String> = None;

        for name in path.segments() {
            let folder_id = match self.find_folder(access_token, name, parent_id.as_deref()).await? {
                Some(id) => {
                    debug!(folder = %name, id = %id, "Folder found");
                    id
                }
                None => self.create_folder(access_token, name, parent_id.as_deref()).await?,
            };
            parent_id = Some(folder_id);
        }

        // FolderPath is never empty, so the loop ran at least once
        parent_id.ok_or_else(|| ProviderFailure::FolderNotCreated {
            name: path.to_string(),
        })
    }

    async fn find_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> ApiResult<Option<String>> {
        let request = ListRequest::new(
            query::folder_by_name(name, parent_id),
            DRIVE_SPACES,
            FOLDER_QUERY_FIELDS,
        );

        let first = self
            .api
            .list_files(access_token, &request)
            .await?
            .and_then(|page| page.files)
            .and_then(|files| files.into_iter().next());

        match first {
            Some(folder) => folder.id.filter(|id| !id.is_empty()).map(Some).ok_or_else(|| {
                ProviderFailure::Parse(format!("Folder '{}' was listed without an id", name))
            }),
            None => Ok(None),
        }
    }

    async fn create_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> ApiResult<String> {
        let metadata = NewFile {
            name: name.to_string(),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: parent_id.map(str::to_string).into_iter().collect(),
        };

        let id = self
            .api
            .create_file(access_token, &metadata, ID_FIELD)
            .await?
            .and_then(|folder| folder.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderFailure::FolderNotCreated {
                name: name.to_string(),
            })?;

        info!(folder = %name, id = %id, parent = ?parent_id, "Created folder");
        Ok(id)
    }
}
