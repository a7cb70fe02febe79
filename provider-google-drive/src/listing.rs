//! Paginated folder listings

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::api::{DriveApi, ListRequest};
use crate::error::ApiResult;
use crate::model::{FolderPath, PageRequest, RemoteFile, RemoteFileList};
use crate::query::{self, DRIVE_SPACES, FOLDER_QUERY_FIELDS};
use crate::resolver::FolderResolver;
use crate::types::FilesListResponse;

/// Lists and searches the files of a folder path.
pub struct ListingEngine {
    api: Arc<dyn DriveApi>,
    resolver: FolderResolver,
}

impl ListingEngine {
    pub fn new(api: Arc<dyn DriveApi>) -> Self {
        Self {
            resolver: FolderResolver::new(Arc::clone(&api)),
            api,
        }
    }

    /// One page of the non-folder files under `path`, optionally restricted
    /// to names containing `name_filter`.
    ///
    /// An empty page carries the incoming page token unchanged. Only a
    /// non-empty page reports the provider's next-page token, which is absent
    /// on the last page.
    #[instrument(skip(self, access_token, path, page), fields(path = %path, page_size = page.page_size()))]
    pub async fn list(
        &self,
        access_token: &str,
        path: &FolderPath,
        page: &PageRequest,
        name_filter: Option<&str>,
    ) -> ApiResult<RemoteFileList> {
        let folder_id = self.resolver.resolve(access_token, path).await?;

        let query = match name_filter {
            Some(filter) => query::files_in_folder_matching(&folder_id, filter),
            None => query::files_in_folder(&folder_id),
        };
        let request = ListRequest::new(query, DRIVE_SPACES, FOLDER_QUERY_FIELDS)
            .page_size(page.page_size())
            .page_token(page.page_token().map(str::to_string));

        let response = self.api.list_files(access_token, &request).await?;

        match response {
            Some(response) if !response.is_empty() => {
                let list = to_file_list(response)?;
                debug!(count = list.len(), has_more = list.next_page_token().is_some(), "Listed folder");
                Ok(list)
            }
            _ => {
                debug!("Folder page is empty");
                Ok(RemoteFileList::new(
                    Vec::new(),
                    page.page_token().map(str::to_string),
                ))
            }
        }
    }

    /// First non-folder file under `path` named exactly `file_name`.
    #[instrument(skip(self, access_token, path), fields(path = %path))]
    pub async fn find(
        &self,
        access_token: &str,
        path: &FolderPath,
        file_name: &str,
    ) -> ApiResult<Option<RemoteFile>> {
        let folder_id = self.resolver.resolve(access_token, path).await?;

        let request = ListRequest::new(
            query::file_in_folder(file_name, &folder_id),
            DRIVE_SPACES,
            FOLDER_QUERY_FIELDS,
        );

        self.api
            .list_files(access_token, &request)
            .await?
            .and_then(|response| response.files)
            .and_then(|files| files.into_iter().next())
            .map(RemoteFile::try_from)
            .transpose()
    }
}

fn to_file_list(response: FilesListResponse) -> ApiResult<RemoteFileList> {
    let files = response
        .files
        .unwrap_or_default()
        .into_iter()
        .map(RemoteFile::try_from)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(RemoteFileList::new(files, response.next_page_token))
}
