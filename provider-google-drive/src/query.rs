//! Drive query strings
//!
//! Every query is produced from a fixed template by substituting `%s`
//! placeholders in order. Names are inserted verbatim: a `'` inside a folder
//! or file name is not escaped and yields a query the API rejects.

/// MIME type of a Drive folder
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Only corpus searched by the façade
pub const DRIVE_SPACES: &str = "drive";

/// Fields returned for a single file
pub const FILE_FIELDS: &str = "id, name, parents, createdTime";

/// Fields returned for a listing page
pub const FOLDER_QUERY_FIELDS: &str = "nextPageToken, files(id, name, parents, createdTime)";

/// Fields returned when only the identifier matters
pub const ID_FIELD: &str = "id";

pub const FOLDER_QUERY_NAME: &str = "mimeType='application/vnd.google-apps.folder' and name='%s'";
pub const FOLDER_QUERY_PARENT: &str = " and '%s' in parents";
pub const FILE_QUERY_IN_FOLDER: &str =
    "mimeType!='application/vnd.google-apps.folder' and name='%s' and '%s' in parents";
pub const FILES_QUERY_IN_FOLDER: &str =
    "mimeType!='application/vnd.google-apps.folder' and '%s' in parents";
pub const FILES_QUERY_IN_FOLDER_MATCHING: &str =
    "mimeType!='application/vnd.google-apps.folder' and '%s' in parents and name contains '%s'";

/// Substitute each `%s` in `template` with the next argument.
///
/// Placeholders without a matching argument are left in place.
fn fill(template: &str, args: &[&str]) -> String {
    let mut pieces = template.split("%s");
    let mut query = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());

    if let Some(first) = pieces.next() {
        query.push_str(first);
    }

    let mut args = args.iter();
    for piece in pieces {
        match args.next() {
            Some(arg) => query.push_str(arg),
            None => query.push_str("%s"),
        }
        query.push_str(piece);
    }

    query
}

/// Folder called `name`, restricted to `parent_id` when one is known
pub fn folder_by_name(name: &str, parent_id: Option<&str>) -> String {
    let mut query = fill(FOLDER_QUERY_NAME, &[name]);
    if let Some(parent_id) = parent_id {
        query.push_str(&fill(FOLDER_QUERY_PARENT, &[parent_id]));
    }
    query
}

/// Non-folder file called exactly `name` inside `folder_id`
pub fn file_in_folder(name: &str, folder_id: &str) -> String {
    fill(FILE_QUERY_IN_FOLDER, &[name, folder_id])
}

/// Every non-folder file inside `folder_id`
pub fn files_in_folder(folder_id: &str) -> String {
    fill(FILES_QUERY_IN_FOLDER, &[folder_id])
}

/// Non-folder files inside `folder_id` whose name contains `filter`
pub fn files_in_folder_matching(folder_id: &str, filter: &str) -> String {
    fill(FILES_QUERY_IN_FOLDER_MATCHING, &[folder_id, filter])
}
