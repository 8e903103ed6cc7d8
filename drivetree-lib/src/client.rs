// --- FILE: drivetree-lib/src/client.rs ---

use std::path::Path;

use crate::errors::OrganizerResult;
use crate::record::FileRecord;

/// Upper bound the provider accepts for one listing page.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Identifier and name the provider assigned to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
}

/// Current name and parent identifiers of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParents {
    pub name: String,
    pub parents: Vec<String>,
}

/// The storage provider seam.
///
/// Everything the tool does against remote storage goes through this trait, so
/// the listing and archive logic can run against the live API, a saved export,
/// or an in-memory fake.
pub trait StorageClient {
    /// Short name used in log lines and error messages.
    fn source_name(&self) -> &'static str;

    /// Fetches one page of up to `page_size` records. No further pages are
    /// requested.
    fn list_files(&self, page_size: u32) -> OrganizerResult<Vec<FileRecord>>;

    /// Email address of the signed-in user, when the provider reports one.
    fn current_user(&self) -> OrganizerResult<Option<String>>;

    /// Uploads a local file to the storage root under its base name.
    fn upload_file(&self, path: &Path, mime_type: &str) -> OrganizerResult<UploadedFile>;

    fn delete_file(&self, file_id: &str) -> OrganizerResult<()>;

    /// Finds a non-trashed folder named exactly `name` directly under the root.
    fn find_folder(&self, name: &str) -> OrganizerResult<Option<String>>;

    /// Creates a folder under the root and returns its identifier.
    fn create_folder(&self, name: &str) -> OrganizerResult<String>;

    fn file_parents(&self, file_id: &str) -> OrganizerResult<FileParents>;

    /// Re-parents `file_id`: adds `add_parent`, removes every id in `remove_parents`.
    fn move_file(
        &self,
        file_id: &str,
        add_parent: &str,
        remove_parents: &[String],
    ) -> OrganizerResult<()>;
}
