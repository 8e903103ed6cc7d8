// --- FILE: drivetree-lib/src/config.rs ---

use crate::client::MAX_PAGE_SIZE;
use crate::render::RenderOptions;

/// Default Drive v3 endpoint for metadata requests.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Default Drive v3 endpoint for media uploads.
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Root-level folder the archive operation moves files into.
pub const DEFAULT_ARCHIVE_FOLDER: &str = "CLI_Sorted_Archive";

/// Configuration for `drivetree` operations.
///
/// Typically assembled by the calling application (e.g. the CLI) from config
/// files and command-line flags. The access token is deliberately not part of
/// it; it is handed straight to [`crate::DriveClient::new`].
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Base URL for metadata calls (`files`, `about`).
    pub api_base: String,

    /// Base URL for media uploads.
    pub upload_base: String,

    /// How many records one listing fetches. At most [`MAX_PAGE_SIZE`]; only
    /// the first page is ever requested.
    pub page_size: u32,

    /// Name of the root-level folder used by the archive operation.
    pub archive_folder: String,

    /// How tree lines are ordered and laid out.
    pub render: RenderOptions,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            page_size: MAX_PAGE_SIZE,
            archive_folder: DEFAULT_ARCHIVE_FOLDER.to_string(),
            render: RenderOptions::default(),
        }
    }
}
