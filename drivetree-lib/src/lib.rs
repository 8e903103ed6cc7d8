// --- FILE: drivetree-lib/src/lib.rs ---

#![doc = include_str!("../README.md")]

use log::{error, info, warn};

// Declare modules
mod archive;
mod client;
mod config;
mod drive;
mod errors;
mod export;
mod record;
mod render;
mod tree;

// Public API exports
pub use archive::{
    archive_first_file, find_or_create_folder, select_archive_candidate, ArchiveOutcome,
};
pub use client::{FileParents, StorageClient, UploadedFile, MAX_PAGE_SIZE};
pub use config::{
    OrganizerConfig, DEFAULT_API_BASE, DEFAULT_ARCHIVE_FOLDER, DEFAULT_UPLOAD_BASE,
};
pub use drive::DriveClient;
pub use errors::{OrganizerError, OrganizerResult};
pub use export::ExportClient;
pub use record::{FileKind, FileRecord, FOLDER_MIME_TYPE};
pub use render::{render, Lines, NameOrder, RenderOptions, TreeLine, DEFAULT_NAME_WIDTH};
pub use tree::{build_forest, Forest};

/// Fetches one batch of records for a listing.
///
/// A failed fetch is logged and reported as an empty batch, so a listing
/// degrades to "nothing to display" instead of aborting.
pub fn fetch_batch<C>(client: &C, page_size: u32) -> Vec<FileRecord>
where
    C: StorageClient + ?Sized,
{
    info!(
        "Fetching file list from {} (up to {} items)",
        client.source_name(),
        page_size
    );
    match client.list_files(page_size) {
        Ok(records) => records,
        Err(e) => {
            error!("Error fetching files: {}", e);
            Vec::new()
        }
    }
}

/// Fetches a fresh batch and organizes it into a [`Forest`].
///
/// The result is ready for [`render`]. An empty forest means either an empty
/// drive or a failed fetch; both are shown as nothing to display.
///
/// # Example
///
/// ```no_run
/// use drivetree_lib::{list_tree, render, ExportClient, OrganizerConfig};
///
/// let config = OrganizerConfig::default();
/// let client = ExportClient::new("listing.json");
/// let forest = list_tree(&client, &config);
/// for line in render(&forest, config.render) {
///     println!("{}", line);
/// }
/// ```
pub fn list_tree<C>(client: &C, config: &OrganizerConfig) -> Forest
where
    C: StorageClient + ?Sized,
{
    let records = fetch_batch(client, config.page_size);
    let forest = build_forest(records);

    let unreachable = forest.unreachable_count();
    if unreachable > 0 {
        warn!(
            "{} records form a parent cycle and are not reachable from any top-level entry",
            unreachable
        );
    }
    forest
}
