// --- FILE: drivetree-lib/src/archive.rs ---

use log::{debug, info};

use crate::client::StorageClient;
use crate::errors::OrganizerResult;
use crate::fetch_batch;
use crate::record::FileRecord;

/// What [`archive_first_file`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The batch held no regular file with a parent.
    NoCandidate,
    /// The candidate already sits in the archive folder.
    AlreadyArchived { file_name: String, folder_id: String },
    Moved {
        file_id: String,
        file_name: String,
        folder_id: String,
        previous_parents: Vec<String>,
    },
}

/// Picks the first regular file in fetch order that has at least one parent.
pub fn select_archive_candidate(records: &[FileRecord]) -> Option<&FileRecord> {
    records
        .iter()
        .find(|r| !r.is_folder() && !r.parents.is_empty())
}

/// Returns the id of the root-level folder named `name`, creating it if needed.
pub fn find_or_create_folder<C>(client: &C, name: &str) -> OrganizerResult<String>
where
    C: StorageClient + ?Sized,
{
    if let Some(id) = client.find_folder(name)? {
        debug!("Found existing folder '{}' with id {}", name, id);
        return Ok(id);
    }
    info!("Folder '{}' not found; creating it", name);
    client.create_folder(name)
}

/// Moves one file into the archive folder to show the organizing flow.
///
/// Fetches a fresh batch of `page_size` records, picks a candidate with
/// [`select_archive_candidate`], makes sure the archive folder exists, and
/// re-parents the file into it, dropping all of its previous parents.
/// A failed fetch counts as an empty batch and ends in
/// [`ArchiveOutcome::NoCandidate`].
pub fn archive_first_file<C>(
    client: &C,
    folder_name: &str,
    page_size: u32,
) -> OrganizerResult<ArchiveOutcome>
where
    C: StorageClient + ?Sized,
{
    let records = fetch_batch(client, page_size);
    let Some(candidate) = select_archive_candidate(&records) else {
        info!("No regular file with a parent in the batch; nothing to archive");
        return Ok(ArchiveOutcome::NoCandidate);
    };
    info!("Selected file '{}' for archiving", candidate.name);

    let folder_id = find_or_create_folder(client, folder_name)?;
    if candidate.parents.first() == Some(&folder_id) {
        return Ok(ArchiveOutcome::AlreadyArchived {
            file_name: candidate.name.clone(),
            folder_id,
        });
    }

    let current = client.file_parents(&candidate.id)?;
    info!("Moving '{}' to folder ID: {}...", current.name, folder_id);
    client.move_file(&candidate.id, &folder_id, &current.parents)?;

    Ok(ArchiveOutcome::Moved {
        file_id: candidate.id.clone(),
        file_name: current.name,
        folder_id,
        previous_parents: current.parents,
    })
}
