// --- FILE: drivetree-lib/src/export.rs ---

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::client::{FileParents, StorageClient, UploadedFile};
use crate::errors::{OrganizerError, OrganizerResult};
use crate::record::{parse_listing, FileRecord};

const SOURCE_NAME: &str = "JSON export";

/// Read-only storage source backed by a saved `files.list` response.
///
/// Accepts either the response object (`{"files": [...]}`) or a bare array of
/// file resources. The file is read on every listing, so each call is its own
/// fetch batch. Anything that would change remote state is `Unsupported`.
#[derive(Debug, Clone)]
pub struct ExportClient {
    path: PathBuf,
}

impl ExportClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> OrganizerResult<Vec<FileRecord>> {
        debug!("Loading exported listing from {:?}", self.path);
        let body = fs::read_to_string(&self.path).map_err(|source| OrganizerError::IoError {
            path: self.path.clone(),
            source,
        })?;
        parse_listing(&body, &format!("export file {}", self.path.display()))
    }
}

fn unsupported<T>(operation: &'static str) -> OrganizerResult<T> {
    Err(OrganizerError::Unsupported {
        operation,
        source_name: SOURCE_NAME,
    })
}

impl StorageClient for ExportClient {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn list_files(&self, page_size: u32) -> OrganizerResult<Vec<FileRecord>> {
        let mut records = self.load()?;
        records.truncate(page_size as usize);
        Ok(records)
    }

    fn current_user(&self) -> OrganizerResult<Option<String>> {
        Ok(None)
    }

    fn upload_file(&self, _path: &Path, _mime_type: &str) -> OrganizerResult<UploadedFile> {
        unsupported("upload")
    }

    fn delete_file(&self, _file_id: &str) -> OrganizerResult<()> {
        unsupported("delete")
    }

    /// A folder counts as top-level when none of its parents is another
    /// folder in the export. Real exports list the Drive root's own id as
    /// the parent of root-level items, and that id is never in the batch.
    fn find_folder(&self, name: &str) -> OrganizerResult<Option<String>> {
        let records = self.load()?;
        let folder_ids: HashSet<&str> = records
            .iter()
            .filter(|r| r.is_folder())
            .map(|r| r.id.as_str())
            .collect();
        Ok(records
            .iter()
            .find(|r| {
                r.is_folder()
                    && r.name == name
                    && !r
                        .parents
                        .iter()
                        .any(|p| *p != r.id && folder_ids.contains(p.as_str()))
            })
            .map(|r| r.id.clone()))
    }

    fn create_folder(&self, _name: &str) -> OrganizerResult<String> {
        unsupported("create folder")
    }

    fn file_parents(&self, file_id: &str) -> OrganizerResult<FileParents> {
        self.load()?
            .into_iter()
            .find(|r| r.id == file_id)
            .map(|r| FileParents {
                name: r.name,
                parents: r.parents,
            })
            .ok_or_else(|| OrganizerError::UnknownFile {
                file_id: file_id.to_string(),
                source_name: SOURCE_NAME,
            })
    }

    fn move_file(
        &self,
        _file_id: &str,
        _add_parent: &str,
        _remove_parents: &[String],
    ) -> OrganizerResult<()> {
        unsupported("move")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    const EXPORT: &str = r#"{
  "files": [
    {"id": "1", "name": "Docs", "mimeType": "application/vnd.google-apps.folder"},
    {"id": "2", "name": "report.txt", "mimeType": "text/plain", "parents": ["1"]},
    {"id": "3", "name": "Photos", "mimeType": "application/vnd.google-apps.folder"}
  ]
}"#;

    #[test]
    fn lists_records_in_file_order_up_to_page_size() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("listing.json");
        fs::write(&path, EXPORT)?;

        let client = ExportClient::new(&path);
        let all = client.list_files(1000)?;
        assert_eq!(
            all.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            ["Docs", "report.txt", "Photos"]
        );
        assert_eq!(client.list_files(2)?.len(), 2);
        Ok(())
    }

    #[test]
    fn finds_top_level_folder_and_parents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("listing.json");
        fs::write(&path, EXPORT)?;

        let client = ExportClient::new(&path);
        assert_eq!(client.find_folder("Photos")?.as_deref(), Some("3"));
        assert_eq!(client.find_folder("report.txt")?, None);
        assert_eq!(client.file_parents("2")?.parents, vec!["1".to_string()]);
        assert!(matches!(
            client.file_parents("404"),
            Err(OrganizerError::UnknownFile { .. })
        ));
        Ok(())
    }

    #[test]
    fn root_folder_with_unlisted_parent_is_found() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("listing.json");
        fs::write(
            &path,
            r#"{"files": [
  {"id": "arch", "name": "CLI_Sorted_Archive", "mimeType": "application/vnd.google-apps.folder", "parents": ["0AROOTid"]},
  {"id": "d", "name": "Docs", "mimeType": "application/vnd.google-apps.folder", "parents": ["0AROOTid"]},
  {"id": "nested", "name": "Inner", "mimeType": "application/vnd.google-apps.folder", "parents": ["d"]}
]}"#,
        )?;

        let client = ExportClient::new(&path);
        assert_eq!(
            client.find_folder("CLI_Sorted_Archive")?.as_deref(),
            Some("arch")
        );
        assert_eq!(client.find_folder("Inner")?, None);
        assert_eq!(
            crate::find_or_create_folder(&client, "CLI_Sorted_Archive")?,
            "arch"
        );
        Ok(())
    }

    #[test]
    fn missing_export_is_io_error() {
        let client = ExportClient::new("/definitely/not/here.json");
        assert!(matches!(
            client.list_files(10),
            Err(OrganizerError::IoError { .. })
        ));
    }

    #[test]
    fn mutations_are_unsupported() -> Result<()> {
        let dir = tempdir()?;
        let client = ExportClient::new(dir.path().join("unused.json"));
        assert!(matches!(
            client.delete_file("1"),
            Err(OrganizerError::Unsupported { operation: "delete", .. })
        ));
        assert!(matches!(
            client.move_file("1", "2", &[]),
            Err(OrganizerError::Unsupported { .. })
        ));
        Ok(())
    }
}
