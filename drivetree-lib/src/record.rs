// --- FILE: drivetree-lib/src/record.rs ---

use serde::Deserialize;

use crate::errors::{OrganizerError, OrganizerResult};

/// MIME type the provider uses to mark a folder.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Whether a record can hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Folder,
    RegularFile,
}

impl FileKind {
    /// Derives the kind from a provider MIME type.
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type == FOLDER_MIME_TYPE {
            FileKind::Folder
        } else {
            FileKind::RegularFile
        }
    }

    pub fn is_folder(self) -> bool {
        self == FileKind::Folder
    }

    /// Glyph shown in front of the type label.
    pub fn glyph(self) -> &'static str {
        match self {
            FileKind::Folder => "📂",
            FileKind::RegularFile => "📄",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Folder => "[Folder]",
            FileKind::RegularFile => "[File]",
        }
    }
}

/// One entry of a fetch batch.
///
/// Deserializes straight from a Drive `files` resource
/// (`{"id", "name", "mimeType", "parents"}`). Records are never mutated once
/// fetched; tree structure lives in [`crate::Forest`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFile")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub kind: FileKind,
    /// Parent identifiers in provider order. Empty means the implicit root.
    pub parents: Vec<String>,
}

impl FileRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        parents: Vec<String>,
    ) -> Self {
        let mime_type = mime_type.into();
        Self {
            id: id.into(),
            name: name.into(),
            kind: FileKind::from_mime_type(&mime_type),
            mime_type,
            parents,
        }
    }

    /// Shorthand for a folder record.
    pub fn folder(id: impl Into<String>, name: impl Into<String>, parents: &[&str]) -> Self {
        Self::new(id, name, FOLDER_MIME_TYPE, to_owned_ids(parents))
    }

    /// Shorthand for a regular file with a generic binary MIME type.
    pub fn file(id: impl Into<String>, name: impl Into<String>, parents: &[&str]) -> Self {
        Self::new(id, name, "application/octet-stream", to_owned_ids(parents))
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }
}

fn to_owned_ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    parents: Vec<String>,
}

impl From<RawFile> for FileRecord {
    fn from(raw: RawFile) -> Self {
        FileRecord::new(raw.id, raw.name, raw.mime_type, raw.parents)
    }
}

/// A `files.list` response body, or a bare array of file resources.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Page {
        #[serde(default)]
        files: Vec<FileRecord>,
    },
    Bare(Vec<FileRecord>),
}

/// Decodes a listing body into records, keeping the provider's order.
pub(crate) fn parse_listing(body: &str, context: &str) -> OrganizerResult<Vec<FileRecord>> {
    let listing: Listing =
        serde_json::from_str(body).map_err(|source| OrganizerError::Decode {
            context: context.to_string(),
            source,
        })?;
    Ok(match listing {
        Listing::Page { files } => files,
        Listing::Bare(files) => files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn kind_is_derived_from_folder_sentinel() {
        assert_eq!(FileKind::from_mime_type(FOLDER_MIME_TYPE), FileKind::Folder);
        assert_eq!(
            FileKind::from_mime_type("application/vnd.google-apps.document"),
            FileKind::RegularFile
        );
        assert_eq!(FileKind::from_mime_type(""), FileKind::RegularFile);
    }

    #[test]
    fn deserializes_drive_file_resource() -> Result<()> {
        let record: FileRecord = serde_json::from_str(
            r#"{"id":"abc","name":"Docs","mimeType":"application/vnd.google-apps.folder","parents":["root0"]}"#,
        )?;
        assert_eq!(record.id, "abc");
        assert_eq!(record.name, "Docs");
        assert!(record.is_folder());
        assert_eq!(record.parents, vec!["root0".to_string()]);
        Ok(())
    }

    #[test]
    fn parses_page_and_bare_listings_in_order() -> Result<()> {
        let page = parse_listing(
            r#"{"nextPageToken":"t","files":[{"id":"1","name":"b","mimeType":"text/plain"},{"id":"2","name":"a","mimeType":"text/plain"}]}"#,
            "test page",
        )?;
        assert_eq!(page.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["1", "2"]);

        let bare = parse_listing(r#"[{"id":"9","name":"x","mimeType":"text/plain"}]"#, "bare")?;
        assert_eq!(bare.len(), 1);

        let empty = parse_listing("{}", "empty page")?;
        assert!(empty.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_listing_is_a_decode_error() {
        let err = parse_listing("not json", "broken export").unwrap_err();
        assert!(matches!(err, OrganizerError::Decode { ref context, .. } if context == "broken export"));
    }

    #[test]
    fn missing_parents_means_no_parents() -> Result<()> {
        let record: FileRecord =
            serde_json::from_str(r#"{"id":"x","name":"shared.pdf","mimeType":"application/pdf"}"#)?;
        assert!(record.parents.is_empty());
        assert_eq!(record.kind, FileKind::RegularFile);
        Ok(())
    }
}
