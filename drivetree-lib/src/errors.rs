// --- FILE: drivetree-lib/src/errors.rs ---

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during `drivetree` library operations.
///
/// Only the storage side can fail. Building and rendering a tree never
/// produces an error; bad parent references just change where a record lands.
#[derive(Error, Debug)]
pub enum OrganizerError {
    /// The HTTP request could not be sent or its body could not be read
    /// (DNS, TLS, connection reset, ...).
    #[error("HTTP request for {operation} failed: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status code.
    /// Contains the response body for debugging.
    #[error("{operation} failed with status {status}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    /// A response or export file did not have the expected JSON shape.
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An I/O error occurred while reading a local file.
    #[error("IO error accessing path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The local file given for upload does not exist.
    #[error("Local file not found: {0}")]
    LocalFileNotFound(PathBuf),

    /// A resumable upload was accepted without a session URI to send the
    /// content to.
    #[error("{operation} response did not include an upload session URI")]
    MissingUploadSession { operation: String },

    /// The storage source has no file with this identifier.
    #[error("No file with id '{file_id}' in {source_name}")]
    UnknownFile {
        file_id: String,
        source_name: &'static str,
    },

    /// The storage source is read-only and cannot perform this operation.
    #[error("Operation '{operation}' is not supported by {source_name}")]
    Unsupported {
        operation: &'static str,
        source_name: &'static str,
    },
}

/// A convenience type alias for `Result<T, OrganizerError>`.
pub type OrganizerResult<T> = Result<T, OrganizerError>;
