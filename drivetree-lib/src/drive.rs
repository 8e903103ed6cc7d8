// --- FILE: drivetree-lib/src/drive.rs ---

use std::fs;
use std::path::Path;

use log::{debug, error, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::client::{FileParents, StorageClient, UploadedFile, MAX_PAGE_SIZE};
use crate::config::OrganizerConfig;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::record::{parse_listing, FileRecord, FOLDER_MIME_TYPE};

/// Blocking client for the Drive v3 REST API.
///
/// Holds an already-issued OAuth access token and sends it as a bearer token
/// on every request. One request per operation, no retries.
pub struct DriveClient {
    client: Client,
    api_base: String,
    upload_base: String,
    token: String,
}

impl DriveClient {
    pub fn new(config: &OrganizerConfig, token: &str) -> OrganizerResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("drivetree/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| OrganizerError::Http {
                operation: "client setup".to_string(),
                source,
            })?;
        Ok(Self::with_client(client, config, token))
    }

    fn with_client(client: Client, config: &OrganizerConfig, token: &str) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.api_base)
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.api_base, file_id)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).bearer_auth(&self.token)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url).bearer_auth(&self.token)
    }

    fn patch(&self, url: &str) -> RequestBuilder {
        self.client.patch(url).bearer_auth(&self.token)
    }

    fn list_request(&self, page_size: u32) -> RequestBuilder {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        self.get(&self.files_url()).query(&[
            ("pageSize", page_size.as_str()),
            ("orderBy", "folder,name"),
            ("fields", "nextPageToken, files(id, name, mimeType, parents)"),
        ])
    }

    fn about_request(&self) -> RequestBuilder {
        self.get(&format!("{}/about", self.api_base))
            .query(&[("fields", "user")])
    }

    /// Opens a resumable upload session carrying the file metadata. Content
    /// follows in a second request to the returned session URI.
    fn upload_session_request(&self, name: &str, mime_type: &str, len: usize) -> RequestBuilder {
        self.post(&format!("{}/files", self.upload_base))
            .query(&[("uploadType", "resumable"), ("fields", "id, name")])
            .header("X-Upload-Content-Type", mime_type)
            .header("X-Upload-Content-Length", len.to_string())
            .json(&json!({ "name": name }))
    }

    fn upload_content_request(
        &self,
        session_uri: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> RequestBuilder {
        self.client
            .put(session_uri)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, mime_type)
            .body(content)
    }

    fn delete_request(&self, file_id: &str) -> RequestBuilder {
        self.client
            .delete(self.file_url(file_id))
            .bearer_auth(&self.token)
    }

    fn find_folder_request(&self, name: &str) -> RequestBuilder {
        let query = root_folder_query(name);
        debug!("Searching for folder with query: {}", query);
        self.get(&self.files_url())
            .query(&[("q", query.as_str()), ("fields", "files(id)")])
    }

    fn create_folder_request(&self, name: &str) -> RequestBuilder {
        self.post(&self.files_url())
            .query(&[("fields", "id")])
            .json(&json!({ "name": name, "mimeType": FOLDER_MIME_TYPE }))
    }

    fn file_parents_request(&self, file_id: &str) -> RequestBuilder {
        self.get(&self.file_url(file_id))
            .query(&[("fields", "parents, name")])
    }

    fn move_request(
        &self,
        file_id: &str,
        add_parent: &str,
        remove_parents: &[String],
    ) -> RequestBuilder {
        let remove = remove_parents.join(",");
        self.patch(&self.file_url(file_id))
            .query(&[
                ("addParents", add_parent),
                ("removeParents", remove.as_str()),
                ("fields", "id, parents, name"),
            ])
            .json(&json!({}))
    }
}

impl StorageClient for DriveClient {
    fn source_name(&self) -> &'static str {
        "Drive API"
    }

    fn list_files(&self, page_size: u32) -> OrganizerResult<Vec<FileRecord>> {
        let response = send("list files", self.list_request(page_size))?;
        let body = read_body("list files", response)?;
        let records = parse_listing(&body, "files.list response")?;
        debug!("Fetched {} records from the Drive API", records.len());
        Ok(records)
    }

    fn current_user(&self) -> OrganizerResult<Option<String>> {
        let response = send("about", self.about_request())?;
        let about: About = decode("about", response)?;
        Ok(about.user.and_then(|user| user.email_address))
    }

    fn upload_file(&self, path: &Path, mime_type: &str) -> OrganizerResult<UploadedFile> {
        if !path.is_file() {
            return Err(OrganizerError::LocalFileNotFound(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content = fs::read(path).map_err(|source| OrganizerError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Uploading '{}' ({} bytes)...", name, content.len());
        let response = send(
            "start upload",
            self.upload_session_request(&name, mime_type, content.len()),
        )?;
        let session_uri = upload_session_uri("start upload", response.headers())?;
        debug!("Upload session opened for '{}'", name);

        let response = send(
            "upload",
            self.upload_content_request(&session_uri, mime_type, content),
        )?;
        let created: NamedFile = decode("upload", response)?;
        Ok(UploadedFile {
            id: created.id,
            name: created.name,
        })
    }

    fn delete_file(&self, file_id: &str) -> OrganizerResult<()> {
        send("delete", self.delete_request(file_id))?;
        Ok(())
    }

    fn find_folder(&self, name: &str) -> OrganizerResult<Option<String>> {
        let response = send("find folder", self.find_folder_request(name))?;
        let found: FileIds = decode("find folder", response)?;
        Ok(found.files.into_iter().next().map(|f| f.id))
    }

    fn create_folder(&self, name: &str) -> OrganizerResult<String> {
        let response = send("create folder", self.create_folder_request(name))?;
        let created: IdOnly = decode("create folder", response)?;
        Ok(created.id)
    }

    fn file_parents(&self, file_id: &str) -> OrganizerResult<FileParents> {
        let response = send("get file", self.file_parents_request(file_id))?;
        let file: ParentsResponse = decode("get file", response)?;
        Ok(FileParents {
            name: file.name,
            parents: file.parents,
        })
    }

    fn move_file(
        &self,
        file_id: &str,
        add_parent: &str,
        remove_parents: &[String],
    ) -> OrganizerResult<()> {
        send(
            "move file",
            self.move_request(file_id, add_parent, remove_parents),
        )?;
        Ok(())
    }
}

/// Sends a request and turns transport failures and non-success statuses
/// into [`OrganizerError`]s.
fn send(operation: &str, request: RequestBuilder) -> OrganizerResult<Response> {
    debug!("Sending Drive API request: {}", operation);
    let response = request.send().map_err(|source| {
        error!("Request for '{}' could not be sent: {}", operation, source);
        OrganizerError::Http {
            operation: operation.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    error!("Drive API '{}' returned {}.\nBody: {}", operation, status, body);
    Err(OrganizerError::Api {
        operation: operation.to_string(),
        status: status.as_u16(),
        body,
    })
}

fn read_body(operation: &str, response: Response) -> OrganizerResult<String> {
    response.text().map_err(|source| OrganizerError::Http {
        operation: operation.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> OrganizerResult<T> {
    let body = read_body(operation, response)?;
    serde_json::from_str(&body).map_err(|source| OrganizerError::Decode {
        context: format!("{} response", operation),
        source,
    })
}

fn upload_session_uri(operation: &str, headers: &HeaderMap) -> OrganizerResult<String> {
    headers
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| OrganizerError::MissingUploadSession {
            operation: operation.to_string(),
        })
}

/// Builds the `q` expression that matches a folder by exact name under the root.
fn root_folder_query(name: &str) -> String {
    format!(
        "name='{}' and mimeType='{}' and 'root' in parents and trashed=false",
        escape_query_value(name),
        FOLDER_MIME_TYPE
    )
}

fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[derive(Deserialize)]
struct About {
    user: Option<AboutUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AboutUser {
    email_address: Option<String>,
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

#[derive(Deserialize)]
struct FileIds {
    #[serde(default)]
    files: Vec<IdOnly>,
}

#[derive(Deserialize)]
struct NamedFile {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct ParentsResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    parents: Vec<String>,
}
