//! Drive v3 and Docs v1 over REST.
//!
//! Creation goes through Drive's HTML import: a `multipart/related` upload whose
//! metadata asks for a native document. Structure reads and style writes use the Docs
//! API, everything else (folders, export, comments) uses Drive.

use super::{check_status, send_error};
use crate::auth::Authenticator;
use docweave_babel::service::{CommentReply, CommentThread, RemoteFile};
use docweave_babel::styling::{DocumentTree, StyleMutation};
use docweave_babel::{DocumentService, ServiceError};
use docweave_config::ServicesConfig;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const DRIVE: &str = "Google Drive";
const DOCS: &str = "Google Docs";

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const DOCUMENT_MIME: &str = "application/vnd.google-apps.document";
const FILE_FIELDS: &str = "id,name,webViewLink";
const COMMENT_FIELDS: &str = "nextPageToken,comments(content,deleted,resolved,author(displayName),\
quotedFileContent(value),replies(content,deleted,author(displayName)))";
const MULTIPART_BOUNDARY: &str = "docweave-import-boundary";

pub struct GoogleWorkspace {
    client: Client,
    auth: Authenticator,
    drive_api: String,
    upload_api: String,
    docs_api: String,
}

impl GoogleWorkspace {
    pub fn new(client: Client, auth: Authenticator, services: &ServicesConfig) -> Self {
        Self {
            client,
            auth,
            drive_api: services.drive_api.trim_end_matches('/').to_string(),
            upload_api: services.drive_upload_api.trim_end_matches('/').to_string(),
            docs_api: services.docs_api.trim_end_matches('/').to_string(),
        }
    }

    fn send(&self, service: &str, request: RequestBuilder) -> Result<Response, ServiceError> {
        let token = self.auth.access_token()?;
        let response = request
            .bearer_auth(token)
            .send()
            .map_err(|err| send_error(service, err))?;
        check_status(service, response)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        service: &str,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        self.send(service, request)?
            .json()
            .map_err(|err| ServiceError::bad_response(service, err))
    }
}

impl DocumentService for GoogleWorkspace {
    fn find_folder(&self, name: &str) -> Result<Option<String>, ServiceError> {
        let request = self
            .client
            .get(format!("{}/files", self.drive_api))
            .query(&[
                ("q", folder_query(name).as_str()),
                ("fields", "files(id,name)"),
                ("spaces", "drive"),
                ("pageSize", "10"),
            ]);
        let list: FileList = self.send_json(DRIVE, request)?;
        Ok(list
            .files
            .into_iter()
            .find(|file| file.name == name)
            .map(|file| file.id))
    }

    fn create_folder(&self, name: &str) -> Result<String, ServiceError> {
        let request = self
            .client
            .post(format!("{}/files", self.drive_api))
            .query(&[("fields", "id")])
            .json(&json!({ "name": name, "mimeType": FOLDER_MIME }));
        let file: DriveFile = self.send_json(DRIVE, request)?;
        Ok(file.id)
    }

    fn import_html(
        &self,
        title: &str,
        html: &str,
        parent: Option<&str>,
    ) -> Result<RemoteFile, ServiceError> {
        let body = import_body(title, html, parent);
        debug!(title, bytes = body.len(), "uploading html for import");
        let request = self
            .client
            .post(format!("{}/files", self.upload_api))
            .query(&[("uploadType", "multipart"), ("fields", FILE_FIELDS)])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(body);
        let file: DriveFile = self.send_json(DRIVE, request)?;
        Ok(file.into_remote())
    }

    fn file_metadata(&self, doc_id: &str) -> Result<RemoteFile, ServiceError> {
        let request = self
            .client
            .get(format!("{}/files/{doc_id}", self.drive_api))
            .query(&[("fields", FILE_FIELDS)]);
        let file: DriveFile = self.send_json(DRIVE, request)?;
        Ok(file.into_remote())
    }

    fn fetch_structure(&self, doc_id: &str) -> Result<DocumentTree, ServiceError> {
        let request = self
            .client
            .get(format!("{}/documents/{doc_id}", self.docs_api));
        let text = self
            .send(DOCS, request)?
            .text()
            .map_err(|err| ServiceError::bad_response(DOCS, err))?;
        DocumentTree::from_json(&text).map_err(|err| ServiceError::bad_response(DOCS, err))
    }

    fn batch_update(&self, doc_id: &str, mutations: &[StyleMutation]) -> Result<(), ServiceError> {
        debug!(doc_id, count = mutations.len(), "sending style batch");
        let request = self
            .client
            .post(format!("{}/documents/{doc_id}:batchUpdate", self.docs_api))
            .json(&json!({ "requests": mutations }));
        self.send(DOCS, request)?;
        Ok(())
    }

    fn export_html(&self, doc_id: &str) -> Result<String, ServiceError> {
        let request = self
            .client
            .get(format!("{}/files/{doc_id}/export", self.drive_api))
            .query(&[("mimeType", "text/html")]);
        self.send(DRIVE, request)?
            .text()
            .map_err(|err| ServiceError::bad_response(DRIVE, err))
    }

    fn list_comments(&self, doc_id: &str) -> Result<Vec<CommentThread>, ServiceError> {
        let mut threads = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![("fields", COMMENT_FIELDS), ("pageSize", "100")];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let request = self
                .client
                .get(format!("{}/files/{doc_id}/comments", self.drive_api))
                .query(&query);
            let page: CommentPage = self.send_json(DRIVE, request)?;
            threads.extend(page.comments.into_iter().filter_map(RawComment::into_thread));
            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }
        debug!(doc_id, count = threads.len(), "fetched comments");
        Ok(threads)
    }
}

/// Drive query for non-trashed folders named `name` at the account root.
fn folder_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{escaped}' and mimeType = '{FOLDER_MIME}' and trashed = false and 'root' in parents"
    )
}

fn import_body(title: &str, html: &str, parent: Option<&str>) -> String {
    let mut metadata = json!({ "name": title, "mimeType": DOCUMENT_MIME });
    if let Some(parent) = parent {
        metadata["parents"] = json!([parent]);
    }
    format!(
        "--{MULTIPART_BOUNDARY}\r\n\
        Content-Type: application/json; charset=UTF-8\r\n\r\n\
        {metadata}\r\n\
        --{MULTIPART_BOUNDARY}\r\n\
        Content-Type: text/html; charset=UTF-8\r\n\r\n\
        {html}\r\n\
        --{MULTIPART_BOUNDARY}--\r\n"
    )
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    web_view_link: Option<String>,
}

impl DriveFile {
    fn into_remote(self) -> RemoteFile {
        let url = self
            .web_view_link
            .unwrap_or_else(|| format!("https://docs.google.com/document/d/{}/edit", self.id));
        RemoteFile {
            id: self.id,
            name: self.name,
            url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentPage {
    #[serde(default)]
    comments: Vec<RawComment>,
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComment {
    author: Option<RawAuthor>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    resolved: bool,
    #[serde(default)]
    deleted: bool,
    quoted_file_content: Option<RawQuote>,
    #[serde(default)]
    replies: Vec<RawReply>,
}

#[derive(Debug, Deserialize)]
struct RawReply {
    author: Option<RawAuthor>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    deleted: bool,
}

impl RawComment {
    fn into_thread(self) -> Option<CommentThread> {
        if self.deleted {
            return None;
        }
        Some(CommentThread {
            author: self.author.and_then(|a| a.display_name),
            body: self.content,
            resolved: self.resolved,
            quoted: self
                .quoted_file_content
                .and_then(|q| q.value)
                .filter(|value| !value.is_empty()),
            replies: self
                .replies
                .into_iter()
                .filter(|reply| !reply.deleted)
                .map(|reply| CommentReply {
                    author: reply.author.and_then(|a| a.display_name),
                    body: reply.content,
                })
                .collect(),
        })
    }
}
