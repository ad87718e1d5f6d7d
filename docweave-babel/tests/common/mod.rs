//! Recording fakes of the service traits, shared by the pipeline scenarios.

use chrono::Utc;
use docweave_babel::error::ServiceError;
use docweave_babel::service::{
    CommentThread, DocumentService, HistoryEntry, HistoryLog, RemoteFile,
};
use docweave_babel::styling::{DocumentTree, StyleMutation};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

/// One call made against [`FakeService`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindFolder(String),
    CreateFolder(String),
    Import {
        title: String,
        html: String,
        parent: Option<String>,
    },
    Metadata(String),
    FetchStructure(String),
    BatchUpdate {
        doc_id: String,
        mutations: Vec<StyleMutation>,
    },
    Export(String),
    ListComments(String),
}

pub const DOC_ID: &str = "doc-123";

/// A document service that records every call and answers from canned data.
pub struct FakeService {
    pub calls: RefCell<Vec<Call>>,
    pub folders: RefCell<BTreeMap<String, String>>,
    pub structure: String,
    pub export: String,
    pub comments: Vec<CommentThread>,
    pub fail_structure: bool,
    pub fail_batch: bool,
    pub fail_comments: bool,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            folders: RefCell::new(BTreeMap::new()),
            structure: HEADING_AND_BODY.to_string(),
            export: String::new(),
            comments: Vec::new(),
            fail_structure: false,
            fail_batch: false,
            fail_comments: false,
        }
    }
}

impl FakeService {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn imports(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Import { .. }))
            .collect()
    }

    pub fn batches(&self) -> Vec<Vec<StyleMutation>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::BatchUpdate { mutations, .. } => Some(mutations),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn file(&self, name: &str) -> RemoteFile {
        RemoteFile {
            id: DOC_ID.to_string(),
            name: name.to_string(),
            url: format!("https://docs.google.com/document/d/{DOC_ID}/edit"),
        }
    }
}

fn rejected(service: &str) -> ServiceError {
    ServiceError::Status {
        service: service.to_string(),
        status: 500,
        message: "backend error".to_string(),
    }
}

impl DocumentService for FakeService {
    fn find_folder(&self, name: &str) -> Result<Option<String>, ServiceError> {
        self.record(Call::FindFolder(name.to_string()));
        Ok(self.folders.borrow().get(name).cloned())
    }

    fn create_folder(&self, name: &str) -> Result<String, ServiceError> {
        self.record(Call::CreateFolder(name.to_string()));
        let id = format!("folder-{}", self.folders.borrow().len() + 1);
        self.folders.borrow_mut().insert(name.to_string(), id.clone());
        Ok(id)
    }

    fn import_html(
        &self,
        title: &str,
        html: &str,
        parent: Option<&str>,
    ) -> Result<RemoteFile, ServiceError> {
        self.record(Call::Import {
            title: title.to_string(),
            html: html.to_string(),
            parent: parent.map(str::to_string),
        });
        Ok(self.file(title))
    }

    fn file_metadata(&self, doc_id: &str) -> Result<RemoteFile, ServiceError> {
        self.record(Call::Metadata(doc_id.to_string()));
        Ok(self.file("Design Notes"))
    }

    fn fetch_structure(&self, doc_id: &str) -> Result<DocumentTree, ServiceError> {
        self.record(Call::FetchStructure(doc_id.to_string()));
        if self.fail_structure {
            return Err(rejected("Google Docs"));
        }
        DocumentTree::from_json(&self.structure)
            .map_err(|err| ServiceError::bad_response("Google Docs", err))
    }

    fn batch_update(&self, doc_id: &str, mutations: &[StyleMutation]) -> Result<(), ServiceError> {
        self.record(Call::BatchUpdate {
            doc_id: doc_id.to_string(),
            mutations: mutations.to_vec(),
        });
        if self.fail_batch {
            return Err(rejected("Google Docs"));
        }
        Ok(())
    }

    fn export_html(&self, doc_id: &str) -> Result<String, ServiceError> {
        self.record(Call::Export(doc_id.to_string()));
        Ok(self.export.clone())
    }

    fn list_comments(&self, doc_id: &str) -> Result<Vec<CommentThread>, ServiceError> {
        self.record(Call::ListComments(doc_id.to_string()));
        if self.fail_comments {
            return Err(ServiceError::unreachable("Google Drive", "connection reset"));
        }
        Ok(self.comments.clone())
    }
}

/// History kept in memory; `fail` makes every append error.
#[derive(Default)]
pub struct FakeHistory {
    pub entries: RefCell<Vec<HistoryEntry>>,
    pub fail: bool,
}

impl FakeHistory {
    pub fn with_entry(id: &str, source: &str) -> Self {
        let history = Self::default();
        history.entries.borrow_mut().push(HistoryEntry {
            id: id.to_string(),
            title: "Earlier".to_string(),
            source: source.to_string(),
            url: format!("https://docs.google.com/document/d/{id}/edit"),
            created_at: Utc::now(),
        });
        history
    }
}

impl HistoryLog for FakeHistory {
    fn append(&self, entry: HistoryEntry) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.entries.borrow_mut().push(entry);
        Ok(())
    }

    fn entries(&self) -> io::Result<Vec<HistoryEntry>> {
        Ok(self.entries.borrow().clone())
    }
}

/// `documents.get` body for "Title" as heading 1 followed by one body paragraph.
pub const HEADING_AND_BODY: &str = r#"{"title": "Title", "body": {"content": [
  {"endIndex": 1, "sectionBreak": {}},
  {"startIndex": 1, "endIndex": 7, "paragraph": {
    "elements": [{"textRun": {"content": "Title\n"}}],
    "paragraphStyle": {"namedStyleType": "HEADING_1"}}},
  {"startIndex": 7, "endIndex": 18, "paragraph": {
    "elements": [{"textRun": {"content": "Some text.\n"}}],
    "paragraphStyle": {"namedStyleType": "NORMAL_TEXT"}}}
]}}"#;
