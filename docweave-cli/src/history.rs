//! File-backed history of created documents.
//!
//! A pretty-printed JSON array rewritten on every append. There is no locking; two
//! pushes finishing at the same moment can lose one entry.

use docweave_babel::{HistoryEntry, HistoryLog};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonHistory {
    path: PathBuf,
}

impl JsonHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryLog for JsonHistory {
    fn append(&self, entry: HistoryEntry) -> io::Result<()> {
        let mut entries = self.entries()?;
        entries.push(entry);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), count = entries.len(), "history written");
        Ok(())
    }

    fn entries(&self) -> io::Result<Vec<HistoryEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not a valid history file: {err}", self.path.display()),
            )
        })
    }
}
