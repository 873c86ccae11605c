//! JSON file store for the debate history archive.
//!
//! The whole archive (at most [`HISTORY_CAPACITY`] entries, newest first) is
//! rewritten on every save. Writes go to a sibling temp file that is then
//! renamed over the target, so a crash never leaves a half-written archive.

use debate_application::ports::history_store::{HistoryStore, HistoryStoreError};
use debate_domain::{HISTORY_CAPACITY, HistoryEntry};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<HistoryEntry> = serde_json::from_str(&content)
            .map_err(|e| HistoryStoreError::Corrupt(format!("{}: {}", self.path.display(), e)))?;
        entries.truncate(HISTORY_CAPACITY);

        debug!(
            "Loaded {} archived debates from {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| HistoryStoreError::Corrupt(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        debug!(
            "Saved {} archived debates to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
