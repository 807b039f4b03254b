use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::HistoryConfig;
use crate::errors::InspectorResult;
use crate::session::capture::Capture;

const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub image_path: PathBuf,
    pub file_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub xml_path: Option<PathBuf>,
    #[serde(default)]
    pub xml_file_name: Option<String>,
    #[serde(default)]
    pub has_nodes: bool,
}

impl HistoryEntry {
    pub fn from_capture(capture: &Capture) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            image_path: capture.image_path.clone(),
            file_name: capture.file_name.clone(),
            timestamp: capture.timestamp,
            xml_path: capture.hierarchy_path.clone(),
            xml_file_name: capture.hierarchy_file_name.clone(),
            has_nodes: capture.hierarchy_path.is_some(),
        }
    }
}

/// Durable storage for the capture history list.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> InspectorResult<Vec<HistoryEntry>>;
    fn save(&self, entries: &[HistoryEntry]) -> InspectorResult<()>;
}

/// Pretty-printed `history.json` in a directory.
pub struct JsonHistoryStore {
    file_path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            file_path: dir.into().join(HISTORY_FILE),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.resolved_dir())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> InspectorResult<Vec<HistoryEntry>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &[HistoryEntry]) -> InspectorResult<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.file_path, serde_json::to_string_pretty(entries)?)?;
        tracing::debug!(
            path = %self.file_path.display(),
            entries = entries.len(),
            "history saved"
        );
        Ok(())
    }
}

/// Newest-first capture history, persisted after every change.
pub struct History {
    entries: Vec<HistoryEntry>,
    limit: usize,
    store: Box<dyn HistoryStore>,
}

impl History {
    /// Loads the stored list, dropping entries whose screenshot no longer
    /// exists. A store that cannot be read starts empty.
    pub fn open(store: Box<dyn HistoryStore>, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut entries = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "history unreadable; starting empty");
            Vec::new()
        });
        let before = entries.len();
        entries.retain(|entry| entry.image_path.exists());
        entries.truncate(limit);
        if entries.len() != before {
            tracing::info!(dropped = before - entries.len(), "stale history entries dropped");
        }
        Self {
            entries,
            limit,
            store,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn record(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
        self.persist();
        &self.entries[0]
    }

    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(idx);
        self.persist();
        Some(removed)
    }

    /// Forgets every entry. Screenshot files are left alone.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.entries) {
            tracing::warn!(error = %e, "failed to persist history");
        }
    }
}
