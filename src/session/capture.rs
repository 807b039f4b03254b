use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::canvas::Bitmap;
use crate::errors::{InspectorError, InspectorResult};

/// Files produced by one capture: a screenshot and optionally a hierarchy dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub image_path: PathBuf,
    pub file_name: String,
    pub hierarchy_path: Option<PathBuf>,
    pub hierarchy_file_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Capture {
    pub fn new(image_path: PathBuf, hierarchy_path: Option<PathBuf>) -> Self {
        Self {
            file_name: file_name_of(&image_path),
            hierarchy_file_name: hierarchy_path.as_deref().map(file_name_of),
            image_path,
            hierarchy_path,
            timestamp: Utc::now(),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Something that can produce a screenshot (and maybe a dump) on disk.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    fn name(&self) -> &str;

    async fn capture(&self) -> InspectorResult<Capture>;
}

/// Captures that were already pulled to the local filesystem.
pub struct FileCapture {
    image: PathBuf,
    hierarchy: Option<PathBuf>,
}

impl FileCapture {
    pub fn new(image: impl Into<PathBuf>, hierarchy: Option<PathBuf>) -> Self {
        Self {
            image: image.into(),
            hierarchy,
        }
    }
}

#[async_trait]
impl CaptureSource for FileCapture {
    fn name(&self) -> &str {
        "file"
    }

    async fn capture(&self) -> InspectorResult<Capture> {
        if tokio::fs::metadata(&self.image).await.is_err() {
            return Err(InspectorError::Capture(format!(
                "screenshot not found: {}",
                self.image.display()
            )));
        }
        let hierarchy = match &self.hierarchy {
            Some(path) if tokio::fs::metadata(path).await.is_ok() => Some(path.clone()),
            Some(path) => {
                tracing::warn!(path = %path.display(), "hierarchy dump missing; continuing without it");
                None
            }
            None => None,
        };
        Ok(Capture::new(self.image.clone(), hierarchy))
    }
}

/// A capture with its image decoded and its dump read into memory.
#[derive(Debug)]
pub struct Snapshot {
    pub capture: Capture,
    pub bitmap: Bitmap,
    pub hierarchy_text: Option<String>,
}

impl Snapshot {
    /// Decodes the screenshot on a blocking thread. A dump that cannot be
    /// read is treated as absent.
    pub async fn load(capture: Capture) -> InspectorResult<Self> {
        let image_path = capture.image_path.clone();
        let bitmap = tokio::task::spawn_blocking(move || Bitmap::open(&image_path))
            .await
            .map_err(|e| InspectorError::Capture(format!("decode task failed: {e}")))??;

        let hierarchy_text = match &capture.hierarchy_path {
            Some(path) => match tokio::fs::read_to_string(path).await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "hierarchy dump unreadable");
                    None
                }
            },
            None => None,
        };

        tracing::info!(
            file = %capture.file_name,
            width = bitmap.width(),
            height = bitmap.height(),
            has_hierarchy = hierarchy_text.is_some(),
            "snapshot loaded"
        );

        Ok(Self {
            capture,
            bitmap,
            hierarchy_text,
        })
    }
}
