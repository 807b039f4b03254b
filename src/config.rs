use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{InspectorError, InspectorResult};

const CONFIG_FILE: &str = "droidpick.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectorConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    /// Zoom delta applied by the zoom-in / zoom-out buttons.
    #[serde(default = "default_button_zoom_step")]
    pub button_zoom_step: f64,
    /// Zoom delta applied per mouse-wheel notch.
    #[serde(default = "default_wheel_zoom_step")]
    pub wheel_zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            button_zoom_step: default_button_zoom_step(),
            wheel_zoom_step: default_wheel_zoom_step(),
        }
    }
}

fn default_min_zoom() -> f64 {
    0.1
}

fn default_max_zoom() -> f64 {
    50.0
}

fn default_button_zoom_step() -> f64 {
    0.2
}

fn default_wheel_zoom_step() -> f64 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Drags narrower or shorter than this (display px) are treated as clicks.
    #[serde(default = "default_click_threshold")]
    pub click_threshold: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            click_threshold: default_click_threshold(),
        }
    }
}

fn default_click_threshold() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Target number of grid points for an area sample.
    #[serde(default = "default_point_count")]
    pub point_count: u32,
    #[serde(default = "default_limit")]
    pub history_limit: usize,
    /// Longest edge of the crop preview in pixels.
    #[serde(default = "default_crop_preview_max")]
    pub crop_preview_max: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            point_count: default_point_count(),
            history_limit: default_limit(),
            crop_preview_max: default_crop_preview_max(),
        }
    }
}

fn default_point_count() -> u32 {
    25
}

fn default_crop_preview_max() -> u32 {
    280
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Directory holding `history.json`. Falls back to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            dir: None,
        }
    }
}

impl HistoryConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("droidpick"))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

fn default_limit() -> usize {
    50
}

fn resolve_config_path() -> InspectorResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(InspectorError::Config(format!(
        "{CONFIG_FILE} not found next to executable or in working directory"
    )))
}

pub fn load_config() -> InspectorResult<InspectorConfig> {
    let path = resolve_config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &std::path::Path) -> InspectorResult<InspectorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: InspectorConfig = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Loads the config, falling back to defaults when it is missing or invalid.
pub fn load_or_default() -> InspectorConfig {
    match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "using default configuration");
            InspectorConfig::default()
        }
    }
}

pub fn save_config(config: &InspectorConfig) -> InspectorResult<()> {
    let path = match resolve_config_path() {
        Ok(path) => path,
        Err(_) => std::env::current_dir()?.join(CONFIG_FILE),
    };
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
