//! Persisted application settings
//!
//! Settings and the visualization list are mirrored to a JSON file: loaded
//! once at startup and written back whenever the dashboard reports a change.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetId;
use crate::visualization::VisualizationConfig;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Whether to use dark mode
    pub dark_mode: bool,

    /// Dataset shown in the preview pane
    #[serde(default)]
    pub selected_dataset: Option<DatasetId>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            selected_dataset: None,
        }
    }
}

/// Everything besides dataset contents that survives a restart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: AppSettings,

    #[serde(default)]
    pub visualizations: Vec<VisualizationConfig>,
}

impl PersistedState {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let state = serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(state)
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = PersistedState::load(&dir.path().join("nope.json")).unwrap();

        assert!(state.settings.dark_mode);
        assert!(state.visualizations.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let state = PersistedState {
            settings: AppSettings {
                dark_mode: false,
                selected_dataset: Some("mock-data".into()),
            },
            visualizations: Vec::new(),
        };

        state.save(&path).unwrap();
        assert_eq!(PersistedState::load(&path).unwrap(), state);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        assert!(PersistedState::load(&path).is_err());
    }
}
