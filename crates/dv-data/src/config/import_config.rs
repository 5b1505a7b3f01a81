//! Per-importer configuration

use serde::{Serialize, Deserialize};

use super::null_handling::NullConfig;

/// How raw files are turned into datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Field delimiter for CSV files
    pub delimiter: u8,

    /// Whether the first CSV line holds column names
    pub has_headers: bool,

    /// Missing-value handling
    pub null_config: NullConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            null_config: NullConfig::default(),
        }
    }
}

impl ImportConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_null_config(mut self, null_config: NullConfig) -> Self {
        self.null_config = null_config;
        self
    }
}
