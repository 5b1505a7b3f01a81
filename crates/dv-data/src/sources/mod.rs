//! Import collaborators
//!
//! Parsing happens on the blocking pool; the dashboard only awaits the
//! finished `Dataset` or an error naming what went wrong.

pub mod csv_source;
pub mod json_source;
pub mod mock;

use std::path::Path;

use async_trait::async_trait;
use dv_core::Dataset;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ImportConfig;
use crate::schema::SchemaDetector;
use crate::DataError;

pub use mock::MockDataSource;

/// A file handed over for import
#[derive(Debug, Clone)]
pub struct RawFile {
    /// File name, used as the dataset name and to pick a parser
    pub name: String,
    pub contents: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk
    pub async fn read(path: &Path) -> Result<Self, DataError> {
        let contents = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self { name, contents })
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    Json,
}

impl FileType {
    /// Detect the format from a file name's extension
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileType::Csv),
            "json" => Some(FileType::Json),
            _ => None,
        }
    }
}

/// Trait for import collaborators
#[async_trait]
pub trait DatasetImporter: Send + Sync {
    /// Parse a raw file into a new dataset with a fresh id
    async fn import(&self, file: RawFile) -> Result<Dataset, DataError>;
}

/// Importer for CSV and JSON-records files
#[derive(Debug, Clone, Default)]
pub struct FileImporter {
    config: ImportConfig,
}

impl FileImporter {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DatasetImporter for FileImporter {
    async fn import(&self, file: RawFile) -> Result<Dataset, DataError> {
        let file_type = FileType::from_name(&file.name)
            .ok_or_else(|| DataError::UnsupportedFormat(file.name.clone()))?;
        let config = self.config.clone();
        let RawFile { name, contents } = file;

        let (columns, data) = tokio::task::spawn_blocking(move || match file_type {
            FileType::Csv => csv_source::parse_csv(&contents, &config),
            FileType::Json => json_source::parse_json(&contents, &config),
        })
        .await??;

        for profile in SchemaDetector::new(self.config.null_config.clone()).profile(&columns, &data) {
            debug!(
                "Column '{}': {} numeric, {} text, {} empty",
                profile.name, profile.numeric_cells, profile.text_cells, profile.empty_cells
            );
        }

        let dataset = Dataset::new(Uuid::new_v4().to_string(), name, columns, data);
        info!(
            "Imported '{}' ({} rows, {} columns)",
            dataset.name(),
            dataset.shape().rows,
            dataset.shape().columns
        );
        Ok(dataset)
    }
}
