//! Data import and persistence for the dashboard
//!
//! Import collaborators turn raw files into `Dataset`s, the mock source
//! provides a fixed demo table and stores keep datasets across sessions.

pub mod config;
pub mod schema;
pub mod sources;
pub mod store;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::{ImportConfig, NullConfig};
pub use schema::SchemaDetector;
pub use sources::{DatasetImporter, FileImporter, FileType, MockDataSource, RawFile};
pub use store::{DatasetStore, MemoryStore, SqliteStore};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("JSON parsing error: {0}")]
    Json(String),

    #[error("SQLite error: {0}")]
    Sqlite(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Error processing file: {0}")]
    Parse(String),

    #[error("Dataset {0} already exists")]
    DuplicateDataset(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

/// A failed import of one file in a batch
#[derive(Error, Debug)]
#[error("Failed to import {file}: {source}")]
pub struct ImportError {
    pub file: String,
    #[source]
    pub source: DataError,
}

impl ImportError {
    pub fn new(file: impl Into<String>, source: DataError) -> Self {
        Self {
            file: file.into(),
            source,
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Json(error.to_string())
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(error: rusqlite::Error) -> Self {
        DataError::Sqlite(error.to_string())
    }
}
