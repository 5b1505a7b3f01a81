//! Persistence collaborators
//!
//! Stores keep datasets across sessions. The dashboard treats store failures
//! as warnings: the in-memory state stays authoritative.

pub mod memory_store;
pub mod sqlite_store;

use dv_core::Dataset;

use crate::DataError;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// Key-value-by-id storage for datasets
pub trait DatasetStore: Send + Sync {
    /// Insert or replace a dataset
    fn save(&self, dataset: &Dataset) -> Result<(), DataError>;

    /// All stored datasets in first-saved order
    fn list_all(&self) -> Result<Vec<Dataset>, DataError>;

    /// Delete a dataset; deleting an unknown id is not an error
    fn delete(&self, id: &str) -> Result<(), DataError>;
}
