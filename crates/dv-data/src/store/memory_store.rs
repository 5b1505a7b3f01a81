use dv_core::Dataset;
use indexmap::IndexMap;
use parking_lot::RwLock;

use super::DatasetStore;
use crate::DataError;

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    datasets: RwLock<IndexMap<String, Dataset>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.datasets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.read().is_empty()
    }
}

impl DatasetStore for MemoryStore {
    fn save(&self, dataset: &Dataset) -> Result<(), DataError> {
        self.datasets
            .write()
            .insert(dataset.id().to_string(), dataset.clone());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Dataset>, DataError> {
        Ok(self.datasets.read().values().cloned().collect())
    }

    fn delete(&self, id: &str) -> Result<(), DataError> {
        self.datasets.write().shift_remove(id);
        Ok(())
    }
}
