//! In-memory registry of imported datasets

use std::sync::Arc;

use indexmap::IndexMap;

use crate::dataset::{Dataset, DatasetId};

/// Ordered collection of live datasets, keyed by id
///
/// Iteration follows insertion order, which is also the order the sidebar
/// lists datasets in and the order selection falls back through.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: IndexMap<DatasetId, Arc<Dataset>>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset
    ///
    /// Returns `false` and keeps the existing entry when the id is already
    /// registered, so reloading a fixed-identity dataset is idempotent.
    pub fn add(&mut self, dataset: Dataset) -> bool {
        if self.datasets.contains_key(dataset.id()) {
            return false;
        }
        self.datasets.insert(dataset.id().to_string(), Arc::new(dataset));
        true
    }

    /// Remove a dataset, keeping the order of the others
    pub fn remove(&mut self, id: &str) -> Option<Arc<Dataset>> {
        self.datasets.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Dataset>> {
        self.datasets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.datasets.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Dataset>> {
        self.datasets.values()
    }

    pub fn first(&self) -> Option<&Arc<Dataset>> {
        self.datasets.values().next()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(id: &str) -> Dataset {
        Dataset::new(id, id, vec!["a".into()], Vec::new())
    }

    #[test]
    fn test_add_is_idempotent_by_id() {
        let mut registry = DatasetRegistry::new();

        assert!(registry.add(ds("mock-data")));
        assert!(!registry.add(ds("mock-data")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut registry = DatasetRegistry::new();
        for id in ["a", "b", "c"] {
            registry.add(ds(id));
        }

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());

        let ids: Vec<&str> = registry.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
