//! Memoization of pipeline output

use std::sync::Arc;

use ahash::AHashMap;
use dv_core::{DataRecord, Dataset, DatasetId, VisualizationConfig};
use parking_lot::RwLock;

use crate::pipeline;

/// Inputs the pipeline output depends on, besides the immutable dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    dataset_id: DatasetId,
    x_axis: Option<String>,
    y_axis: Vec<String>,
    enabled_columns: Option<Vec<String>>,
}

impl CacheKey {
    fn new(config: &VisualizationConfig) -> Self {
        Self {
            dataset_id: config.dataset_id.clone(),
            x_axis: config.x_axis.clone(),
            y_axis: config.y_axis.clone(),
            enabled_columns: config.enabled_columns.clone(),
        }
    }
}

/// Pipeline results keyed by input value
///
/// Datasets never change after import, so an entry stays valid until its
/// dataset is removed. Clones share the same entries.
#[derive(Clone)]
pub struct PipelineCache {
    entries: Arc<RwLock<AHashMap<CacheKey, Arc<Vec<DataRecord>>>>>,
    max_entries: usize,
}

impl PipelineCache {
    /// Create a new cache holding at most `max_entries` results
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(AHashMap::new())),
            max_entries: max_entries.max(1),
        }
    }

    /// Pipeline output for `config` over `dataset`, computed at most once
    pub fn get_or_compute(&self, dataset: &Dataset, config: &VisualizationConfig) -> Arc<Vec<DataRecord>> {
        let key = CacheKey::new(config);
        if let Some(rows) = self.entries.read().get(&key) {
            return rows.clone();
        }

        let rows = Arc::new(pipeline::transform_dataset(dataset, config));
        let mut entries = self.entries.write();

        // Evict an arbitrary entry at capacity
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            if let Some(victim) = entries.keys().next().cloned() {
                entries.remove(&victim);
            }
        }

        entries.insert(key, rows.clone());
        rows
    }

    /// Drop every entry computed from `dataset_id`
    pub fn invalidate_dataset(&self, dataset_id: &str) {
        self.entries.write().retain(|key, _| key.dataset_id != dataset_id);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new(256)
    }
}
