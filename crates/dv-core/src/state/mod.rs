//! Dashboard state management
//!
//! `Dashboard` owns the dataset registry, the ordered visualization list and
//! the dataset selection. Every visualization refers to a live dataset: the
//! registry and the visualization list are only ever changed together inside
//! a single `&mut self` call, and events go out once the call has finished.

mod settings;

use std::sync::Arc;

use tracing::debug;

use crate::dataset::{Dataset, DatasetId};
use crate::events::events::{
    DatasetAdded, DatasetRemoved, LayoutReconciled, SelectionChanged, VisualizationAdded,
    VisualizationRemoved, VisualizationUpdated,
};
use crate::events::EventBus;
use crate::layout::{self, LayoutUpdate};
use crate::registry::DatasetRegistry;
use crate::visualization::{ChartKind, ConfigEdit, VisualizationConfig, VisualizationId};
use crate::DashboardError;

pub use settings::{AppSettings, PersistedState};

/// What a cascade delete took out of the dashboard
#[derive(Debug, Clone)]
pub struct RemovedDataset {
    pub dataset: Arc<Dataset>,
    pub visualizations: Vec<VisualizationConfig>,
}

/// The visualization state manager
#[derive(Debug)]
pub struct Dashboard {
    registry: DatasetRegistry,
    visualizations: Vec<VisualizationConfig>,
    selected: Option<DatasetId>,
    event_bus: Arc<EventBus>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Arc::new(EventBus::new()))
    }
}

impl Dashboard {
    /// Create an empty dashboard publishing on `event_bus`
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            registry: DatasetRegistry::new(),
            visualizations: Vec::new(),
            selected: None,
            event_bus,
        }
    }

    /// Replace the whole state, e.g. when restoring a previous session
    ///
    /// Visualizations whose dataset is not in `datasets` are dropped and a
    /// selection that no longer resolves falls back to the first dataset.
    pub fn restore(
        &mut self,
        datasets: Vec<Dataset>,
        visualizations: Vec<VisualizationConfig>,
        selected: Option<DatasetId>,
    ) {
        let mut registry = DatasetRegistry::new();
        for dataset in datasets {
            registry.add(dataset);
        }

        let total = visualizations.len();
        let mut kept: Vec<VisualizationConfig> = Vec::with_capacity(total);
        for viz in visualizations {
            if registry.contains(&viz.dataset_id) && !kept.iter().any(|v| v.id == viz.id) {
                kept.push(viz);
            }
        }
        if kept.len() != total {
            debug!("Dropped {} restored visualizations without a live dataset", total - kept.len());
        }

        let selected = match selected {
            Some(id) if registry.contains(&id) => Some(id),
            _ => registry.first().map(|d| d.id().to_string()),
        };

        self.registry = registry;
        self.visualizations = kept;
        self.selected = selected;
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn datasets(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn dataset(&self, id: &str) -> Option<&Arc<Dataset>> {
        self.registry.get(id)
    }

    /// Visualizations in creation order
    pub fn visualizations(&self) -> &[VisualizationConfig] {
        &self.visualizations
    }

    pub fn visualization(&self, id: VisualizationId) -> Option<&VisualizationConfig> {
        self.visualizations.iter().find(|v| v.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_dataset(&self) -> Option<&Arc<Dataset>> {
        self.selected.as_deref().and_then(|id| self.registry.get(id))
    }

    /// Register a dataset; returns `false` if its id was already present
    pub fn add_dataset(&mut self, dataset: Dataset) -> bool {
        let event = DatasetAdded {
            id: dataset.id().to_string(),
            name: dataset.name().to_string(),
            rows: dataset.shape().rows,
            columns: dataset.shape().columns,
        };

        if !self.registry.add(dataset) {
            debug!("Dataset {} already registered", event.id);
            return false;
        }

        debug!("Registered dataset {} ({} rows)", event.id, event.rows);
        self.event_bus.publish(event);
        true
    }

    /// Select a dataset, or clear the selection with `None`
    ///
    /// Selecting an unknown id is refused and leaves the selection as is.
    pub fn select_dataset(&mut self, id: Option<&str>) -> bool {
        if let Some(id) = id {
            if !self.registry.contains(id) {
                return false;
            }
        }

        let selected = id.map(str::to_string);
        if self.selected != selected {
            self.selected = selected.clone();
            self.event_bus.publish(SelectionChanged { selected });
        }
        true
    }

    /// Add a bar chart over `dataset_id`
    pub fn add_visualization(&mut self, dataset_id: &str) -> Result<VisualizationConfig, DashboardError> {
        self.add_visualization_with(dataset_id, ChartKind::Bar)
    }

    /// Add a chart of `kind` over `dataset_id` at the next default slot
    pub fn add_visualization_with(
        &mut self,
        dataset_id: &str,
        kind: ChartKind,
    ) -> Result<VisualizationConfig, DashboardError> {
        let dataset = self
            .registry
            .get(dataset_id)
            .ok_or_else(|| DashboardError::UnknownDataset(dataset_id.to_string()))?;

        let position = layout::default_position(self.visualizations.len());
        let config = VisualizationConfig::with_defaults(dataset, kind, position);
        self.visualizations.push(config.clone());

        debug!("Added {:?} visualization {} over {}", kind, config.id, dataset_id);
        self.event_bus.publish(VisualizationAdded {
            id: config.id,
            dataset_id: dataset_id.to_string(),
        });
        Ok(config)
    }

    /// Remove a visualization; unknown ids are a no-op
    pub fn remove_visualization(&mut self, id: VisualizationId) -> Option<VisualizationConfig> {
        let pos = self.visualizations.iter().position(|v| v.id == id)?;
        let removed = self.visualizations.remove(pos);

        self.event_bus.publish(VisualizationRemoved { id });
        Some(removed)
    }

    /// Replace the chart kind, axes and column filter of a visualization
    ///
    /// The id and dataset binding are never touched here. Returns `false` for
    /// unknown ids.
    pub fn update_config(&mut self, id: VisualizationId, edit: ConfigEdit) -> bool {
        let Some(viz) = self.visualizations.iter_mut().find(|v| v.id == id) else {
            return false;
        };
        viz.apply(edit);

        self.event_bus.publish(VisualizationUpdated { id });
        true
    }

    /// Bind a visualization to another dataset, resetting its axes
    pub fn reassign_dataset(
        &mut self,
        id: VisualizationId,
        dataset_id: &str,
    ) -> Result<&VisualizationConfig, DashboardError> {
        let dataset = self
            .registry
            .get(dataset_id)
            .ok_or_else(|| DashboardError::UnknownDataset(dataset_id.to_string()))?;
        let pos = self
            .visualizations
            .iter()
            .position(|v| v.id == id)
            .ok_or(DashboardError::UnknownVisualization(id))?;

        self.visualizations[pos].reset_axes(dataset);

        debug!("Visualization {} now reads dataset {}", id, dataset_id);
        self.event_bus.publish(VisualizationUpdated { id });
        Ok(&self.visualizations[pos])
    }

    /// Toggle one column in a visualization's display filter
    pub fn toggle_column(&mut self, id: VisualizationId, column: &str) -> bool {
        self.edit_filter(id, |viz, columns| viz.toggle_column(column, columns))
    }

    /// Enable every column of the visualization's dataset
    pub fn select_all_columns(&mut self, id: VisualizationId) -> bool {
        self.edit_filter(id, |viz, columns| viz.enabled_columns = Some(columns.to_vec()))
    }

    /// Disable every column; the chart then shows no series
    pub fn unselect_all_columns(&mut self, id: VisualizationId) -> bool {
        self.edit_filter(id, |viz, _| viz.enabled_columns = Some(Vec::new()))
    }

    fn edit_filter<F>(&mut self, id: VisualizationId, f: F) -> bool
    where
        F: FnOnce(&mut VisualizationConfig, &[String]),
    {
        let Some(viz) = self.visualizations.iter_mut().find(|v| v.id == id) else {
            return false;
        };
        let Some(dataset) = self.registry.get(&viz.dataset_id) else {
            return false;
        };

        let mut edited = viz.clone();
        f(&mut edited, dataset.columns());
        viz.apply(edited.edit());

        self.event_bus.publish(VisualizationUpdated { id });
        true
    }

    /// Apply positions reported by the grid surface
    pub fn apply_layout(&mut self, updates: &[LayoutUpdate]) -> usize {
        let updated = layout::reconcile(&mut self.visualizations, updates);
        if updated > 0 {
            self.event_bus.publish(LayoutReconciled { updated });
        }
        updated
    }

    /// Delete a dataset together with every visualization bound to it
    ///
    /// If the dataset was selected, the selection moves to the first
    /// remaining dataset, or to none. Unknown ids are a no-op.
    pub fn remove_dataset(&mut self, id: &str) -> Option<RemovedDataset> {
        let dataset = self.registry.remove(id)?;

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.visualizations)
            .into_iter()
            .partition(|v| v.dataset_id == id);
        self.visualizations = kept;

        let selection_changed = self.selected.as_deref() == Some(id);
        if selection_changed {
            self.selected = self.registry.first().map(|d| d.id().to_string());
        }

        debug!("Removed dataset {} and {} visualizations", id, removed.len());
        self.event_bus.publish(DatasetRemoved {
            id: id.to_string(),
            removed_visualizations: removed.iter().map(|v| v.id).collect(),
        });
        if selection_changed {
            self.event_bus.publish(SelectionChanged {
                selected: self.selected.clone(),
            });
        }

        Some(RemovedDataset {
            dataset,
            visualizations: removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, DataRecord};
    use crate::layout::GridPosition;
    use parking_lot::Mutex;

    fn dataset(id: &str, columns: &[&str], first: &[CellValue]) -> Dataset {
        let columns: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        let row: DataRecord = columns.iter().cloned().zip(first.iter().cloned()).collect();
        Dataset::new(id, id, columns, vec![row])
    }

    fn sales(id: &str) -> Dataset {
        dataset(id, &["Month", "Region", "Sales"], &["Jan".into(), "North".into(), 245.0.into()])
    }

    fn names(id: &str) -> Dataset {
        dataset(id, &["Name", "City"], &["Ada".into(), "London".into()])
    }

    #[test]
    fn test_add_visualization_requires_live_dataset() {
        let mut dashboard = Dashboard::default();

        assert_eq!(
            dashboard.add_visualization("missing"),
            Err(DashboardError::UnknownDataset("missing".into()))
        );
        assert!(dashboard.visualizations().is_empty());
    }

    #[test]
    fn test_add_visualization_derives_defaults_and_slot() {
        let mut dashboard = Dashboard::default();
        dashboard.add_dataset(sales("s"));

        let first = dashboard.add_visualization("s").unwrap();
        let second = dashboard.add_visualization("s").unwrap();

        assert_eq!(first.kind, ChartKind::Bar);
        assert_eq!(first.x_axis.as_deref(), Some("Month"));
        assert_eq!(first.y_axis, vec!["Sales".to_string()]);
        assert_eq!(first.layout, GridPosition { x: 0, y: 0, w: 4, h: 3 });
        assert_eq!(second.layout, GridPosition { x: 4, y: 0, w: 4, h: 3 });
    }

    #[test]
    fn test_remove_visualization_is_idempotent() {
        let mut dashboard = Dashboard::default();
        dashboard.add_dataset(sales("s"));
        let viz = dashboard.add_visualization("s").unwrap();

        assert!(dashboard.remove_visualization(viz.id).is_some());
        assert!(dashboard.remove_visualization(viz.id).is_none());
        assert!(dashboard.visualizations().is_empty());
    }

    #[test]
    fn test_update_config_keeps_identity() {
        let mut dashboard = Dashboard::default();
        dashboard.add_dataset(sales("s"));
        let viz = dashboard.add_visualization("s").unwrap();

        let edit = ConfigEdit {
            kind: ChartKind::Pie,
            x_axis: Some("Region".into()),
            y_axis: vec!["Sales".into(), "Month".into()],
            enabled_columns: None,
        };
        assert!(dashboard.update_config(viz.id, edit));

        let updated = dashboard.visualization(viz.id).unwrap();
        assert_eq!(updated.kind, ChartKind::Pie);
        assert_eq!(updated.dataset_id, "s");
        assert_eq!(updated.layout, viz.layout);
        assert!(!dashboard.update_config(VisualizationId::new_v4(), ConfigEdit::default()));
    }

    #[test]
    fn test_reassign_resets_axes_from_new_dataset() {
        let mut dashboard = Dashboard::default();
        dashboard.add_dataset(sales("s"));
        dashboard.add_dataset(names("n"));
        let viz = dashboard.add_visualization("s").unwrap();

        let reassigned = dashboard.reassign_dataset(viz.id, "n").unwrap();
        assert_eq!(reassigned.dataset_id, "n");
        assert_eq!(reassigned.x_axis.as_deref(), Some("Name"));
        assert_eq!(reassigned.y_axis, vec!["Name".to_string()]);

        assert_eq!(
            dashboard.reassign_dataset(viz.id, "gone").unwrap_err(),
            DashboardError::UnknownDataset("gone".into())
        );
    }

    #[test]
    fn test_remove_dataset_cascades_and_moves_selection() {
        let mut dashboard = Dashboard::default();
        dashboard.add_dataset(sales("a"));
        dashboard.add_dataset(sales("b"));
        dashboard.add_visualization("a").unwrap();
        let kept = dashboard.add_visualization("b").unwrap();
        dashboard.add_visualization("a").unwrap();
        dashboard.select_dataset(Some("a"));

        let removed = dashboard.remove_dataset("a").unwrap();

        assert_eq!(removed.visualizations.len(), 2);
        assert!(!dashboard.datasets().contains("a"));
        assert!(dashboard.visualizations().iter().all(|v| v.dataset_id != "a"));
        assert_eq!(dashboard.visualizations(), &[kept]);
        assert_eq!(dashboard.selected_id(), Some("b"));

        dashboard.remove_dataset("b");
        assert_eq!(dashboard.selected_id(), None);
        assert!(dashboard.remove_dataset("b").is_none());
    }

    #[test]
    fn test_observers_never_see_dangling_visualizations() {
        let bus = Arc::new(EventBus::new());
        let mut dashboard = Dashboard::new(bus.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.on::<DatasetRemoved, _>(move |e| sink.lock().push(e.removed_visualizations.len()));

        dashboard.add_dataset(sales("a"));
        dashboard.add_visualization("a").unwrap();
        dashboard.remove_dataset("a");

        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn test_column_filter_edits() {
        let mut dashboard = Dashboard::default();
        dashboard.add_dataset(sales("s"));
        let viz = dashboard.add_visualization("s").unwrap();

        assert!(dashboard.toggle_column(viz.id, "Sales"));
        assert!(dashboard.visualization(viz.id).unwrap().active_series().is_empty());

        assert!(dashboard.select_all_columns(viz.id));
        assert_eq!(dashboard.visualization(viz.id).unwrap().active_series(), vec!["Sales".to_string()]);

        assert!(dashboard.unselect_all_columns(viz.id));
        assert_eq!(dashboard.visualization(viz.id).unwrap().enabled_columns, Some(Vec::new()));
    }

    #[test]
    fn test_restore_drops_dangling_visualizations() {
        let mut source = Dashboard::default();
        source.add_dataset(sales("a"));
        source.add_dataset(sales("b"));
        source.add_visualization("a").unwrap();
        let kept = source.add_visualization("b").unwrap();
        let configs = source.visualizations().to_vec();

        let mut dashboard = Dashboard::default();
        dashboard.restore(vec![sales("b")], configs, Some("a".into()));

        assert_eq!(dashboard.visualizations(), &[kept]);
        assert_eq!(dashboard.selected_id(), Some("b"));
    }

    #[test]
    fn test_select_unknown_dataset_is_refused() {
        let mut dashboard = Dashboard::default();
        dashboard.add_dataset(sales("a"));

        assert!(dashboard.select_dataset(Some("a")));
        assert!(!dashboard.select_dataset(Some("zzz")));
        assert_eq!(dashboard.selected_id(), Some("a"));
        assert!(dashboard.select_dataset(None));
        assert_eq!(dashboard.selected_id(), None);
    }
}
