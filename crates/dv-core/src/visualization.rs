//! Visualization configurations bound to a dataset

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dataset::{Dataset, DatasetId};
use crate::layout::GridPosition;

/// Unique identifier for a visualization
pub type VisualizationId = Uuid;

/// Chart kinds the render surface knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    #[default]
    Bar,
    Area,
    Pie,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Area,
        ChartKind::Pie,
        ChartKind::Scatter,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Area => "Area Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Scatter => "Scatter Plot",
        }
    }
}

/// Persisted settings of one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationConfig {
    pub id: VisualizationId,

    /// Dataset backing this chart; always refers to a live dataset
    pub dataset_id: DatasetId,

    #[serde(rename = "type")]
    pub kind: ChartKind,

    /// Horizontal axis column
    #[serde(default)]
    pub x_axis: Option<String>,

    /// Series columns, in legend order
    #[serde(default)]
    pub y_axis: Vec<String>,

    /// Display filter over columns; `None` shows everything
    #[serde(default)]
    pub enabled_columns: Option<Vec<String>>,

    pub layout: GridPosition,
}

/// The user-editable part of a configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigEdit {
    pub kind: ChartKind,
    pub x_axis: Option<String>,
    pub y_axis: Vec<String>,
    pub enabled_columns: Option<Vec<String>>,
}

impl VisualizationConfig {
    /// Create a configuration with axis defaults derived from `dataset`
    pub fn with_defaults(dataset: &Dataset, kind: ChartKind, layout: GridPosition) -> Self {
        let mut config = Self {
            id: Uuid::new_v4(),
            dataset_id: dataset.id().to_string(),
            kind,
            x_axis: None,
            y_axis: Vec::new(),
            enabled_columns: None,
            layout,
        };
        config.reset_axes(dataset);
        config
    }

    /// Point the chart at `dataset` and re-derive its axes
    ///
    /// `x_axis` becomes the first column, `y_axis` the first numeric column
    /// (or the first column when none is numeric) and every column is enabled.
    pub fn reset_axes(&mut self, dataset: &Dataset) {
        let columns = dataset.columns();
        let y = dataset
            .column_kinds()
            .first_numeric()
            .map(str::to_string)
            .or_else(|| columns.first().cloned());

        self.dataset_id = dataset.id().to_string();
        self.x_axis = columns.first().cloned();
        self.y_axis = y.into_iter().collect();
        self.enabled_columns = Some(columns.to_vec());
    }

    /// Replace the mutable fields wholesale
    pub fn apply(&mut self, edit: ConfigEdit) {
        self.kind = edit.kind;
        self.x_axis = edit.x_axis;
        self.y_axis = edit.y_axis;
        self.enabled_columns = edit.enabled_columns;
    }

    /// Snapshot of the mutable fields, for editing
    pub fn edit(&self) -> ConfigEdit {
        ConfigEdit {
            kind: self.kind,
            x_axis: self.x_axis.clone(),
            y_axis: self.y_axis.clone(),
            enabled_columns: self.enabled_columns.clone(),
        }
    }

    /// A non-empty x axis and at least one y series are set
    pub fn is_configured(&self) -> bool {
        self.x_axis.as_deref().is_some_and(|x| !x.is_empty()) && !self.y_axis.is_empty()
    }

    /// Series that pass the column filter, in `y_axis` order
    pub fn active_series(&self) -> Vec<String> {
        match &self.enabled_columns {
            Some(enabled) => self
                .y_axis
                .iter()
                .filter(|y| enabled.contains(*y))
                .cloned()
                .collect(),
            None => self.y_axis.clone(),
        }
    }

    /// Columns kept when rows are projected; an unset or empty filter keeps all
    pub fn projected_columns<'a>(&'a self, columns: &'a [String]) -> &'a [String] {
        match &self.enabled_columns {
            Some(enabled) if !enabled.is_empty() => enabled.as_slice(),
            _ => columns,
        }
    }

    /// Flip one column in the display filter
    pub fn toggle_column(&mut self, column: &str, all_columns: &[String]) {
        let mut enabled = self
            .enabled_columns
            .take()
            .unwrap_or_else(|| all_columns.to_vec());

        if let Some(pos) = enabled.iter().position(|c| c == column) {
            enabled.remove(pos);
        } else {
            enabled.push(column.to_string());
        }
        self.enabled_columns = Some(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, DataRecord};

    fn dataset(columns: &[&str], first: &[CellValue]) -> Dataset {
        let columns: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        let row: DataRecord = columns.iter().cloned().zip(first.iter().cloned()).collect();
        Dataset::new("ds", "test", columns, vec![row])
    }

    #[test]
    fn test_defaults_pick_first_numeric_column() {
        let ds = dataset(&["Month", "Region", "Sales"], &["Jan".into(), "N".into(), 10.0.into()]);
        let config = VisualizationConfig::with_defaults(&ds, ChartKind::Bar, GridPosition::default());

        assert_eq!(config.x_axis.as_deref(), Some("Month"));
        assert_eq!(config.y_axis, vec!["Sales".to_string()]);
        assert_eq!(config.enabled_columns.as_deref(), Some(ds.columns()));
    }

    #[test]
    fn test_defaults_fall_back_to_first_column() {
        let ds = dataset(&["Name", "City"], &["a".into(), "b".into()]);
        let config = VisualizationConfig::with_defaults(&ds, ChartKind::Line, GridPosition::default());

        assert_eq!(config.y_axis, vec!["Name".to_string()]);
    }

    #[test]
    fn test_active_series_respects_filter() {
        let ds = dataset(&["x", "a", "b"], &["k".into(), 1.0.into(), 2.0.into()]);
        let mut config = VisualizationConfig::with_defaults(&ds, ChartKind::Bar, GridPosition::default());
        config.y_axis = vec!["a".into(), "b".into()];
        config.toggle_column("a", ds.columns());

        assert_eq!(config.active_series(), vec!["b".to_string()]);
        // The filter never rewrites the stored series
        assert_eq!(config.y_axis.len(), 2);
    }

    #[test]
    fn test_empty_filter_projects_all_but_shows_no_series() {
        let ds = dataset(&["x", "a"], &["k".into(), 1.0.into()]);
        let mut config = VisualizationConfig::with_defaults(&ds, ChartKind::Bar, GridPosition::default());
        config.enabled_columns = Some(Vec::new());

        assert_eq!(config.projected_columns(ds.columns()), ds.columns());
        assert!(config.active_series().is_empty());
    }

    #[test]
    fn test_blank_x_axis_is_unconfigured() {
        let ds = dataset(&["x", "a"], &["k".into(), 1.0.into()]);
        let mut config = VisualizationConfig::with_defaults(&ds, ChartKind::Bar, GridPosition::default());
        assert!(config.is_configured());

        config.x_axis = Some(String::new());
        assert!(!config.is_configured());

        config.x_axis = None;
        assert!(!config.is_configured());
    }

    #[test]
    fn test_serialized_field_names() {
        let ds = dataset(&["x"], &["k".into()]);
        let config = VisualizationConfig::with_defaults(&ds, ChartKind::Pie, GridPosition::default());
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["type"], "pie");
        assert_eq!(value["datasetId"], "ds");
        assert!(value.get("enabledColumns").is_some());
    }
}
