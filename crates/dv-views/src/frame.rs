//! Render surface contract
//!
//! A `RenderFrame` is everything the chart library needs to draw one
//! visualization: chart kind, rows, active series and grid placement.

use dv_core::{ChartKind, DataRecord, Dataset, GridPosition, VisualizationConfig, VisualizationId};
use serde::Serialize;

use crate::cache::PipelineCache;

/// Maximum slices drawn by a pie chart
pub const PIE_SLICE_LIMIT: usize = 20;

/// Whether a frame has something to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameStatus {
    Ready,
    /// No x axis or no y series configured
    Unconfigured,
    /// Every y series is hidden by the column filter
    NoActiveSeries,
}

impl FrameStatus {
    /// Placeholder text shown instead of a chart
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FrameStatus::Ready => None,
            FrameStatus::Unconfigured => Some("Click settings to configure axes"),
            FrameStatus::NoActiveSeries => Some("No columns selected for display"),
        }
    }
}

/// Render-ready view of one visualization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub visualization_id: VisualizationId,
    pub dataset_name: String,
    pub chart: ChartKind,
    pub x_axis: Option<String>,
    /// `y_axis` entries that pass the column filter
    pub series: Vec<String>,
    pub rows: Vec<DataRecord>,
    pub position: GridPosition,
    pub status: FrameStatus,
}

impl RenderFrame {
    /// Build the frame for `config`, reusing cached pipeline output
    pub fn build(dataset: &Dataset, config: &VisualizationConfig, cache: &PipelineCache) -> Self {
        let rows = cache.get_or_compute(dataset, config);
        let series = config.active_series();

        let status = if !config.is_configured() {
            FrameStatus::Unconfigured
        } else if series.is_empty() {
            FrameStatus::NoActiveSeries
        } else {
            FrameStatus::Ready
        };

        let limit = match config.kind {
            ChartKind::Pie => PIE_SLICE_LIMIT,
            _ => rows.len(),
        };

        Self {
            visualization_id: config.id,
            dataset_name: dataset.name().to_string(),
            chart: config.kind,
            x_axis: config.x_axis.clone(),
            series,
            rows: rows.iter().take(limit).cloned().collect(),
            position: config.layout,
            status,
        }
    }
}
