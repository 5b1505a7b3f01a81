//! Core functionality for the data visualization dashboard
//!
//! This crate provides the dataset and visualization model, the grid layout
//! allocator and the state manager that keeps both collections consistent.

pub mod dataset;
pub mod events;
pub mod layout;
pub mod registry;
pub mod state;
pub mod visualization;

use thiserror::Error;

// Re-export commonly used types
pub use dataset::{CellValue, ColumnKinds, DataRecord, Dataset, DatasetId, DatasetShape};
pub use events::EventBus;
pub use layout::{default_position, GridPosition, LayoutUpdate};
pub use registry::DatasetRegistry;
pub use state::{AppSettings, Dashboard, PersistedState, RemovedDataset};
pub use visualization::{ChartKind, ConfigEdit, VisualizationConfig, VisualizationId};

/// Errors raised by the dashboard state manager
///
/// Only creation and dataset reassignment reject calls; every other
/// operation on an unknown id is a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(DatasetId),

    #[error("Unknown visualization: {0}")]
    UnknownVisualization(VisualizationId),
}
