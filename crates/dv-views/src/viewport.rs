//! Viewport - produces render frames for every visualization on a dashboard

use dv_core::events::events::DatasetRemoved;
use dv_core::{Dashboard, EventBus, VisualizationId};
use tracing::debug;

use crate::cache::PipelineCache;
use crate::frame::RenderFrame;

/// Bridges the dashboard state to the render surface
#[derive(Clone, Default)]
pub struct Viewport {
    cache: PipelineCache,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: PipelineCache) -> Self {
        Self { cache }
    }

    /// Drop cached rows whenever a dataset is removed from `event_bus`
    pub fn watch(&self, event_bus: &EventBus) {
        let cache = self.cache.clone();
        event_bus.on::<DatasetRemoved, _>(move |event| {
            debug!("Invalidating cached rows for dataset {}", event.id);
            cache.invalidate_dataset(&event.id);
        });
    }

    pub fn cache(&self) -> &PipelineCache {
        &self.cache
    }

    /// Frames for all visualizations, in dashboard order
    pub fn frames(&self, dashboard: &Dashboard) -> Vec<RenderFrame> {
        dashboard
            .visualizations()
            .iter()
            .filter_map(|viz| {
                let dataset = dashboard.dataset(&viz.dataset_id)?;
                Some(RenderFrame::build(dataset, viz, &self.cache))
            })
            .collect()
    }

    /// Frame for one visualization
    pub fn frame(&self, dashboard: &Dashboard, id: VisualizationId) -> Option<RenderFrame> {
        let viz = dashboard.visualization(id)?;
        let dataset = dashboard.dataset(&viz.dataset_id)?;
        Some(RenderFrame::build(dataset, viz, &self.cache))
    }
}
