//! Grid layout allocation and reconciliation
//!
//! New visualizations are placed left-to-right, top-to-bottom, three per row
//! on a 12-column grid. Positions reported back by the grid surface after a
//! drag or resize replace the stored positions wholesale.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::visualization::{VisualizationConfig, VisualizationId};

/// Width of the dashboard grid in cells
pub const GRID_COLUMNS: u32 = 12;

/// Visualizations per row at default placement
pub const CELLS_PER_ROW: u32 = 3;

/// Default cell width in grid columns
pub const CELL_WIDTH: u32 = GRID_COLUMNS / CELLS_PER_ROW;

/// Default cell height in grid rows
pub const CELL_HEIGHT: u32 = 3;

/// Integer grid-cell placement of a visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Default for GridPosition {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: CELL_WIDTH,
            h: CELL_HEIGHT,
        }
    }
}

/// A position change reported by the grid surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutUpdate {
    pub id: VisualizationId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl LayoutUpdate {
    pub fn position(&self) -> GridPosition {
        GridPosition {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Default slot for the `n`th visualization (0-indexed)
///
/// This is a pure function of `n` and never inspects existing positions.
pub fn default_position(n: usize) -> GridPosition {
    let n = n as u32;
    GridPosition {
        x: (n % CELLS_PER_ROW) * CELL_WIDTH,
        y: (n / CELLS_PER_ROW) * CELL_HEIGHT,
        w: CELL_WIDTH,
        h: CELL_HEIGHT,
    }
}

/// Apply a batch of layout updates
///
/// Visualizations without an entry in `updates` are left untouched; if the
/// batch names an id twice, the first entry wins. Returns how many stored
/// positions changed.
pub fn reconcile(visualizations: &mut [VisualizationConfig], updates: &[LayoutUpdate]) -> usize {
    let mut by_id: AHashMap<VisualizationId, GridPosition> = AHashMap::with_capacity(updates.len());
    for update in updates {
        by_id.entry(update.id).or_insert_with(|| update.position());
    }

    let mut changed = 0;
    for viz in visualizations.iter_mut() {
        if let Some(position) = by_id.get(&viz.id) {
            if viz.layout != *position {
                viz.layout = *position;
                changed += 1;
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::visualization::ChartKind;

    fn viz(n: usize) -> VisualizationConfig {
        let ds = Dataset::new("ds", "test", vec!["a".into()], Vec::new());
        VisualizationConfig::with_defaults(&ds, ChartKind::Bar, default_position(n))
    }

    #[test]
    fn test_default_positions_fill_rows_of_three() {
        let coords: Vec<(u32, u32)> = (0..4).map(|n| {
            let p = default_position(n);
            assert_eq!((p.w, p.h), (4, 3));
            (p.x, p.y)
        }).collect();

        assert_eq!(coords, vec![(0, 0), (4, 0), (8, 0), (0, 3)]);
        assert_eq!(default_position(7), GridPosition { x: 4, y: 6, w: 4, h: 3 });
    }

    #[test]
    fn test_reconcile_updates_only_matching_ids() {
        let mut vizs = vec![viz(0), viz(1), viz(2)];
        let untouched = vizs[0].layout;
        let update = LayoutUpdate { id: vizs[1].id, x: 0, y: 9, w: 6, h: 2 };

        let changed = reconcile(&mut vizs, &[update]);

        assert_eq!(changed, 1);
        assert_eq!(vizs[0].layout, untouched);
        assert_eq!(vizs[1].layout, GridPosition { x: 0, y: 9, w: 6, h: 2 });
        assert_eq!(vizs[2].layout, default_position(2));
    }

    #[test]
    fn test_reconcile_ignores_unknown_ids() {
        let mut vizs = vec![viz(0)];
        let update = LayoutUpdate { id: uuid::Uuid::new_v4(), x: 1, y: 1, w: 1, h: 1 };

        assert_eq!(reconcile(&mut vizs, &[update]), 0);
        assert_eq!(vizs[0].layout, default_position(0));
    }
}
