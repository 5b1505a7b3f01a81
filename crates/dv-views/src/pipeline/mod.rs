//! Data transform pipeline
//!
//! Turns a dataset plus a visualization configuration into at most
//! [`MAX_DATA_POINTS`] render-ready records. Every function here is pure: the
//! same inputs always give value-equal output.

mod aggregate;

use dv_core::{ColumnKinds, DataRecord, Dataset, VisualizationConfig};

pub use aggregate::aggregate;

/// Upper bound on rows handed to the renderer before aggregation
pub const MAX_DATA_POINTS: usize = 500;

/// Row-index spacing used to bound `row_count` rows to [`MAX_DATA_POINTS`]
pub fn sampling_stride(row_count: usize) -> usize {
    if row_count <= MAX_DATA_POINTS {
        1
    } else {
        row_count.div_ceil(MAX_DATA_POINTS)
    }
}

/// Rows at indices `0, stride, 2 * stride, ...` in original order
pub fn sample(rows: &[DataRecord]) -> impl Iterator<Item = &DataRecord> + '_ {
    rows.iter().step_by(sampling_stride(rows.len()))
}

/// Keep only `columns` of `row`; columns the row lacks are omitted
pub fn project(row: &DataRecord, columns: &[String]) -> DataRecord {
    columns
        .iter()
        .filter_map(|col| row.get(col).map(|value| (col.clone(), value.clone())))
        .collect()
}

/// Transform raw rows, classifying columns from the first row
pub fn transform(rows: &[DataRecord], columns: &[String], config: &VisualizationConfig) -> Vec<DataRecord> {
    let kinds = ColumnKinds::classify(columns, rows);
    transform_with_kinds(rows, columns, &kinds, config)
}

/// Transform a dataset using its cached column kinds
pub fn transform_dataset(dataset: &Dataset, config: &VisualizationConfig) -> Vec<DataRecord> {
    transform_with_kinds(dataset.data(), dataset.columns(), dataset.column_kinds(), config)
}

/// Sample, then either project (numeric x axis) or aggregate (categorical x axis)
///
/// Without an x axis or any y series the sampled rows are returned whole.
pub fn transform_with_kinds(
    rows: &[DataRecord],
    columns: &[String],
    kinds: &ColumnKinds,
    config: &VisualizationConfig,
) -> Vec<DataRecord> {
    let x_axis = match config.x_axis.as_deref() {
        Some(x) if config.is_configured() => x,
        _ => return sample(rows).cloned().collect(),
    };

    if kinds.is_numeric(x_axis) {
        let keep = config.projected_columns(columns);
        sample(rows).map(|row| project(row, keep)).collect()
    } else {
        aggregate(sample(rows), x_axis, &config.y_axis)
    }
}
