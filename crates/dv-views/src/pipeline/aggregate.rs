//! Grouping of sampled rows by a categorical x axis

use dv_core::{CellValue, DataRecord};
use indexmap::IndexMap;

/// Running totals for one x-axis value
#[derive(Debug, Clone)]
struct Bucket {
    /// Sum of numeric values, per y column
    sums: Vec<f64>,
    /// Rows assigned to this key, whatever their y values hold
    count: usize,
}

impl Bucket {
    fn new(series: usize) -> Self {
        Self {
            sums: vec![0.0; series],
            count: 0,
        }
    }

    /// Mean when the sum is positive, otherwise the row count
    fn value(&self, series: usize) -> f64 {
        let sum = self.sums[series];
        if sum > 0.0 {
            sum / self.count as f64
        } else {
            self.count as f64
        }
    }
}

/// Group `rows` by the text form of `x_axis`, one output record per group
///
/// Groups appear in first-seen order. Each record holds the group key under
/// `x_axis` and, for every `y_axis` column, the mean of its numeric values
/// over all rows in the group, or the group's row count when that sum is not
/// strictly positive. Rows without an `x_axis` cell group under `""`.
pub fn aggregate<'a, I>(rows: I, x_axis: &str, y_axis: &[String]) -> Vec<DataRecord>
where
    I: IntoIterator<Item = &'a DataRecord>,
{
    let mut buckets: IndexMap<String, Bucket> = IndexMap::new();

    for row in rows {
        let key = row.get(x_axis).map(CellValue::to_string).unwrap_or_default();
        let bucket = buckets.entry(key).or_insert_with(|| Bucket::new(y_axis.len()));

        for (i, y) in y_axis.iter().enumerate() {
            if let Some(n) = row.get(y).and_then(CellValue::as_number) {
                bucket.sums[i] += n;
            }
        }
        bucket.count += 1;
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| {
            let mut record = DataRecord::with_capacity(y_axis.len() + 1);
            record.insert(x_axis.to_string(), CellValue::Text(key));
            for (i, y) in y_axis.iter().enumerate() {
                record.insert(y.clone(), CellValue::Number(bucket.value(i)));
            }
            record
        })
        .collect()
}
