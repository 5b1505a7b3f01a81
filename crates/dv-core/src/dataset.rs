//! Tabular datasets with tagged cell values

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Unique identifier for a dataset
pub type DatasetId = String;

/// A single table cell: either numeric or textual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric payload, if this cell is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral values print without a trailing ".0" so "3" and 3.0 group together
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One row of a dataset, keyed by column name in column order
pub type DataRecord = IndexMap<String, CellValue>;

/// Row and column counts of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetShape {
    pub rows: usize,
    pub columns: usize,
}

/// Numeric/non-numeric classification of a dataset's columns
///
/// A column is numeric when its value in the first row is numeric. Empty
/// datasets have no numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnKinds {
    numeric: Vec<String>,
}

impl ColumnKinds {
    /// Classify `columns` against the first row of `data`
    pub fn classify(columns: &[String], data: &[DataRecord]) -> Self {
        let numeric = match data.first() {
            Some(first) => columns
                .iter()
                .filter(|col| first.get(*col).map(CellValue::is_numeric).unwrap_or(false))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        Self { numeric }
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    /// Numeric columns in dataset column order
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric
    }

    pub fn first_numeric(&self) -> Option<&str> {
        self.numeric.first().map(String::as_str)
    }
}

/// An imported, immutable table
///
/// Column kinds are computed once at construction and cached alongside the
/// rows; they are never re-derived per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DatasetRepr")]
pub struct Dataset {
    id: DatasetId,
    name: String,
    columns: Vec<String>,
    data: Vec<DataRecord>,
    shape: DatasetShape,
    #[serde(skip)]
    kinds: ColumnKinds,
}

/// Serialized form of a dataset, without the derived column kinds
#[derive(Deserialize)]
struct DatasetRepr {
    id: DatasetId,
    name: String,
    columns: Vec<String>,
    data: Vec<DataRecord>,
}

impl From<DatasetRepr> for Dataset {
    fn from(repr: DatasetRepr) -> Self {
        Dataset::new(repr.id, repr.name, repr.columns, repr.data)
    }
}

impl Dataset {
    /// Create a dataset, deriving its shape and column kinds
    pub fn new(
        id: impl Into<DatasetId>,
        name: impl Into<String>,
        columns: Vec<String>,
        data: Vec<DataRecord>,
    ) -> Self {
        let shape = DatasetShape {
            rows: data.len(),
            columns: columns.len(),
        };
        let kinds = ColumnKinds::classify(&columns, &data);

        Self {
            id: id.into(),
            name: name.into(),
            columns,
            data,
            shape,
            kinds,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &[DataRecord] {
        &self.data
    }

    pub fn shape(&self) -> DatasetShape {
        self.shape
    }

    pub fn column_kinds(&self) -> &ColumnKinds {
        &self.kinds
    }

    /// First rows of the table for a preview pane
    pub fn preview(&self, rows: usize) -> &[DataRecord] {
        &self.data[..rows.min(self.data.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[(&str, CellValue)]) -> DataRecord {
        cells.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_uses_first_row_only() {
        let data = vec![
            record(&[("a", 1.0.into()), ("b", "x".into())]),
            record(&[("a", "oops".into()), ("b", 2.0.into())]),
        ];
        let kinds = ColumnKinds::classify(&cols(&["a", "b"]), &data);

        assert!(kinds.is_numeric("a"));
        assert!(!kinds.is_numeric("b"));
        assert_eq!(kinds.first_numeric(), Some("a"));
    }

    #[test]
    fn test_empty_dataset_has_no_numeric_columns() {
        let dataset = Dataset::new("d", "empty", cols(&["a", "b"]), Vec::new());

        assert!(dataset.column_kinds().numeric_columns().is_empty());
        assert_eq!(dataset.shape(), DatasetShape { rows: 0, columns: 2 });
    }

    #[test]
    fn test_cell_display_matches_integral_numbers() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Text("North".into()).to_string(), "North");
    }

    #[test]
    fn test_dataset_roundtrip_recomputes_kinds() {
        let data = vec![record(&[("Month", "Jan".into()), ("Sales", 245.0.into())])];
        let dataset = Dataset::new("mock", "Mock", cols(&["Month", "Sales"]), data);

        let json = serde_json::to_string(&dataset).unwrap();
        let restored: Dataset = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, dataset);
        assert_eq!(restored.column_kinds().first_numeric(), Some("Sales"));
    }
}
