use dv_core::{CellValue, DataRecord};

use crate::config::NullConfig;

/// Cell type inference for raw text values
pub struct SchemaDetector {
    null_config: NullConfig,
}

/// Cell type counts for one column of an imported table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnProfile {
    pub name: String,
    pub numeric_cells: usize,
    pub text_cells: usize,
    pub empty_cells: usize,
}

impl ColumnProfile {
    /// Every non-empty cell is numeric
    pub fn is_numeric(&self) -> bool {
        self.numeric_cells > 0 && self.text_cells == 0
    }
}

impl SchemaDetector {
    /// Create a new schema detector
    pub fn new(null_config: NullConfig) -> Self {
        Self { null_config }
    }

    pub fn is_missing(&self, raw: &str) -> bool {
        self.null_config.is_null(raw)
    }

    /// Type a raw cell
    ///
    /// Missing values become empty text; anything that parses as a finite
    /// number becomes numeric; the rest stays text as written.
    pub fn infer_cell(&self, raw: &str) -> CellValue {
        if self.null_config.is_null(raw) {
            return CellValue::Text(String::new());
        }

        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Count cell kinds per column
    pub fn profile(&self, columns: &[String], data: &[DataRecord]) -> Vec<ColumnProfile> {
        columns
            .iter()
            .map(|name| {
                let mut profile = ColumnProfile {
                    name: name.clone(),
                    ..Default::default()
                };
                for row in data {
                    match row.get(name) {
                        Some(CellValue::Number(_)) => profile.numeric_cells += 1,
                        Some(CellValue::Text(s)) if !s.is_empty() => profile.text_cells += 1,
                        _ => profile.empty_cells += 1,
                    }
                }
                profile
            })
            .collect()
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new(NullConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_cell() {
        let detector = SchemaDetector::default();

        assert_eq!(detector.infer_cell("42"), CellValue::Number(42.0));
        assert_eq!(detector.infer_cell(" -1.5 "), CellValue::Number(-1.5));
        assert_eq!(detector.infer_cell("North"), CellValue::Text("North".into()));
        assert_eq!(detector.infer_cell("N/A"), CellValue::Text(String::new()));
        assert_eq!(detector.infer_cell("inf"), CellValue::Text("inf".into()));
    }

    #[test]
    fn test_profile_counts_cells() {
        let detector = SchemaDetector::default();
        let columns = vec!["a".to_string()];
        let data: Vec<DataRecord> = ["1", "x", "", "2"]
            .iter()
            .map(|raw| [("a".to_string(), detector.infer_cell(raw))].into_iter().collect())
            .collect();

        let profile = &detector.profile(&columns, &data)[0];
        assert_eq!((profile.numeric_cells, profile.text_cells, profile.empty_cells), (2, 1, 1));
        assert!(!profile.is_numeric());
    }
}
