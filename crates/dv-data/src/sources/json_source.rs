//! JSON parsing for arrays of records

use dv_core::{CellValue, DataRecord};
use serde_json::Value;

use crate::config::ImportConfig;
use crate::schema::SchemaDetector;
use crate::DataError;

/// Parse a JSON array of objects into column names and typed records
///
/// Columns are the union of all keys in first-seen order. Keys missing from
/// an object become empty cells.
pub fn parse_json(contents: &[u8], config: &ImportConfig) -> Result<(Vec<String>, Vec<DataRecord>), DataError> {
    let detector = SchemaDetector::new(config.null_config.clone());
    let value: Value = serde_json::from_slice(contents)?;

    let Value::Array(items) = value else {
        return Err(DataError::Parse("expected a JSON array of records".to_string()));
    };

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(DataError::Parse(format!("record {} is not an object", idx)));
        };
        for key in map.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(map);
    }

    let data = objects
        .into_iter()
        .map(|mut map| {
            columns
                .iter()
                .map(|col| {
                    let cell = match map.remove(col) {
                        Some(value) => json_cell(value, &detector),
                        None => CellValue::Text(String::new()),
                    };
                    (col.clone(), cell)
                })
                .collect::<DataRecord>()
        })
        .collect();

    Ok((columns, data))
}

fn json_cell(value: Value, detector: &SchemaDetector) -> CellValue {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        Value::String(s) if detector.is_missing(&s) => CellValue::Text(String::new()),
        Value::String(s) => CellValue::Text(s),
        Value::Null => CellValue::Text(String::new()),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_keep_key_order_and_types() {
        let json = r#"[{"Month": "Jan", "Sales": 245}, {"Month": "Feb", "Sales": 312, "Note": null}]"#;
        let (columns, data) = parse_json(json.as_bytes(), &ImportConfig::default()).unwrap();

        assert_eq!(columns, vec!["Month", "Sales", "Note"]);
        assert_eq!(data[0]["Sales"], CellValue::Number(245.0));
        assert_eq!(data[0]["Note"], CellValue::Text(String::new()));
        assert_eq!(data[1]["Note"], CellValue::Text(String::new()));
    }

    #[test]
    fn test_numeric_strings_stay_text() {
        let (_, data) = parse_json(br#"[{"id": "007"}]"#, &ImportConfig::default()).unwrap();
        assert_eq!(data[0]["id"], CellValue::Text("007".into()));
    }

    #[test]
    fn test_rejects_non_array() {
        let err = parse_json(br#"{"a": 1}"#, &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));

        let err = parse_json(b"[1, 2]", &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_json(b"[{", &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }
}
