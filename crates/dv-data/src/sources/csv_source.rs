//! CSV parsing

use csv::ReaderBuilder;
use dv_core::{CellValue, DataRecord};

use crate::config::ImportConfig;
use crate::schema::SchemaDetector;
use crate::DataError;

/// Parse CSV bytes into column names and typed records
///
/// Short rows are padded with empty cells; without a header line columns
/// are named `column_1`, `column_2`, ...
pub fn parse_csv(contents: &[u8], config: &ImportConfig) -> Result<(Vec<String>, Vec<DataRecord>), DataError> {
    let detector = SchemaDetector::new(config.null_config.clone());
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_headers)
        .flexible(true)
        .from_reader(contents);

    let mut columns: Vec<String> = if config.has_headers {
        reader.headers()?.iter().map(|h| h.trim().to_string()).collect()
    } else {
        Vec::new()
    };

    let mut data = Vec::new();
    for result in reader.records() {
        let record = result?;

        if !config.has_headers && record.len() > columns.len() {
            let start = columns.len();
            columns.extend((start..record.len()).map(|i| format!("column_{}", i + 1)));
        }
        if record.len() > columns.len() {
            return Err(DataError::Parse(format!(
                "line {} has {} fields but the header has {}",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len(),
                columns.len()
            )));
        }

        let row: DataRecord = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let value = record
                    .get(i)
                    .map(|raw| detector.infer_cell(raw))
                    .unwrap_or_else(|| CellValue::Text(String::new()));
                (col.clone(), value)
            })
            .collect();
        data.push(row);
    }

    if columns.is_empty() {
        return Err(DataError::Parse("no columns found".to_string()));
    }

    Ok((columns, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_columns() {
        let csv = "Month,Sales,Region\nJan,245,North\nFeb,,South\n";
        let (columns, data) = parse_csv(csv.as_bytes(), &ImportConfig::default()).unwrap();

        assert_eq!(columns, vec!["Month", "Sales", "Region"]);
        assert_eq!(data[0]["Sales"], CellValue::Number(245.0));
        assert_eq!(data[1]["Sales"], CellValue::Text(String::new()));
        assert_eq!(data[1]["Region"], CellValue::Text("South".into()));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let (_, data) = parse_csv(b"a,b\n1\n", &ImportConfig::default()).unwrap();

        assert_eq!(data[0].len(), 2);
        assert_eq!(data[0]["b"], CellValue::Text(String::new()));
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = parse_csv(b"a,b\n1,2,3\n", &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_headerless_and_custom_delimiter() {
        let mut config = ImportConfig::default().with_delimiter(b';');
        config.has_headers = false;

        let (columns, data) = parse_csv(b"x;1\ny;2\n", &config).unwrap();

        assert_eq!(columns, vec!["column_1", "column_2"]);
        assert_eq!(data.len(), 2);
        assert_eq!(data[1]["column_2"], CellValue::Number(2.0));
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        assert!(parse_csv(b"", &ImportConfig::default()).is_err());
    }
}
