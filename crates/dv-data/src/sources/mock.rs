//! Built-in demo dataset

use dv_core::{CellValue, DataRecord, Dataset};

/// Source of the canonical demo dataset
///
/// The dataset always carries the id [`MockDataSource::DATASET_ID`], so
/// loading it repeatedly never creates duplicate entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDataSource;

const COLUMNS: [&str; 6] = ["Month", "Sales", "Revenue", "Customers", "Region", "Product"];

const ROWS: [(&str, i64, i64, i64, &str, &str); 12] = [
    ("Jan", 245, 12500, 89, "North", "A"),
    ("Feb", 312, 15800, 124, "South", "B"),
    ("Mar", 289, 14200, 102, "East", "A"),
    ("Apr", 401, 19300, 156, "West", "C"),
    ("May", 378, 18100, 145, "North", "B"),
    ("Jun", 456, 22400, 178, "South", "A"),
    ("Jul", 423, 20900, 167, "East", "C"),
    ("Aug", 398, 19600, 152, "West", "B"),
    ("Sep", 441, 21700, 172, "North", "A"),
    ("Oct", 467, 23200, 189, "South", "C"),
    ("Nov", 512, 25800, 201, "East", "B"),
    ("Dec", 589, 29100, 234, "West", "A"),
];

impl MockDataSource {
    pub const DATASET_ID: &'static str = "mock-data";
    pub const DATASET_NAME: &'static str = "Mock Data";

    pub fn new() -> Self {
        Self
    }

    /// Load the demo dataset
    pub async fn load(&self) -> Dataset {
        let data = ROWS
            .iter()
            .map(|(month, sales, revenue, customers, region, product)| {
                let cells: [CellValue; 6] = [
                    (*month).into(),
                    (*sales).into(),
                    (*revenue).into(),
                    (*customers).into(),
                    (*region).into(),
                    (*product).into(),
                ];
                COLUMNS
                    .iter()
                    .map(|c| c.to_string())
                    .zip(cells)
                    .collect::<DataRecord>()
            })
            .collect();

        Dataset::new(
            Self::DATASET_ID,
            Self::DATASET_NAME,
            COLUMNS.iter().map(|c| c.to_string()).collect(),
            data,
        )
    }
}
