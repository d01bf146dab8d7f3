//! CSV Export Module
//! Serializes a filtered view for download.

use crate::data::{FilteredView, FrameView};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// MIME type of the exported artifact.
pub const CSV_MIME: &str = "text/csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to save export: {0}")]
    Io(#[from] std::io::Error),
}

/// Default download name, e.g. `mealytics_filtered_sales.csv`.
pub fn export_file_name(product: &str) -> String {
    format!("{product}_filtered_sales.csv")
}

/// UTF-8 CSV with a header row, rows and columns in view order.
pub fn to_csv_bytes(view: &FilteredView) -> Result<Vec<u8>, ExportError> {
    let mut frame = view.frame().clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut frame)?;
    Ok(buf)
}

pub fn write_csv(view: &FilteredView, path: &Path) -> Result<usize, ExportError> {
    let bytes = to_csv_bytes(view)?;
    std::fs::write(path, &bytes)?;
    info!("Exported {} rows to {} ({CSV_MIME})", view.height(), path.display());
    Ok(view.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetCache;
    use crate::filter::{FilterEngine, FilterSpec};
    use crate::test_support::{day, sample_dataset};

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("mealytics"), "mealytics_filtered_sales.csv");
    }

    #[test]
    fn test_header_and_row_order() {
        let df = df!(
            "Order ID" => ["B", "A"],
            "Date" => ["2025-01-02", "2025-01-01"],
            "Final Amount" => [20.0, 10.0],
        )
        .unwrap();
        let dataset = crate::data::Dataset::from_frame(df).unwrap();
        let view = FilterEngine::apply(&dataset, &FilterSpec::default()).unwrap();

        let text = String::from_utf8(to_csv_bytes(&view).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "order_id,date,final_amount");
        assert!(lines[1].starts_with("B,2025-01-02,"));
        assert!(lines[2].starts_with("A,2025-01-01,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_round_trip_through_loader() {
        let dataset = sample_dataset();
        let spec = FilterSpec::default().with_date_range(day(1), day(4));
        let view = FilterEngine::apply(&dataset, &spec).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name("mealytics"));
        assert_eq!(write_csv(&view, &path).unwrap(), view.height());

        let reloaded = DatasetCache::new().get_or_load(&path).unwrap();
        assert_eq!(reloaded.height(), view.height());
        assert_eq!(reloaded.column_names(), view.column_names());
    }

    #[test]
    fn test_empty_view_exports_header_only() {
        let spec = FilterSpec::default().with_date_range(day(4), day(1));
        let view = FilterEngine::apply(&sample_dataset(), &spec).unwrap();
        let text = String::from_utf8(to_csv_bytes(&view).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("order_id,date,item_name"));
    }
}
