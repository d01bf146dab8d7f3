//! Data Loader Module
//! Reads CSV files with Polars and spreadsheets with calamine into a [`Dataset`].

use super::dataset::{Dataset, FrameView};
use super::processor::ProcessorError;
use calamine::{Data, Reader};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Could not read data file at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to load workbook: {0}")]
    WorkbookError(#[from] calamine::Error),
    #[error("Workbook has no sheets")]
    EmptyWorkbook,
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Loads transaction files into normalized datasets.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV or spreadsheet file, normalize it and coerce known fields.
    pub fn load(path: &Path) -> Result<Dataset, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::Io {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }

        let raw = if Self::is_workbook(path) {
            Self::read_workbook(path)?
        } else {
            Self::read_csv(path)?
        };

        let dataset = Dataset::from_frame(raw)?;
        info!(
            "Loaded {} rows, {} columns from {}",
            dataset.height(),
            dataset.column_names().len(),
            path.display()
        );
        Ok(dataset)
    }

    fn is_workbook(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| WORKBOOK_EXTENSIONS.iter().any(|w| e.eq_ignore_ascii_case(w)))
    }

    /// Read a CSV file using Polars.
    ///
    /// Every column is read as text; typing happens per cell in the
    /// processor, so one odd value never nulls its neighbours.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Read the first worksheet of a workbook; the first row is the header.
    ///
    /// Every cell is kept as text so the processor applies the same
    /// coercion rules as for CSV input.
    pub fn read_workbook(path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook = calamine::open_workbook_auto(path)?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(LoaderError::EmptyWorkbook)?;
        let range = workbook.worksheet_range(&sheet)?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(DataFrame::empty());
        };
        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("column_{}", i + 1)))
            .collect();

        let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (i, column) in values.iter_mut().enumerate() {
                column.push(row.get(i).and_then(cell_text));
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(values)
            .map(|(name, cells)| Column::new(name.into(), cells))
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Convert an Excel date serial to an ISO date string; `None` when out of range.
pub fn excel_serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let offset = Duration::try_days(serial.floor() as i64)?;
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|base| base.checked_add_signed(offset))
        .map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{date_values, f64_values};
    use crate::data::Field;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_normalizes_and_coerces() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "sales.csv",
            "Order ID,Date,Item Name,Final Amount,Profit,Quantity,Payment-Mode\n\
             O1,2025-01-01,Idli,100,20,2,UPI\n\
             O2,bad-date,Dosa,abc,15,1,Cash\n\
             O3,2025-01-03,Vada,80,10,4,UPI\n",
        );

        let dataset = DataLoader::load(&path).unwrap();
        assert_eq!(dataset.height(), 3);
        assert!(dataset.has(Field::PaymentMode));
        assert_eq!(
            dataset.column_names(),
            [
                "order_id",
                "date",
                "item_name",
                "final_amount",
                "profit",
                "quantity",
                "payment_mode"
            ]
        );

        let dates = date_values(dataset.frame(), "date").unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(dates[1], None);

        let amounts = f64_values(dataset.frame(), "final_amount").unwrap();
        assert_eq!(amounts, vec![Some(100.0), None, Some(80.0)]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_unreadable_workbook_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "broken.xlsx", "this is not a zip archive");
        assert!(DataLoader::load(&path).is_err());
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(45658.0).as_deref(), Some("2025-01-01"));
        assert_eq!(excel_serial_to_date(45658.75).as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_out_of_range_serial_is_missing() {
        assert_eq!(excel_serial_to_date(1.0e18), None);
        assert_eq!(excel_serial_to_date(-1.0e18), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(1.0e9), None);
        let huge = Data::DateTime(calamine::ExcelDateTime::new(
            1.0e18,
            calamine::ExcelDateTimeType::DateTime,
            false,
        ));
        assert_eq!(cell_text(&huge), None);
    }

    #[test]
    fn test_late_rows_keep_their_values() {
        let mut body = String::from("Order ID,Final Amount\n");
        for i in 0..10_000 {
            body.push_str(&format!("{i},100\n"));
        }
        body.push_str("A10000,12.5\n");
        body.push_str("10001,n/a\n");
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "long.csv", &body);

        let dataset = DataLoader::load(&path).unwrap();
        assert_eq!(dataset.height(), 10_002);

        let amounts = f64_values(dataset.frame(), "final_amount").unwrap();
        assert_eq!(amounts[0], Some(100.0));
        assert_eq!(amounts[10_000], Some(12.5));
        assert_eq!(amounts[10_001], None);

        let ids = crate::data::columns::text_values(dataset.frame(), "order_id").unwrap();
        assert_eq!(ids[10_000].as_deref(), Some("A10000"));
        assert_eq!(ids[0].as_deref(), Some("0"));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::String("Lunch".into())), Some("Lunch".into()));
        assert_eq!(cell_text(&Data::String("  ".into())), None);
        assert_eq!(cell_text(&Data::Float(12.5)), Some("12.5".into()));
        assert_eq!(cell_text(&Data::Int(3)), Some("3".into()));
        assert_eq!(cell_text(&Data::Empty), None);
    }
}
