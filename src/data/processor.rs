//! Data Processor Module
//! Handles column-name normalization and per-cell type coercion.

use super::columns::days_from_date;
use super::fields::{normalize_column_name, Field, FieldKind};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Columns '{0}' collide after normalization")]
    DuplicateColumn(String),
}

/// Ambiguous day/month orders are read month first, whatever the separator.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Handles data cleaning before a frame becomes a dataset.
pub struct DataProcessor;

impl DataProcessor {
    /// Normalize column names and coerce every known field to its kind.
    pub fn clean(df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut df = Self::normalize_columns(df)?;

        for field in Field::ALL {
            if df.column(field.column()).is_err() {
                continue;
            }
            let coerced = match field.kind() {
                FieldKind::Date => Self::coerce_date(df.column(field.column())?)?,
                FieldKind::Numeric => Self::coerce_numeric(df.column(field.column())?)?,
                FieldKind::Text => df.column(field.column())?.cast(&DataType::String)?,
            };
            debug!(
                "Coerced '{}' to {} ({} missing)",
                field,
                coerced.dtype(),
                coerced.null_count()
            );
            df.with_column(coerced)?;
        }

        Ok(df)
    }

    /// Rename every column to its normalized form.
    pub fn normalize_columns(df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let name = normalize_column_name(column.name());
            if !seen.insert(name.clone()) {
                return Err(ProcessorError::DuplicateColumn(name));
            }
            columns.push(column.clone().with_name(name.into()));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Coerce a column to `Date`, nulling cells that do not parse.
    pub fn coerce_date(column: &Column) -> Result<Column, ProcessorError> {
        match column.dtype() {
            DataType::Date => Ok(column.clone()),
            DataType::Datetime(_, _) => Ok(column.cast(&DataType::Date)?),
            _ => {
                let text = column.cast(&DataType::String)?;
                let days: Vec<Option<i32>> = text
                    .str()?
                    .into_iter()
                    .map(|v| v.and_then(parse_date).map(days_from_date))
                    .collect();
                Ok(Column::new(column.name().clone(), days).cast(&DataType::Date)?)
            }
        }
    }

    /// Coerce a column to `Float64`, nulling cells that do not parse.
    pub fn coerce_numeric(column: &Column) -> Result<Column, ProcessorError> {
        let values: Vec<Option<f64>> = match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_number))
                .collect(),
            _ => column
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.filter(|v| v.is_finite()))
                .collect(),
        };
        Ok(Column::new(column.name().clone(), values))
    }
}

/// Parse a calendar date from the supported text layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a plain decimal number; anything else is missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
