//! Typed column extraction from a DataFrame.

use chrono::{Duration, NaiveDate};
use polars::prelude::*;

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub fn days_from_date(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    epoch().checked_add_signed(Duration::days(i64::from(days)))
}

/// Column values as calendar dates; nulls stay `None`.
pub fn date_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let days = df.column(name)?.cast(&DataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(date_from_days))
        .collect())
}

/// Column values as floats; nulls and NaN become `None`.
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|v| !v.is_nan()))
        .collect())
}

/// Column values rendered as text; nulls stay `None`.
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let values = df.column(name)?.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Non-negative counts (e.g. a `len()` aggregation).
pub fn count_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<usize>> {
    let values = df.column(name)?.cast(&DataType::UInt64)?;
    Ok(values
        .u64()?
        .into_iter()
        .map(|v| v.unwrap_or(0) as usize)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_conversion() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let days = days_from_date(date);
        assert_eq!(days, 20090);
        assert_eq!(date_from_days(days), Some(date));
        assert_eq!(date_from_days(0), NaiveDate::from_ymd_opt(1970, 1, 1));
    }

    #[test]
    fn test_value_extraction() {
        let df = df!(
            "name" => [Some("a"), None],
            "amount" => [Some(1.5), None],
        )
        .unwrap();

        assert_eq!(
            text_values(&df, "name").unwrap(),
            vec![Some("a".to_string()), None]
        );
        assert_eq!(f64_values(&df, "amount").unwrap(), vec![Some(1.5), None]);
        assert!(text_values(&df, "missing").is_err());
    }
}
