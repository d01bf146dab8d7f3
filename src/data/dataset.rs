//! Dataset and Filtered View types.
//!
//! Both wrap a normalized [`DataFrame`] and answer which [`Field`]s they
//! carry. Computations that depend on optional fields go through
//! [`FrameView::require`] and receive a typed [`Unavailable`] instead of
//! probing columns themselves.

use super::fields::Field;
use super::processor::{DataProcessor, ProcessorError};
use polars::prelude::*;
use std::fmt;

/// Why a derived value cannot be shown for the current data.
#[derive(Debug, Clone, PartialEq)]
pub enum Unavailable {
    /// The fields are not part of the dataset at all.
    MissingFields(Vec<Field>),
    /// The fields exist but nothing is left after filtering.
    NoRows,
    /// The data frame library reported an error while computing.
    Failed(String),
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::MissingFields(fields) => {
                let names: Vec<String> = fields.iter().map(|f| format!("'{f}'")).collect();
                write!(f, "Requires {} column(s)", names.join(", "))
            }
            Unavailable::NoRows => f.write_str("No data for the current filters"),
            Unavailable::Failed(msg) => write!(f, "Could not compute: {msg}"),
        }
    }
}

impl From<PolarsError> for Unavailable {
    fn from(err: PolarsError) -> Self {
        Unavailable::Failed(err.to_string())
    }
}

/// Capability queries shared by [`Dataset`] and [`FilteredView`].
pub trait FrameView {
    fn frame(&self) -> &DataFrame;

    fn has(&self, field: Field) -> bool {
        self.frame().column(field.column()).is_ok()
    }

    /// Fields from `fields` that this view does not carry, in the given order.
    fn missing(&self, fields: &[Field]) -> Vec<Field> {
        fields.iter().copied().filter(|f| !self.has(*f)).collect()
    }

    fn require(&self, fields: &[Field]) -> Result<(), Unavailable> {
        let missing = self.missing(fields);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Unavailable::MissingFields(missing))
        }
    }

    fn height(&self) -> usize {
        self.frame().height()
    }

    fn is_empty(&self) -> bool {
        self.frame().height() == 0
    }

    fn column_names(&self) -> Vec<String> {
        self.frame()
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Immutable, normalized transaction table loaded once per source.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Normalize and coerce a raw frame.
    pub fn from_frame(raw: DataFrame) -> Result<Self, ProcessorError> {
        Ok(Self {
            frame: DataProcessor::clean(raw)?,
        })
    }

    /// First `n` rows, for inspection when the schema is incomplete.
    pub fn preview(&self, n: usize) -> DataFrame {
        self.frame.head(Some(n))
    }
}

impl FrameView for Dataset {
    fn frame(&self) -> &DataFrame {
        &self.frame
    }
}

/// Rows of a [`Dataset`] matching a filter specification.
#[derive(Debug, Clone)]
pub struct FilteredView {
    frame: DataFrame,
}

impl FilteredView {
    pub(crate) fn new(frame: DataFrame) -> Self {
        Self { frame }
    }
}

impl FrameView for FilteredView {
    fn frame(&self) -> &DataFrame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_missing_in_order() {
        let dataset = Dataset::from_frame(df!("Item Name" => ["Dosa"]).unwrap()).unwrap();
        assert!(dataset.has(Field::ItemName));
        assert_eq!(
            dataset.require(&[Field::Profit, Field::ItemName, Field::MealType]),
            Err(Unavailable::MissingFields(vec![Field::Profit, Field::MealType]))
        );
        assert_eq!(dataset.require(&[Field::ItemName]), Ok(()));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert!(!dataset.has(Field::Date));
        assert!(dataset.column_names().is_empty());
    }

    #[test]
    fn test_unavailable_messages() {
        let missing = Unavailable::MissingFields(vec![Field::MealType, Field::Profit]);
        assert_eq!(missing.to_string(), "Requires 'meal_type', 'profit' column(s)");
        assert_eq!(Unavailable::NoRows.to_string(), "No data for the current filters");
    }
}
