//! Picker domains derived from a dataset.

use super::spec::{DateRange, FilterSpec, CATEGORICAL_FIELDS};
use crate::data::columns::{date_values, text_values};
use crate::data::{Dataset, Field, FrameView};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Values offered by the sidebar controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// `[min(date), max(date)]`, absent when no row has a usable date.
    pub date_bounds: Option<DateRange>,
    /// Sorted distinct values of each categorical field present.
    pub values: BTreeMap<Field, Vec<String>>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> PolarsResult<Self> {
        let date_bounds = if dataset.has(Field::Date) {
            let dates: Vec<NaiveDate> = date_values(dataset.frame(), Field::Date.column())?
                .into_iter()
                .flatten()
                .collect();
            match (dates.iter().min(), dates.iter().max()) {
                (Some(min), Some(max)) => Some(DateRange::new(*min, *max)),
                _ => None,
            }
        } else {
            None
        };

        let mut values = BTreeMap::new();
        for field in CATEGORICAL_FIELDS {
            if !dataset.has(field) {
                continue;
            }
            let distinct: BTreeSet<String> = text_values(dataset.frame(), field.column())?
                .into_iter()
                .flatten()
                .collect();
            values.insert(field, distinct.into_iter().collect());
        }

        Ok(Self {
            date_bounds,
            values,
        })
    }

    /// Observed values for `field`; empty when the field is absent.
    pub fn values_for(&self, field: Field) -> &[String] {
        self.values.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Full date range with every observed value selected.
    pub fn default_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec {
            date_range: self.date_bounds,
            ..FilterSpec::default()
        };
        for (field, values) in &self.values {
            if let Some(set) = spec.selection_mut(*field) {
                set.extend(values.iter().cloned());
            }
        }
        spec
    }

    /// Clamp a picked date into the dataset's bounds.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        match self.date_bounds {
            Some(bounds) => date.clamp(bounds.start, bounds.end),
            None => date,
        }
    }
}
