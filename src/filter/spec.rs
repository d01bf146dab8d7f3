//! Filter Specification types.

use crate::data::Field;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Inclusive calendar-date interval. An inverted interval matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Fields that can be narrowed with an inclusion set, in application order.
pub const CATEGORICAL_FIELDS: [Field; 4] = [
    Field::MealType,
    Field::ConsumerType,
    Field::Location,
    Field::PaymentMode,
];

/// User-chosen constraints. Empty sets and an absent date range do not restrict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub date_range: Option<DateRange>,
    pub meal_types: BTreeSet<String>,
    pub consumer_types: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub payment_modes: BTreeSet<String>,
}

impl FilterSpec {
    pub fn selection_mut(&mut self, field: Field) -> Option<&mut BTreeSet<String>> {
        match field {
            Field::MealType => Some(&mut self.meal_types),
            Field::ConsumerType => Some(&mut self.consumer_types),
            Field::Location => Some(&mut self.locations),
            Field::PaymentMode => Some(&mut self.payment_modes),
            _ => None,
        }
    }

    /// Inclusion sets in application order.
    pub fn selections(&self) -> [(Field, &BTreeSet<String>); 4] {
        [
            (Field::MealType, &self.meal_types),
            (Field::ConsumerType, &self.consumer_types),
            (Field::Location, &self.locations),
            (Field::PaymentMode, &self.payment_modes),
        ]
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn with_selection<I, S>(mut self, field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(set) = self.selection_mut(field) {
            *set = values.into_iter().map(Into::into).collect();
        }
        self
    }
}

#[cfg(test)]
impl FilterSpec {
    /// Inclusion set for one of [`CATEGORICAL_FIELDS`].
    pub fn selection(&self, field: Field) -> Option<&BTreeSet<String>> {
        self.selections()
            .into_iter()
            .find(|(f, _)| *f == field)
            .map(|(_, set)| set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_inverted_range() {
        assert!(!DateRange::new(day(2), day(3)).is_inverted());
        assert!(!DateRange::new(day(2), day(2)).is_inverted());
        assert!(DateRange::new(day(3), day(1)).is_inverted());
    }

    #[test]
    fn test_with_selection_ignores_non_categorical_fields() {
        let spec = FilterSpec::default()
            .with_selection(Field::Location, ["Hostel A"])
            .with_selection(Field::Profit, ["x"]);
        assert_eq!(spec.locations.len(), 1);
        assert!(spec.selection(Field::Profit).is_none());
        assert_eq!(spec.selections()[2].0, Field::Location);
    }
}
