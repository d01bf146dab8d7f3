//! Filter Engine
//! Narrows a dataset to the rows matching a [`FilterSpec`].

use super::spec::{DateRange, FilterSpec};
use crate::data::{Dataset, Field, FilteredView, FrameView};
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

pub struct FilterEngine;

impl FilterEngine {
    /// Apply the date interval first, then each active inclusion set.
    ///
    /// Every step is an AND narrowing; rows with a missing value in an
    /// actively constrained field never match.
    pub fn apply(dataset: &Dataset, spec: &FilterSpec) -> PolarsResult<FilteredView> {
        let mut predicates = Vec::new();

        if let Some(range) = spec.date_range {
            if dataset.has(Field::Date) {
                predicates.push(Self::date_predicate(range));
            }
        }

        for (field, selected) in spec.selections() {
            if selected.is_empty() || !dataset.has(field) {
                continue;
            }
            predicates.push(Self::inclusion_predicate(field, selected));
        }

        let Some(predicate) = predicates.into_iter().reduce(|acc, p| acc.and(p)) else {
            return Ok(FilteredView::new(dataset.frame().clone()));
        };

        let frame = dataset.frame().clone().lazy().filter(predicate).collect()?;
        debug!("Filters kept {} of {} rows", frame.height(), dataset.height());
        Ok(FilteredView::new(frame))
    }

    /// Inclusive interval; an inverted range matches nothing.
    fn date_predicate(range: DateRange) -> Expr {
        col(Field::Date.column()).is_between(
            lit(range.start).cast(DataType::Date),
            lit(range.end).cast(DataType::Date),
            ClosedInterval::Both,
        )
    }

    fn inclusion_predicate(field: Field, selected: &BTreeSet<String>) -> Expr {
        let values: Vec<&str> = selected.iter().map(String::as_str).collect();
        col(field.column()).is_in(lit(Series::new(field.column().into(), values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{date_values, text_values};
    use crate::test_support::{day, sample_dataset};
    use chrono::NaiveDate;

    fn full_range(dataset: &Dataset) -> FilterSpec {
        let dates: Vec<NaiveDate> = date_values(dataset.frame(), "date")
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        let start = dates.iter().min().copied().unwrap();
        let end = dates.iter().max().copied().unwrap();
        FilterSpec::default().with_date_range(start, end)
    }

    #[test]
    fn test_three_row_date_scenario() {
        let df = df!(
            "order_id" => ["1", "2", "3"],
            "date" => ["2025-01-01", "2025-01-02", "2025-01-03"],
            "final_amount" => [100.0, 100.0, 100.0],
        )
        .unwrap();
        let dataset = Dataset::from_frame(df).unwrap();
        let spec = FilterSpec::default().with_date_range(day(2), day(3));

        let view = FilterEngine::apply(&dataset, &spec).unwrap();
        assert_eq!(view.height(), 2);
        assert_eq!(
            text_values(view.frame(), "order_id").unwrap(),
            vec![Some("2".to_string()), Some("3".to_string())]
        );
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let dataset = sample_dataset();
        let single_day = FilterSpec::default().with_date_range(day(1), day(1));
        let view = FilterEngine::apply(&dataset, &single_day).unwrap();
        assert_eq!(
            text_values(view.frame(), "order_id").unwrap(),
            vec![Some("O1".to_string()), Some("O2".to_string())]
        );

        let spec = FilterSpec::default().with_date_range(day(5), day(6));
        let dates = date_values(FilterEngine::apply(&dataset, &spec).unwrap().frame(), "date").unwrap();
        assert_eq!(dates, vec![Some(day(5)), Some(day(6)), Some(day(6))]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let dataset = sample_dataset();
        let spec = FilterSpec::default().with_date_range(day(5), day(1));
        let view = FilterEngine::apply(&dataset, &spec).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.column_names(), dataset.column_names());
    }

    #[test]
    fn test_missing_dates_drop_out_of_active_range() {
        let dataset = sample_dataset();
        let unrestricted = FilterEngine::apply(&dataset, &FilterSpec::default()).unwrap();
        assert_eq!(unrestricted.height(), dataset.height());

        let ranged = FilterEngine::apply(&dataset, &full_range(&dataset)).unwrap();
        assert_eq!(ranged.height(), dataset.height() - 1);
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let dataset = sample_dataset();
        let base = full_range(&dataset);
        let with_empty = base.clone().with_selection(Field::MealType, Vec::<String>::new());

        let a = FilterEngine::apply(&dataset, &base).unwrap();
        let b = FilterEngine::apply(&dataset, &with_empty).unwrap();
        assert!(a.frame().equals_missing(b.frame()));
    }

    #[test]
    fn test_selection_on_absent_field_is_ignored() {
        let df = df!("order_id" => ["1", "2"], "item_name" => ["Idli", "Dosa"]).unwrap();
        let dataset = Dataset::from_frame(df).unwrap();
        let spec = FilterSpec::default().with_selection(Field::Location, ["Nowhere"]);
        assert_eq!(FilterEngine::apply(&dataset, &spec).unwrap().height(), 2);
    }

    #[test]
    fn test_every_row_satisfies_every_predicate() {
        let dataset = sample_dataset();
        let spec = FilterSpec::default()
            .with_date_range(day(1), day(6))
            .with_selection(Field::MealType, ["Lunch", "Dinner"])
            .with_selection(Field::PaymentMode, ["UPI"]);

        let view = FilterEngine::apply(&dataset, &spec).unwrap();
        assert!(view.height() > 0);
        assert!(view.height() <= dataset.height());

        for date in date_values(view.frame(), "date").unwrap() {
            let date = date.unwrap();
            assert!(day(1) <= date && date <= day(6));
        }
        for meal in text_values(view.frame(), "meal_type").unwrap() {
            assert!(spec.meal_types.contains(&meal.unwrap()));
        }
        for mode in text_values(view.frame(), "payment_mode").unwrap() {
            assert_eq!(mode.as_deref(), Some("UPI"));
        }
    }

    #[test]
    fn test_null_category_excluded_only_when_filtered() {
        let dataset = sample_dataset();
        let all = FilterEngine::apply(&dataset, &FilterSpec::default()).unwrap();
        let filtered = FilterEngine::apply(
            &dataset,
            &FilterSpec::default().with_selection(Field::Location, ["Hostel A", "Hostel B"]),
        )
        .unwrap();
        assert_eq!(filtered.height(), all.height() - 1);
    }
}
