//! Metrics Calculator Module
//! Computes the scalar KPIs shown above the charts.

use crate::data::columns::f64_values;
use crate::data::{Field, FilteredView, FrameView};
use polars::prelude::*;

const REVENUE: &str = "total_revenue";
const PROFIT: &str = "total_profit";
const ORDERS: &str = "total_orders";
const RATING: &str = "avg_rating";
const REPEATS: &str = "repeat_customers";

/// Key metrics for one filtered view.
///
/// `None` means the metric is not available for this dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_profit: Option<f64>,
    pub total_orders: usize,
    pub avg_rating: Option<f64>,
    pub repeat_customers: Option<usize>,
    pub row_count: usize,
}

impl Default for Kpis {
    fn default() -> Self {
        Self {
            total_revenue: 0.0,
            total_profit: None,
            total_orders: 0,
            avg_rating: None,
            repeat_customers: None,
            row_count: 0,
        }
    }
}

/// Handles KPI computation over a filtered view.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// One aggregation pass over the view; fields the view lacks are skipped.
    pub fn compute(view: &FilteredView) -> PolarsResult<Kpis> {
        let mut aggs = Vec::new();
        if view.has(Field::FinalAmount) {
            aggs.push(col(Field::FinalAmount.column()).sum().alias(REVENUE));
        }
        if view.has(Field::Profit) {
            aggs.push(col(Field::Profit.column()).sum().alias(PROFIT));
        }
        if view.has(Field::OrderId) {
            aggs.push(col(Field::OrderId.column()).drop_nulls().n_unique().alias(ORDERS));
        }
        if view.has(Field::Rating) {
            aggs.push(col(Field::Rating.column()).mean().alias(RATING));
        }
        if view.has(Field::RepeatCustomer) {
            aggs.push(
                col(Field::RepeatCustomer.column())
                    .str()
                    .to_lowercase()
                    .eq(lit("yes"))
                    .sum()
                    .alias(REPEATS),
            );
        }

        let totals = if aggs.is_empty() {
            DataFrame::empty()
        } else {
            let aggs: Vec<Expr> = aggs.into_iter().map(|e| e.cast(DataType::Float64)).collect();
            view.frame().clone().lazy().select(aggs).collect()?
        };
        let scalar = |name: &str| -> PolarsResult<Option<f64>> {
            if totals.column(name).is_err() {
                return Ok(None);
            }
            Ok(f64_values(&totals, name)?.first().copied().flatten())
        };

        let count = |name: &str| -> PolarsResult<Option<usize>> {
            Ok(scalar(name)?.map(|v| v as usize))
        };

        Ok(Kpis {
            total_revenue: scalar(REVENUE)?.unwrap_or(0.0),
            total_profit: if view.has(Field::Profit) {
                Some(scalar(PROFIT)?.unwrap_or(0.0))
            } else {
                None
            },
            total_orders: count(ORDERS)?.unwrap_or(0),
            avg_rating: scalar(RATING)?,
            repeat_customers: if view.has(Field::RepeatCustomer) {
                Some(count(REPEATS)?.unwrap_or(0))
            } else {
                None
            },
            row_count: view.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::filter::{FilterEngine, FilterSpec};
    use crate::test_support::{day, sample_dataset};

    fn view_of(dataset: &Dataset, spec: &FilterSpec) -> FilteredView {
        FilterEngine::apply(dataset, spec).unwrap()
    }

    #[test]
    fn test_sample_kpis() {
        let dataset = sample_dataset();
        let kpis = MetricsCalculator::compute(&view_of(&dataset, &FilterSpec::default())).unwrap();

        assert_eq!(kpis.total_revenue, 945.0);
        assert_eq!(kpis.total_profit, Some(247.0));
        assert_eq!(kpis.total_orders, 9);
        assert_eq!(kpis.avg_rating, Some(4.0));
        assert_eq!(kpis.repeat_customers, Some(3));
        assert_eq!(kpis.row_count, 10);
    }

    #[test]
    fn test_sums_match_independent_summation() {
        let dataset = sample_dataset();
        let spec = FilterSpec::default()
            .with_date_range(day(2), day(5))
            .with_selection(Field::ConsumerType, ["Student", "Staff"]);
        let view = view_of(&dataset, &spec);
        let kpis = MetricsCalculator::compute(&view).unwrap();

        let revenue: f64 = f64_values(view.frame(), "final_amount")
            .unwrap()
            .into_iter()
            .flatten()
            .sum();
        let profit: f64 = f64_values(view.frame(), "profit")
            .unwrap()
            .into_iter()
            .flatten()
            .sum();
        assert_eq!(kpis.total_revenue, revenue);
        assert_eq!(kpis.total_profit, Some(profit));
        // O3, O4, O6, O10
        assert_eq!(kpis.total_revenue, 610.0);
    }

    #[test]
    fn test_three_row_revenue_scenario() {
        let df = df!(
            "order_id" => ["1", "2", "3"],
            "date" => ["2025-01-01", "2025-01-02", "2025-01-03"],
            "final_amount" => [100.0, 100.0, 100.0],
        )
        .unwrap();
        let dataset = Dataset::from_frame(df).unwrap();
        let spec = FilterSpec::default().with_date_range(day(2), day(3));

        let kpis = MetricsCalculator::compute(&view_of(&dataset, &spec)).unwrap();
        assert_eq!(kpis.total_revenue, 200.0);
        assert_eq!(kpis.total_orders, 2);
        assert_eq!(kpis.total_profit, None);
        assert_eq!(kpis.avg_rating, None);
        assert_eq!(kpis.repeat_customers, None);
    }

    #[test]
    fn test_empty_view_reports_no_data() {
        let dataset = sample_dataset();
        let spec = FilterSpec::default().with_date_range(day(6), day(1));
        let kpis = MetricsCalculator::compute(&view_of(&dataset, &spec)).unwrap();

        assert_eq!(kpis.total_revenue, 0.0);
        assert_eq!(kpis.total_profit, Some(0.0));
        assert_eq!(kpis.total_orders, 0);
        assert_eq!(kpis.avg_rating, None);
        assert_eq!(kpis.repeat_customers, Some(0));
        assert_eq!(kpis.row_count, 0);
    }

    #[test]
    fn test_missing_cells_are_skipped_not_zeroed() {
        let df = df!(
            "order_id" => [Some("A"), Some("B"), None, Some("A")],
            "final_amount" => ["10", "oops", "5.5", "4"],
            "rating" => [Some(2.0), None, Some(4.0), None],
            "repeat_customer" => [Some("Yes"), None, Some("yes"), Some("YES")],
        )
        .unwrap();
        let dataset = Dataset::from_frame(df).unwrap();
        let kpis = MetricsCalculator::compute(&view_of(&dataset, &FilterSpec::default())).unwrap();

        assert_eq!(kpis.total_revenue, 19.5);
        assert_eq!(kpis.avg_rating, Some(3.0));
        // missing ids are not an order of their own
        assert_eq!(kpis.total_orders, 2);
        assert_eq!(kpis.repeat_customers, Some(2));
        assert_eq!(kpis.row_count, 4);
    }
}
