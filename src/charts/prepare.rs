//! Chart Data Preparers
//! Shape a filtered view into the small tables each chart draws.
//!
//! Every preparer declares the fields it needs. [`prepare`] checks them
//! against the view and turns missing fields, an empty result and data
//! frame errors into [`Unavailable`] so one chart can degrade while the
//! others still render.

use crate::data::columns::{count_values, date_values, f64_values, text_values};
use crate::data::{Field, FilteredView, FrameView, Unavailable};
use chrono::{NaiveDate, Weekday};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Number of rows kept by the top-items chart.
pub const TOP_ITEMS_LIMIT: usize = 10;

/// Canonical weekday order of the heatmap rows.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub type ChartResult<T> = Result<T, Unavailable>;

/// A pure view-to-table transformation with declared field requirements.
pub trait ChartPreparer {
    type Output;

    const TITLE: &'static str;
    const REQUIRES: &'static [Field];

    /// Build the table. Only called when every required field is present.
    fn build(view: &FilteredView) -> PolarsResult<Self::Output>;

    /// Whether the built table has anything to draw.
    fn has_data(output: &Self::Output) -> bool;
}

/// Run a preparer with its capability check.
pub fn prepare<P: ChartPreparer>(view: &FilteredView) -> ChartResult<P::Output> {
    view.require(P::REQUIRES)?;
    if view.is_empty() {
        return Err(Unavailable::NoRows);
    }
    let output = P::build(view)?;
    if P::has_data(&output) {
        Ok(output)
    } else {
        Err(Unavailable::NoRows)
    }
}

/// Group `key` and sum `value`, dropping groups with a missing key.
fn sum_by(view: &FilteredView, key: Field, value: Field) -> PolarsResult<Vec<(String, f64)>> {
    let grouped = view
        .frame()
        .clone()
        .lazy()
        .group_by([col(key.column())])
        .agg([col(value.column()).sum()])
        .collect()?;

    let keys = text_values(&grouped, key.column())?;
    let sums = f64_values(&grouped, value.column())?;
    Ok(keys
        .into_iter()
        .zip(sums)
        .filter_map(|(k, v)| Some((k?, v.unwrap_or(0.0))))
        .collect())
}

/// Largest value first, ties broken by label.
fn by_value_desc(a: &(String, f64), b: &(String, f64)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
}

/// Revenue for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// Revenue per date present in the view, ascending by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyTrend {
    points: Vec<DailyRevenue>,
}

impl DailyTrend {
    /// Restartable iteration over `(date, revenue)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().map(|p| (p.date, p.revenue))
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub struct DailyTrendChart;

impl ChartPreparer for DailyTrendChart {
    type Output = DailyTrend;

    const TITLE: &'static str = "Daily Revenue Trend";
    const REQUIRES: &'static [Field] = &[Field::Date, Field::FinalAmount];

    fn build(view: &FilteredView) -> PolarsResult<DailyTrend> {
        let grouped = view
            .frame()
            .clone()
            .lazy()
            .group_by([col(Field::Date.column())])
            .agg([col(Field::FinalAmount.column()).sum()])
            .collect()?;

        let dates = date_values(&grouped, Field::Date.column())?;
        let revenue = f64_values(&grouped, Field::FinalAmount.column())?;
        let mut points: Vec<DailyRevenue> = dates
            .into_iter()
            .zip(revenue)
            .filter_map(|(date, revenue)| {
                Some(DailyRevenue {
                    date: date?,
                    revenue: revenue.unwrap_or(0.0),
                })
            })
            .collect();
        points.sort_by_key(|p| p.date);

        Ok(DailyTrend { points })
    }

    fn has_data(output: &DailyTrend) -> bool {
        !output.is_empty()
    }
}

/// Total quantity sold of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuantity {
    pub item: String,
    pub quantity: f64,
}

pub struct TopItemsChart;

impl ChartPreparer for TopItemsChart {
    type Output = Vec<ItemQuantity>;

    const TITLE: &'static str = "Top Selling Items";
    const REQUIRES: &'static [Field] = &[Field::ItemName, Field::Quantity];

    fn build(view: &FilteredView) -> PolarsResult<Vec<ItemQuantity>> {
        let mut totals = sum_by(view, Field::ItemName, Field::Quantity)?;
        totals.sort_by(by_value_desc);
        totals.truncate(TOP_ITEMS_LIMIT);
        Ok(totals
            .into_iter()
            .map(|(item, quantity)| ItemQuantity { item, quantity })
            .collect())
    }

    fn has_data(output: &Vec<ItemQuantity>) -> bool {
        !output.is_empty()
    }
}

/// Total profit of one meal type.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProfit {
    pub category: String,
    pub profit: f64,
}

pub struct ProfitByCategoryChart;

impl ChartPreparer for ProfitByCategoryChart {
    type Output = Vec<CategoryProfit>;

    const TITLE: &'static str = "Profit by Meal Type";
    const REQUIRES: &'static [Field] = &[Field::MealType, Field::Profit];

    fn build(view: &FilteredView) -> PolarsResult<Vec<CategoryProfit>> {
        let mut totals = sum_by(view, Field::MealType, Field::Profit)?;
        totals.sort_by(by_value_desc);
        Ok(totals
            .into_iter()
            .map(|(category, profit)| CategoryProfit { category, profit })
            .collect())
    }

    fn has_data(output: &Vec<CategoryProfit>) -> bool {
        !output.is_empty()
    }
}

/// Quantity sold by weekday (rows) and meal type (columns).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeekdayPivot {
    /// Weekdays present in the data, Monday first.
    pub weekdays: Vec<Weekday>,
    /// Meal types, sorted.
    pub categories: Vec<String>,
    /// `cells[row][column]`, zero where a combination never occurs.
    pub cells: Vec<Vec<f64>>,
}

impl WeekdayPivot {
    /// Largest cell, for scaling a color ramp.
    pub fn max(&self) -> f64 {
        self.cells.iter().flatten().copied().fold(0.0, f64::max)
    }
}

/// Full English weekday name as used by the `day_of_week` column.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    WEEKDAY_ORDER.into_iter().find(|w| weekday_name(*w) == name)
}

pub struct WeekdayHeatmapChart;

impl ChartPreparer for WeekdayHeatmapChart {
    type Output = WeekdayPivot;

    const TITLE: &'static str = "Sales Heatmap: Weekday x Meal Type";
    const REQUIRES: &'static [Field] = &[Field::DayOfWeek, Field::MealType, Field::Quantity];

    fn build(view: &FilteredView) -> PolarsResult<WeekdayPivot> {
        let grouped = view
            .frame()
            .clone()
            .lazy()
            .group_by([col(Field::DayOfWeek.column()), col(Field::MealType.column())])
            .agg([col(Field::Quantity.column()).sum()])
            .collect()?;

        let days = text_values(&grouped, Field::DayOfWeek.column())?;
        let meals = text_values(&grouped, Field::MealType.column())?;
        let quantities = f64_values(&grouped, Field::Quantity.column())?;

        let mut categories = BTreeSet::new();
        let mut totals: HashMap<(Weekday, String), f64> = HashMap::new();
        let mut present = BTreeSet::new();
        for ((day, meal), quantity) in days.into_iter().zip(meals).zip(quantities) {
            let (Some(day), Some(meal)) = (day, meal) else {
                continue;
            };
            categories.insert(meal.clone());
            // Labels outside the seven canonical names have no row
            if let Some(weekday) = weekday_from_name(&day) {
                present.insert(weekday.num_days_from_monday());
                *totals.entry((weekday, meal)).or_default() += quantity.unwrap_or(0.0);
            }
        }

        let weekdays: Vec<Weekday> = WEEKDAY_ORDER
            .into_iter()
            .filter(|w| present.contains(&w.num_days_from_monday()))
            .collect();
        let categories: Vec<String> = categories.into_iter().collect();
        let cells = weekdays
            .iter()
            .map(|w| {
                categories
                    .iter()
                    .map(|c| totals.get(&(*w, c.clone())).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Ok(WeekdayPivot {
            weekdays,
            categories,
            cells,
        })
    }

    fn has_data(output: &WeekdayPivot) -> bool {
        !output.weekdays.is_empty()
    }
}

/// Number of transactions paid with one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentShare {
    pub mode: String,
    pub count: usize,
    /// Fraction of all counted transactions, in `0.0..=1.0`.
    pub share: f64,
}

pub struct PaymentShareChart;

impl ChartPreparer for PaymentShareChart {
    type Output = Vec<PaymentShare>;

    const TITLE: &'static str = "Payment Mode Share";
    const REQUIRES: &'static [Field] = &[Field::PaymentMode];

    fn build(view: &FilteredView) -> PolarsResult<Vec<PaymentShare>> {
        let grouped = view
            .frame()
            .clone()
            .lazy()
            .group_by([col(Field::PaymentMode.column())])
            .agg([col(Field::PaymentMode.column()).count().alias("count")])
            .collect()?;

        let modes = text_values(&grouped, Field::PaymentMode.column())?;
        let counts = count_values(&grouped, "count")?;
        let mut pairs: Vec<(String, usize)> = modes
            .into_iter()
            .zip(counts)
            .filter_map(|(mode, count)| Some((mode?, count)))
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let total: usize = pairs.iter().map(|(_, c)| c).sum();
        Ok(pairs
            .into_iter()
            .map(|(mode, count)| PaymentShare {
                mode,
                count,
                share: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect())
    }

    fn has_data(output: &Vec<PaymentShare>) -> bool {
        !output.is_empty()
    }
}

/// All five chart tables for one filtered view.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub daily_trend: ChartResult<DailyTrend>,
    pub top_items: ChartResult<Vec<ItemQuantity>>,
    pub profit_by_category: ChartResult<Vec<CategoryProfit>>,
    pub weekday_heatmap: ChartResult<WeekdayPivot>,
    pub payment_share: ChartResult<Vec<PaymentShare>>,
}

impl ChartSet {
    pub fn prepare(view: &FilteredView) -> Self {
        Self {
            daily_trend: prepare::<DailyTrendChart>(view),
            top_items: prepare::<TopItemsChart>(view),
            profit_by_category: prepare::<ProfitByCategoryChart>(view),
            weekday_heatmap: prepare::<WeekdayHeatmapChart>(view),
            payment_share: prepare::<PaymentShareChart>(view),
        }
    }
}

#[cfg(test)]
impl WeekdayPivot {
    fn get(&self, weekday: Weekday, category: &str) -> Option<f64> {
        let row = self.weekdays.iter().position(|w| *w == weekday)?;
        let column = self.categories.iter().position(|c| c == category)?;
        Some(self.cells[row][column])
    }
}
