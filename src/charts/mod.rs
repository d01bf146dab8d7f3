//! Charts module - Chart data preparation and drawing

mod plotter;
mod prepare;

pub use plotter::ChartPlotter;
pub use prepare::{
    weekday_name, CategoryProfit, ChartPreparer, ChartResult, ChartSet, DailyTrend,
    DailyTrendChart, ItemQuantity, PaymentShare, PaymentShareChart, ProfitByCategoryChart,
    TopItemsChart, WeekdayHeatmapChart, WeekdayPivot,
};
