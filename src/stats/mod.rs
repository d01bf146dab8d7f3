//! Stats module - KPI computation

mod calculator;

pub use calculator::{Kpis, MetricsCalculator};
