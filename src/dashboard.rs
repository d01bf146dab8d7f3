//! Dashboard Pipeline
//! `load -> validate -> filter -> {metrics, charts, export}` plus navigation.

use crate::charts::ChartSet;
use crate::data::{missing_required, Dataset, DatasetCache, Field, FilteredView, FrameView};
use crate::filter::{FilterEngine, FilterOptions, FilterSpec};
use crate::stats::{Kpis, MetricsCalculator};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Rows shown when the schema check fails.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to compute dashboard: {0}")]
    Polars(#[from] PolarsError),
}

/// Dashboards offered by the navigation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardKind {
    #[default]
    SalesAndRevenue,
    MealPreferences,
    FeedbackAndSentiment,
    InsightsAndRecommendations,
}

impl DashboardKind {
    pub const ALL: [DashboardKind; 4] = [
        DashboardKind::SalesAndRevenue,
        DashboardKind::MealPreferences,
        DashboardKind::FeedbackAndSentiment,
        DashboardKind::InsightsAndRecommendations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardKind::SalesAndRevenue => "1. Sales & Revenue",
            DashboardKind::MealPreferences => "2. Meal Preferences",
            DashboardKind::FeedbackAndSentiment => "3. Feedback & Sentiment",
            DashboardKind::InsightsAndRecommendations => "4. Insights & Recommendations",
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, DashboardKind::SalesAndRevenue)
    }
}

/// Everything the Sales & Revenue page shows for one filter specification.
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub view: FilteredView,
    pub kpis: Kpis,
    pub charts: ChartSet,
}

pub struct SalesDashboard;

impl SalesDashboard {
    /// Filter once, then compute the KPIs and every chart from the same view.
    pub fn evaluate(dataset: &Dataset, spec: &FilterSpec) -> Result<SalesReport, DashboardError> {
        let view = FilterEngine::apply(dataset, spec)?;
        let kpis = MetricsCalculator::compute(&view)?;
        let charts = ChartSet::prepare(&view);
        info!(
            "Evaluated dashboard: {} of {} rows match",
            view.height(),
            dataset.height()
        );
        Ok(SalesReport { view, kpis, charts })
    }
}

/// What the page can show for the current source and filters.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// The file could not be read or parsed.
    LoadFailed(String),
    /// The file parsed but holds no rows.
    Empty,
    /// Required fields are absent; show them and a preview instead.
    MissingColumns {
        missing: Vec<Field>,
        preview: DataFrame,
    },
    /// Computing the report failed after a successful load.
    Failed(String),
    Ready {
        options: FilterOptions,
        spec: FilterSpec,
        report: Box<SalesReport>,
    },
}

/// One user's dashboard session over a cached dataset.
pub struct Session {
    dataset: Option<Arc<Dataset>>,
    pub state: SessionState,
}

impl Session {
    /// Load (or reuse) the dataset at `path` and evaluate the default filters.
    pub fn open(cache: &mut DatasetCache, path: &Path) -> Self {
        let dataset = match cache.get_or_load(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("{e}");
                return Self {
                    dataset: None,
                    state: SessionState::LoadFailed(e.to_string()),
                };
            }
        };
        let state = Self::initial_state(&dataset);
        Self {
            dataset: Some(dataset),
            state,
        }
    }

    fn initial_state(dataset: &Dataset) -> SessionState {
        if dataset.is_empty() {
            return SessionState::Empty;
        }

        let missing = missing_required(dataset);
        if !missing.is_empty() {
            warn!("Dataset is missing required columns: {:?}", missing);
            return SessionState::MissingColumns {
                missing,
                preview: dataset.preview(PREVIEW_ROWS),
            };
        }

        match FilterOptions::from_dataset(dataset) {
            Ok(options) => {
                let spec = options.default_spec();
                Self::evaluate(dataset, options, spec)
            }
            Err(e) => SessionState::Failed(e.to_string()),
        }
    }

    fn evaluate(dataset: &Dataset, options: FilterOptions, spec: FilterSpec) -> SessionState {
        match SalesDashboard::evaluate(dataset, &spec) {
            Ok(report) => SessionState::Ready {
                options,
                spec,
                report: Box::new(report),
            },
            Err(e) => SessionState::Failed(e.to_string()),
        }
    }

    /// Recompute everything for a new filter specification.
    ///
    /// Does nothing unless the session is showing a report.
    pub fn apply(&mut self, spec: FilterSpec) {
        let Some(dataset) = self.dataset.as_ref() else {
            return;
        };
        let options = match &self.state {
            SessionState::Ready { options, .. } => options.clone(),
            _ => return,
        };
        self.state = Self::evaluate(dataset, options, spec);
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    pub fn report(&self) -> Option<&SalesReport> {
        match &self.state {
            SessionState::Ready { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }
}
