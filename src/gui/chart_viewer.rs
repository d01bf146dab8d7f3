//! Chart Viewer Widget
//! Central scrollable panel with the KPI cards and the dashboard charts.

use crate::charts::{
    ChartPlotter, ChartPreparer, ChartResult, DailyTrendChart, PaymentShareChart,
    ProfitByCategoryChart, TopItemsChart, WeekdayHeatmapChart,
};
use crate::dashboard::{DashboardKind, SalesReport, SessionState};
use crate::fmt;
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::*;

const CHART_SPACING: f32 = 15.0;
const KPI_CARD_WIDTH: f32 = 180.0;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

/// Header and stringified cells of a data frame preview.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviewTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PreviewTable {
    pub fn from_frame(df: &DataFrame) -> Self {
        let header = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = (0..df.height())
            .map(|i| {
                df.get_columns()
                    .iter()
                    .map(|column| match column.get(i) {
                        Ok(AnyValue::Null) | Err(_) => String::new(),
                        Ok(value) => value
                            .get_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| value.to_string()),
                    })
                    .collect()
            })
            .collect();
        Self { header, rows }
    }
}

/// Scrollable dashboard display area.
#[derive(Default)]
pub struct ChartViewer {
    preview: Option<PreviewTable>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh cached content after the session state changed.
    pub fn sync(&mut self, state: Option<&SessionState>) {
        self.preview = match state {
            Some(SessionState::MissingColumns { preview, .. }) => Some(PreviewTable::from_frame(preview)),
            _ => None,
        };
    }

    pub fn show(&self, ui: &mut egui::Ui, dashboard: DashboardKind, state: Option<&SessionState>, total_rows: usize) {
        if !dashboard.is_available() {
            Self::centered_message(ui, &format!("{} is coming soon.", dashboard.title()), Color32::GRAY);
            return;
        }

        let Some(state) = state else {
            Self::centered_message(ui, "No Data", Color32::GRAY);
            return;
        };

        match state {
            SessionState::LoadFailed(msg) => {
                Self::centered_message(ui, &format!("Could not load data: {msg}"), ERROR_COLOR);
            }
            SessionState::Empty => {
                Self::centered_message(ui, "The data file has no rows.", WARNING_COLOR);
            }
            SessionState::Failed(msg) => {
                Self::centered_message(ui, &format!("Error: {msg}"), ERROR_COLOR);
            }
            SessionState::MissingColumns { missing, .. } => {
                let names: Vec<String> = missing.iter().map(|f| format!("'{f}'")).collect();
                ui.label(
                    RichText::new(format!("Missing required columns: {}", names.join(", ")))
                        .size(16.0)
                        .color(ERROR_COLOR),
                );
                ui.add_space(CHART_SPACING);
                if let Some(preview) = &self.preview {
                    ui.label(RichText::new("Data preview").size(14.0).strong());
                    Self::draw_preview(ui, preview);
                }
            }
            SessionState::Ready { report, .. } => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| Self::draw_report(ui, report, total_rows));
            }
        }
    }

    fn centered_message(ui: &mut egui::Ui, text: &str, color: Color32) {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(text).size(20.0).color(color));
        });
    }

    fn draw_preview(ui: &mut egui::Ui, preview: &PreviewTable) {
        ScrollArea::horizontal().show(ui, |ui| {
            egui::Grid::new("data_preview")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for name in &preview.header {
                        ui.label(RichText::new(name).strong());
                    }
                    ui.end_row();
                    for row in &preview.rows {
                        for cell in row {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn draw_report(ui: &mut egui::Ui, report: &SalesReport, total_rows: usize) {
        ui.label(RichText::new("Sales & Revenue Dashboard").size(22.0).strong());
        ui.label(
            RichText::new(format!(
                "Showing {} of {} rows",
                fmt::count(report.kpis.row_count),
                fmt::count(total_rows)
            ))
            .size(12.0)
            .color(Color32::GRAY),
        );
        ui.add_space(CHART_SPACING);

        let kpis = &report.kpis;
        ui.horizontal_wrapped(|ui| {
            Self::kpi_card(ui, "Total Revenue", &fmt::rupees(kpis.total_revenue));
            Self::kpi_card(ui, "Total Profit", &fmt::rupees_or_na(kpis.total_profit));
            Self::kpi_card(ui, "Total Orders", &fmt::count(kpis.total_orders));
            Self::kpi_card(ui, "Avg Rating", &fmt::rating(kpis.avg_rating));
        });
        if let Some(repeats) = kpis.repeat_customers {
            ui.label(
                RichText::new(format!("Repeat customer orders: {}", fmt::count(repeats)))
                    .size(12.0)
                    .color(Color32::GRAY),
            );
        }
        ui.add_space(CHART_SPACING);

        let charts = &report.charts;
        Self::chart_card(ui, DailyTrendChart::TITLE, &charts.daily_trend, |ui, trend| {
            ChartPlotter::draw_daily_trend(ui, trend)
        });
        ui.add_space(CHART_SPACING);

        ui.columns(2, |cols| {
            Self::chart_card(&mut cols[0], TopItemsChart::TITLE, &charts.top_items, |ui, items| {
                ChartPlotter::draw_top_items(ui, items)
            });
            Self::chart_card(
                &mut cols[1],
                ProfitByCategoryChart::TITLE,
                &charts.profit_by_category,
                |ui, profits| ChartPlotter::draw_profit_by_category(ui, profits),
            );
        });
        ui.add_space(CHART_SPACING);

        ui.columns(2, |cols| {
            Self::chart_card(
                &mut cols[0],
                WeekdayHeatmapChart::TITLE,
                &charts.weekday_heatmap,
                |ui, pivot| ChartPlotter::draw_weekday_heatmap(ui, pivot),
            );
            Self::chart_card(
                &mut cols[1],
                PaymentShareChart::TITLE,
                &charts.payment_share,
                |ui, shares| ChartPlotter::draw_payment_share(ui, shares),
            );
        });
    }

    fn kpi_card(ui: &mut egui::Ui, title: &str, value: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(KPI_CARD_WIDTH);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(22.0).strong());
                });
            });
    }

    /// Titled card holding a chart, or the reason it cannot be drawn.
    fn chart_card<T>(ui: &mut egui::Ui, title: &str, result: &ChartResult<T>, draw: impl FnOnce(&mut egui::Ui, &T)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(16.0).strong());
                ui.add_space(8.0);
                match result {
                    Ok(data) => draw(ui, data),
                    Err(reason) => {
                        ui.label(RichText::new(format!("ℹ {reason}")).size(13.0).color(Color32::GRAY));
                    }
                }
            });
    }
}
