//! Chart Plotter Module
//! Draws the dashboard charts using egui_plot and the egui painter.

use super::prepare::{weekday_name, CategoryProfit, DailyTrend, ItemQuantity, PaymentShare, WeekdayPivot};
use crate::data::columns::{date_from_days, days_from_date};
use crate::fmt;
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};
use std::f32::consts::TAU;

pub const LINE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Yellow -> green -> blue ramp for the heatmap.
const HEAT_STOPS: [(f32, [u8; 3]); 3] = [
    (0.0, [255, 255, 217]),
    (0.5, [65, 182, 196]),
    (1.0, [8, 29, 88]),
];

const CHART_HEIGHT: f32 = 280.0;

/// Creates dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn palette_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Line chart of revenue per day with point markers.
    pub fn draw_daily_trend(ui: &mut egui::Ui, trend: &DailyTrend) {
        let points: Vec<[f64; 2]> = trend
            .iter()
            .map(|(date, revenue)| [f64::from(days_from_date(date)), revenue])
            .collect();

        Plot::new("daily_revenue")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label("Revenue (₹)")
            .x_axis_formatter(|mark, _range| {
                date_from_days(mark.value.round() as i32)
                    .map(|d| d.format("%d %b").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name("Revenue"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.5)
                        .color(LINE_COLOR),
                );
            });
    }

    /// Horizontal bars, best seller on top.
    pub fn draw_top_items(ui: &mut egui::Ui, items: &[ItemQuantity]) {
        // Plot y grows upwards, so the smallest bar goes first
        let ordered: Vec<&ItemQuantity> = items.iter().rev().collect();
        let labels: Vec<String> = ordered.iter().map(|i| i.item.clone()).collect();

        let bars: Vec<Bar> = ordered
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Bar::new(i as f64, item.quantity)
                    .name(&item.item)
                    .width(0.7)
            })
            .collect();

        Plot::new("top_items")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Quantity")
            .y_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(PALETTE[1])
                        .name("Top 10 Items by Quantity"),
                );
            });
    }

    /// Vertical bars of profit per meal type.
    pub fn draw_profit_by_category(ui: &mut egui::Ui, profits: &[CategoryProfit]) {
        let labels: Vec<String> = profits.iter().map(|p| p.category.clone()).collect();
        let bars: Vec<Bar> = profits
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Bar::new(i as f64, p.profit)
                    .name(&p.category)
                    .width(0.6)
                    .fill(Self::palette_color(i))
            })
            .collect();

        Plot::new("profit_by_meal_type")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label("Profit (₹)")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Profit by Meal Type"));
            });
    }

    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 0.01 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    fn heat_color(t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let (lo, hi) = if t <= HEAT_STOPS[1].0 {
            (HEAT_STOPS[0], HEAT_STOPS[1])
        } else {
            (HEAT_STOPS[1], HEAT_STOPS[2])
        };
        let f = (t - lo.0) / (hi.0 - lo.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
        Color32::from_rgb(
            mix(lo.1[0], hi.1[0]),
            mix(lo.1[1], hi.1[1]),
            mix(lo.1[2], hi.1[2]),
        )
    }

    /// Annotated grid: weekdays as rows, meal types as columns.
    pub fn draw_weekday_heatmap(ui: &mut egui::Ui, pivot: &WeekdayPivot) {
        let label_w = 90.0;
        let header_h = 22.0;
        let cell_h = 30.0;
        let width = ui.available_width().max(label_w + 60.0);
        let cols = pivot.categories.len().max(1);
        let cell_w = (width - label_w) / cols as f32;
        let height = header_h + cell_h * pivot.weekdays.len() as f32;

        let (rect, _) = ui.allocate_exact_size(Vec2::new(width, height), Sense::hover());
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();
        let max = pivot.max();

        for (c, category) in pivot.categories.iter().enumerate() {
            let center = Pos2::new(
                rect.left() + label_w + cell_w * (c as f32 + 0.5),
                rect.top() + header_h / 2.0,
            );
            painter.text(center, Align2::CENTER_CENTER, category, FontId::proportional(12.0), text_color);
        }

        for (r, weekday) in pivot.weekdays.iter().enumerate() {
            let top = rect.top() + header_h + cell_h * r as f32;
            painter.text(
                Pos2::new(rect.left() + 4.0, top + cell_h / 2.0),
                Align2::LEFT_CENTER,
                weekday_name(*weekday),
                FontId::proportional(12.0),
                text_color,
            );

            for (c, value) in pivot.cells[r].iter().enumerate() {
                let cell = Rect::from_min_size(
                    Pos2::new(rect.left() + label_w + cell_w * c as f32, top),
                    Vec2::new(cell_w, cell_h),
                )
                .shrink(1.0);
                let t = if max > 0.0 { (*value / max) as f32 } else { 0.0 };
                painter.rect_filled(cell, 2.0, Self::heat_color(t));

                let annotation = if t > 0.5 { Color32::WHITE } else { Color32::BLACK };
                painter.text(
                    cell.center(),
                    Align2::CENTER_CENTER,
                    format!("{value:.0}"),
                    FontId::proportional(12.0),
                    annotation,
                );
            }
        }
    }

    /// Donut chart with a legend of payment-mode shares.
    pub fn draw_payment_share(ui: &mut egui::Ui, shares: &[PaymentShare]) {
        ui.horizontal(|ui| {
            let size = 220.0;
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let outer = size / 2.0 - 4.0;
            let inner = outer * 0.4;

            let mut start = -TAU / 4.0;
            for (i, share) in shares.iter().enumerate() {
                let sweep = share.share as f32 * TAU;
                let color = Self::palette_color(i);
                // Convex pieces small enough for convex_polygon
                let steps = ((sweep / 0.1).ceil() as usize).max(1);
                for s in 0..steps {
                    let a0 = start + sweep * s as f32 / steps as f32;
                    let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                    let at = |r: f32, a: f32| center + Vec2::angled(a) * r;
                    painter.add(Shape::convex_polygon(
                        vec![at(outer, a0), at(outer, a1), at(inner, a1), at(inner, a0)],
                        color,
                        Stroke::NONE,
                    ));
                }
                start += sweep;
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for (i, share) in shares.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(Vec2::splat(14.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 3.0, Self::palette_color(i));
                        ui.label(
                            RichText::new(format!(
                                "{}  {} ({})",
                                share.mode,
                                fmt::percent(share.share),
                                fmt::count(share.count)
                            ))
                            .size(13.0),
                        );
                    });
                }
            });
        });
    }
}
