//! Control Panel Widget
//! Left side panel with dashboard navigation, data source and filters.

use crate::dashboard::DashboardKind;
use crate::filter::{DateRange, FilterOptions, FilterSpec, CATEGORICAL_FIELDS};
use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::PathBuf;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub dashboard: DashboardKind,
    pub data_path: Option<PathBuf>,
    /// Working copy of the filters, applied when an action is returned.
    pub spec: FilterSpec,
    options: Option<FilterOptions>,
    start_text: String,
    end_text: String,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            dashboard: DashboardKind::default(),
            data_path: None,
            spec: FilterSpec::default(),
            options: None,
            start_text: String::new(),
            end_text: String::new(),
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

/// Parse a typed date and pull it into the dataset's bounds.
fn parse_date_input(text: &str, options: &FilterOptions) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_INPUT_FORMAT)
        .ok()
        .map(|d| options.clamp(d))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_INPUT_FORMAT).to_string()
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the filters of a freshly evaluated session.
    pub fn update_filters(&mut self, options: &FilterOptions, spec: &FilterSpec) {
        self.options = Some(options.clone());
        self.spec = spec.clone();
        self.reset_date_text();
        self.export_enabled = true;
    }

    /// Hide the filters while no report is available.
    pub fn clear_filters(&mut self) {
        self.options = None;
        self.spec = FilterSpec::default();
        self.start_text.clear();
        self.end_text.clear();
        self.export_enabled = false;
    }

    fn reset_date_text(&mut self) {
        match self.spec.date_range {
            Some(range) => {
                self.start_text = format_date(range.start);
                self.end_text = format_date(range.end);
            }
            None => {
                self.start_text.clear();
                self.end_text.clear();
            }
        }
    }

    /// Commit the typed dates. Returns true when the range changed.
    fn commit_dates(&mut self) -> bool {
        let Some(options) = &self.options else {
            return false;
        };
        let start = parse_date_input(&self.start_text, options);
        let end = parse_date_input(&self.end_text, options);

        let changed = match (start, end) {
            (Some(start), Some(end)) => {
                let range = Some(DateRange::new(start, end));
                let changed = self.spec.date_range != range;
                self.spec.date_range = range;
                changed
            }
            _ => {
                self.status = format!("Error: dates must look like {}", format_date(NaiveDate::default()));
                false
            }
        };
        self.reset_date_text();
        changed
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🍽 Mealytics")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Mess Food Insights")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Navigation =====
        ui.label(RichText::new("🧭 Dashboard").size(14.0).strong());
        ui.add_space(5.0);
        ComboBox::from_id_salt("dashboard_kind")
            .width(ui.available_width() - 10.0)
            .selected_text(self.dashboard.title())
            .show_ui(ui, |ui| {
                for kind in DashboardKind::ALL {
                    if ui
                        .selectable_label(self.dashboard == kind, kind.title())
                        .clicked()
                        && self.dashboard != kind
                    {
                        self.dashboard = kind;
                        action = ControlPanelAction::DashboardChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.data_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseData;
                        }
                        if ui.small_button("⟳").on_hover_text("Reload from disk").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                        if ui.small_button("🗑").on_hover_text("Forget all cached files").clicked() {
                            action = ControlPanelAction::ClearCache;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters =====
        if self.dashboard.is_available() && self.options.is_some() {
            if self.show_filters(ui) {
                action = ControlPanelAction::FiltersChanged;
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);
        }

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("⬇ Download Filtered Data (CSV)").size(14.0))
                    .min_size(egui::vec2(220.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }
            });
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Date range and categorical selectors. Returns true when anything changed.
    fn show_filters(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let has_dates = self
            .options
            .as_ref()
            .is_some_and(|o| o.date_bounds.is_some());
        if has_dates {
            let label_width = 50.0;
            let mut commit = false;
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("From:"));
                let response = ui.add(egui::TextEdit::singleline(&mut self.start_text).desired_width(110.0));
                commit |= response.lost_focus();
            });
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("To:"));
                let response = ui.add(egui::TextEdit::singleline(&mut self.end_text).desired_width(110.0));
                commit |= response.lost_focus();
            });
            if commit {
                changed |= self.commit_dates();
            }
            if self.spec.date_range.is_some_and(|r| r.is_inverted()) {
                ui.label(
                    RichText::new("Start date is after end date")
                        .size(11.0)
                        .color(Color32::from_rgb(243, 156, 18)),
                );
            }
        } else {
            ui.label(RichText::new("No valid dates in this file").size(11.0).color(Color32::GRAY));
        }

        let Some(options) = &self.options else {
            return changed;
        };

        for field in CATEGORICAL_FIELDS {
            let values = options.values_for(field);
            if values.is_empty() {
                continue;
            }
            let Some(selected) = self.spec.selection_mut(field) else {
                continue;
            };
            ui.add_space(8.0);
            egui::CollapsingHeader::new(format!("{} ({}/{})", field.label(), selected.len(), values.len()))
                .id_salt(field.column())
                .default_open(true)
                .show(ui, |ui| {
                    changed |= Self::selection_ui(ui, field.column(), values, selected);
                });
        }

        changed
    }

    fn selection_ui(ui: &mut egui::Ui, id: &str, values: &[String], selected: &mut BTreeSet<String>) -> bool {
        let mut changed = false;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for value in values {
                            let mut checked = selected.contains(value);
                            if ui.checkbox(&mut checked, value).changed() {
                                if checked {
                                    selected.insert(value.clone());
                                } else {
                                    selected.remove(value);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                selected.extend(values.iter().cloned());
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                selected.clear();
                changed = true;
            }
        });

        changed
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseData,
    Reload,
    ClearCache,
    DashboardChanged,
    FiltersChanged,
    ExportCsv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, sample_dataset};

    fn options() -> FilterOptions {
        FilterOptions::from_dataset(&sample_dataset()).unwrap()
    }

    #[test]
    fn test_date_input_is_clamped() {
        let options = options();
        assert_eq!(parse_date_input("2025-01-03", &options), Some(day(3)));
        assert_eq!(parse_date_input(" 2024-12-01 ", &options), Some(day(1)));
        assert_eq!(parse_date_input("2025-02-01", &options), Some(day(6)));
        assert_eq!(parse_date_input("03/01/2025", &options), None);
    }

    #[test]
    fn test_commit_dates_updates_spec() {
        let options = options();
        let mut panel = ControlPanel::new();
        panel.update_filters(&options, &options.default_spec());
        assert_eq!(panel.start_text, "2025-01-01");
        assert_eq!(panel.end_text, "2025-01-06");

        panel.start_text = "2025-01-02".to_string();
        assert!(panel.commit_dates());
        assert_eq!(panel.spec.date_range, Some(DateRange::new(day(2), day(6))));
        assert!(!panel.commit_dates());
    }

    #[test]
    fn test_bad_date_keeps_previous_range() {
        let options = options();
        let mut panel = ControlPanel::new();
        panel.update_filters(&options, &options.default_spec());

        panel.end_text = "soon".to_string();
        assert!(!panel.commit_dates());
        assert_eq!(panel.spec.date_range, Some(DateRange::new(day(1), day(6))));
        assert_eq!(panel.end_text, "2025-01-06");
        assert!(panel.status.starts_with("Error"));
    }

    #[test]
    fn test_clear_filters_disables_export() {
        let options = options();
        let mut panel = ControlPanel::new();
        panel.update_filters(&options, &options.default_spec());
        assert!(panel.export_enabled);

        panel.clear_filters();
        assert!(!panel.export_enabled);
        assert_eq!(panel.spec, FilterSpec::default());
        assert!(panel.start_text.is_empty());
    }
}
