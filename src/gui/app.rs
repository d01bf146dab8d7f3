//! Mealytics Main Application
//! Main window with control panel and dashboard viewer.

use crate::config::DashboardConfig;
use crate::dashboard::Session;
use crate::data::{DatasetCache, FrameView};
use crate::export::{export_file_name, write_csv};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DATA_EXTENSIONS: [&str; 6] = ["csv", "xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Main application window.
pub struct MealyticsApp {
    config: DashboardConfig,
    cache: DatasetCache,
    session: Option<Session>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl MealyticsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            config,
            cache: DatasetCache::new(),
            session: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        let path = app.config.data_path.clone();
        app.open(&path);
        app
    }

    /// Open a data source and show its default report.
    fn open(&mut self, path: &Path) {
        self.control_panel.data_path = Some(path.to_path_buf());
        let session = Session::open(&mut self.cache, path);
        self.session = Some(session);
        self.sync_panels();

        let status = match self.session.as_ref().and_then(|s| s.dataset()) {
            Some(dataset) => format!("Loaded {} rows", dataset.height()),
            None => "Error: could not load data".to_string(),
        };
        self.control_panel.set_status(&status);
    }

    /// Push the session state into both panels.
    fn sync_panels(&mut self) {
        let state = self.session.as_ref().map(|s| &s.state);
        self.chart_viewer.sync(state);
        match state {
            Some(crate::dashboard::SessionState::Ready { options, spec, .. }) => {
                self.control_panel.update_filters(options, spec);
            }
            _ => self.control_panel.clear_filters(),
        }
    }

    fn handle_browse_data(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &DATA_EXTENSIONS)
            .pick_file()
        {
            self.open(&path);
        }
    }

    fn handle_reload(&mut self) {
        let Some(path) = self.control_panel.data_path.clone() else {
            return;
        };
        if self.cache.invalidate(&path) {
            info!("Reloading {}", path.display());
        }
        self.open(&path);
    }

    fn handle_clear_cache(&mut self) {
        let dropped = self.cache.clear();
        info!("Cleared {dropped} cached dataset(s)");
        if let Some(path) = self.control_panel.data_path.clone() {
            self.open(&path);
        }
    }

    fn handle_filters_changed(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.apply(self.control_panel.spec.clone());
        }
        self.sync_panels();
        if let Some(report) = self.session.as_ref().and_then(|s| s.report()) {
            self.control_panel
                .set_status(&format!("{} rows match the filters", report.view.height()));
        }
    }

    fn handle_export_csv(&mut self) {
        let Some(report) = self.session.as_ref().and_then(|s| s.report()) else {
            self.control_panel.set_status("Nothing to export");
            return;
        };

        let output_path: PathBuf = match rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(export_file_name(&self.config.product_name))
            .save_file()
        {
            Some(path) => path,
            None => return,
        };

        let status = match write_csv(&report.view, &output_path) {
            Ok(rows) => format!("Exported {rows} rows"),
            Err(e) => {
                warn!("{e}");
                format!("Error: {e}")
            }
        };
        self.control_panel.set_status(&status);
    }
}

impl eframe::App for MealyticsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseData => self.handle_browse_data(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ClearCache => self.handle_clear_cache(),
                        ControlPanelAction::FiltersChanged => self.handle_filters_changed(),
                        ControlPanelAction::DashboardChanged => {
                            info!("Switched to {}", self.control_panel.dashboard.title());
                        }
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_rows = self
                .session
                .as_ref()
                .and_then(|s| s.dataset())
                .map_or(0, |d| d.height());
            self.chart_viewer.show(
                ui,
                self.control_panel.dashboard,
                self.session.as_ref().map(|s| &s.state),
                total_rows,
            );
        });
    }
}
