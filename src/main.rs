//! Mealytics - Sales & Revenue Dashboard for mess food transactions
//!
//! Loads a CSV or Excel export, applies date and category filters, and shows
//! KPIs and charts in a native window or as terminal tables.

mod charts;
mod cli;
mod config;
mod dashboard;
mod data;
mod export;
mod filter;
mod fmt;
mod gui;
mod report;
mod stats;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::DashboardConfig;
use eframe::egui;
use gui::MealyticsApp;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_gui(config: DashboardConfig) -> Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Mealytics Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Mealytics Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(MealyticsApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    init_logging(&config.log_level);

    match cli.command {
        Some(Commands::Report(args)) => {
            let text = cli::run_report(&args, &config.data_path, &config.product_name)?;
            print!("{text}");
            Ok(())
        }
        Some(Commands::Gui) | None => run_gui(config),
    }
}
