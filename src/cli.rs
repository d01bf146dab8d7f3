//! Command line interface.

use crate::dashboard::{Session, SessionState};
use crate::data::{DatasetCache, Field, FrameView};
use crate::export::{export_file_name, write_csv};
use crate::filter::{FilterOptions, FilterSpec};
use crate::report::format_report;
use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "mealytics", about = "Sales & revenue dashboard for mess food transactions.")]
pub struct Cli {
    /// Data file (CSV or Excel workbook); overrides the config file
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
    /// Config file (default: ~/.config/mealytics/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the dashboard window (default).
    Gui,
    /// Print KPIs and chart tables for the filtered data.
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Keep only these meal types (repeatable)
    #[arg(long)]
    pub meal_type: Vec<String>,
    #[arg(long)]
    pub consumer_type: Vec<String>,
    #[arg(long)]
    pub location: Vec<String>,
    #[arg(long)]
    pub payment_mode: Vec<String>,
    /// Write the filtered rows to this CSV file or directory
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl ReportArgs {
    fn selection(&self, field: Field) -> &[String] {
        match field {
            Field::MealType => &self.meal_type,
            Field::ConsumerType => &self.consumer_type,
            Field::Location => &self.location,
            Field::PaymentMode => &self.payment_mode,
            _ => &[],
        }
    }

    /// Start from the default filters and override what was given.
    pub fn to_spec(&self, options: &FilterOptions) -> FilterSpec {
        let mut spec = options.default_spec();

        if self.from.is_some() || self.to.is_some() {
            let bounds = options.date_bounds;
            let start = self.from.or(bounds.map(|b| b.start)).unwrap_or(NaiveDate::MIN);
            let end = self.to.or(bounds.map(|b| b.end)).unwrap_or(NaiveDate::MAX);
            spec = spec.with_date_range(start, end);
        }

        for field in crate::filter::CATEGORICAL_FIELDS {
            let values = self.selection(field);
            if !values.is_empty() {
                spec = spec.with_selection(field, values.iter().cloned());
            }
        }
        spec
    }
}

/// Resolve `--export`: a directory gets the default file name.
fn export_target(target: &Path, product: &str) -> PathBuf {
    if target.is_dir() {
        target.join(export_file_name(product))
    } else {
        target.to_path_buf()
    }
}

pub fn run_report(args: &ReportArgs, data_path: &Path, product: &str) -> Result<String> {
    let mut cache = DatasetCache::new();
    let mut session = Session::open(&mut cache, data_path);

    let spec = match &session.state {
        SessionState::LoadFailed(msg) => bail!("Could not load {}: {msg}", data_path.display()),
        SessionState::Failed(msg) => bail!("{msg}"),
        SessionState::Empty => return Ok(format!("{} has no rows.", data_path.display())),
        SessionState::MissingColumns { missing, .. } => {
            let names: Vec<String> = missing.iter().map(|f| format!("'{f}'")).collect();
            bail!("Missing required columns: {}", names.join(", "))
        }
        SessionState::Ready { options, .. } => args.to_spec(options),
    };
    session.apply(spec);

    let total_rows = session.dataset().map_or(0, |d| d.height());
    let report = session
        .report()
        .ok_or_else(|| anyhow!("Could not compute the report"))?;

    let mut out = format_report(report, total_rows);
    if let Some(target) = &args.export {
        let path = export_target(target, product);
        let rows = write_csv(&report.view, &path)?;
        info!("Report export finished");
        out.push_str(&format!("\nExported {rows} rows to {}\n", path.display()));
    }
    Ok(out)
}
