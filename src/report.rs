//! Text rendering of a sales report for the terminal.

use crate::charts::{
    weekday_name, CategoryProfit, ChartPreparer, ChartResult, DailyTrend, DailyTrendChart,
    ItemQuantity, PaymentShare, PaymentShareChart, ProfitByCategoryChart, TopItemsChart,
    WeekdayHeatmapChart, WeekdayPivot,
};
use crate::dashboard::SalesReport;
use crate::fmt::{count, percent, rating, rupees, rupees_or_na};
use crate::stats::Kpis;
use comfy_table::{Cell, CellAlignment, Table};

fn titled(title: &str, body: String) -> String {
    format!("{title}\n{body}\n")
}

/// Chart table, or the reason it is unavailable.
fn section<T>(title: &str, result: &ChartResult<T>, render: impl FnOnce(&T) -> Table) -> String {
    match result {
        Ok(data) => titled(title, render(data).to_string()),
        Err(reason) => format!("{title}: {reason}\n"),
    }
}

fn amount(val: f64) -> Cell {
    Cell::new(val).set_alignment(CellAlignment::Right)
}

pub fn format_kpis(kpis: &Kpis, total_rows: usize) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Total Revenue".to_string(), rupees(kpis.total_revenue)]);
    table.add_row(vec!["Total Profit".to_string(), rupees_or_na(kpis.total_profit)]);
    table.add_row(vec!["Total Orders".to_string(), count(kpis.total_orders)]);
    table.add_row(vec!["Avg Rating".to_string(), rating(kpis.avg_rating)]);
    if let Some(repeats) = kpis.repeat_customers {
        table.add_row(vec!["Repeat Customer Orders".to_string(), count(repeats)]);
    }
    table.add_row(vec![
        "Rows".to_string(),
        format!("{} of {}", count(kpis.row_count), count(total_rows)),
    ]);
    table.to_string()
}

fn daily_table(trend: &DailyTrend) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Revenue"]);
    for (date, revenue) in trend.iter() {
        table.add_row(vec![Cell::new(date.format("%Y-%m-%d")), Cell::new(rupees(revenue))]);
    }
    table
}

fn items_table(items: &[ItemQuantity]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Item", "Quantity"]);
    for item in items {
        table.add_row(vec![Cell::new(&item.item), amount(item.quantity)]);
    }
    table
}

fn profit_table(profits: &[CategoryProfit]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Meal Type", "Profit"]);
    for p in profits {
        table.add_row(vec![Cell::new(&p.category), Cell::new(rupees(p.profit))]);
    }
    table
}

fn heatmap_table(pivot: &WeekdayPivot) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Weekday".to_string()];
    header.extend(pivot.categories.iter().cloned());
    table.set_header(header);
    for (weekday, row) in pivot.weekdays.iter().zip(&pivot.cells) {
        let mut cells = vec![Cell::new(weekday_name(*weekday))];
        cells.extend(row.iter().map(|v| amount(*v)));
        table.add_row(cells);
    }
    table
}

fn payment_table(shares: &[PaymentShare]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Payment Mode", "Orders", "Share"]);
    for share in shares {
        table.add_row(vec![
            Cell::new(&share.mode),
            Cell::new(count(share.count)),
            Cell::new(percent(share.share)),
        ]);
    }
    table
}

/// KPIs followed by every chart as a table.
pub fn format_report(report: &SalesReport, total_rows: usize) -> String {
    let charts = &report.charts;
    let mut out = titled("Sales & Revenue", format_kpis(&report.kpis, total_rows));
    out.push('\n');
    out.push_str(&section(DailyTrendChart::TITLE, &charts.daily_trend, daily_table));
    out.push('\n');
    out.push_str(&section(TopItemsChart::TITLE, &charts.top_items, |items| items_table(items)));
    out.push('\n');
    out.push_str(&section(ProfitByCategoryChart::TITLE, &charts.profit_by_category, |p| {
        profit_table(p)
    }));
    out.push('\n');
    out.push_str(&section(WeekdayHeatmapChart::TITLE, &charts.weekday_heatmap, heatmap_table));
    out.push('\n');
    out.push_str(&section(PaymentShareChart::TITLE, &charts.payment_share, |s| payment_table(s)));
    out
}
