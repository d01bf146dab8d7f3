//! Presentation formatting for KPI values.

/// Group the integer digits with commas: 1234567 -> "1,234,567".
fn with_commas(digits: &str) -> String {
    let mut out = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

/// Whole rupees with thousands separators: ₹1,235
pub fn rupees(val: f64) -> String {
    let rounded = format!("{:.0}", val.abs());
    let sign = if val < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{sign}₹{}", with_commas(&rounded))
}

/// Rupees, or "N/A" when the metric is not available.
pub fn rupees_or_na(val: Option<f64>) -> String {
    val.map(rupees).unwrap_or_else(|| "N/A".to_string())
}

pub fn count(val: usize) -> String {
    with_commas(&val.to_string())
}

pub fn rating(val: Option<f64>) -> String {
    match val {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

pub fn percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}
