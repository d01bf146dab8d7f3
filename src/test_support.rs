//! Shared fixtures for unit tests.

use crate::data::Dataset;
use chrono::NaiveDate;
use polars::prelude::*;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

/// Ten mess transactions with raw headers and a few malformed cells.
///
/// Row 9 has an unparseable date and a non-canonical weekday, row 6 has no
/// location, row 10 has no profit, rows 7 and 8 share an order id.
pub fn sample_dataset() -> Dataset {
    let df = df!(
        "Order ID" => ["O1", "O2", "O3", "O4", "O5", "O6", "O7", "O7", "O9", "O10"],
        "Date" => [
            "2025-01-01", "2025-01-01", "2025-01-02", "2025-01-03", "2025-01-04",
            "2025-01-05", "2025-01-06", "2025-01-06", "not a date", "2025-01-02",
        ],
        "Item Name" => ["Idli", "Dosa", "Thali", "Biryani", "Idli", "Thali", "Dosa", "Vada", "Idli", "Coffee"],
        "Meal Type" => ["Breakfast", "Lunch", "Lunch", "Dinner", "Breakfast", "Dinner", "Lunch", "Lunch", "Breakfast", "Snacks"],
        "Consumer Type" => ["Student", "Staff", "Student", "Student", "Guest", "Staff", "Student", "Student", "Student", "Staff"],
        "Location" => [
            Some("Hostel A"), Some("Hostel B"), Some("Hostel A"), Some("Hostel B"), Some("Hostel A"),
            None, Some("Hostel B"), Some("Hostel B"), Some("Hostel A"), Some("Hostel A"),
        ],
        "Payment Mode" => ["UPI", "Cash", "UPI", "Card", "UPI", "UPI", "Cash", "Cash", "UPI", "Card"],
        "Quantity" => [2.0, 1.0, 3.0, 2.0, 4.0, 1.0, 2.0, 3.0, 1.0, 5.0],
        "Unit Price" => [20.0, 50.0, 80.0, 120.0, 20.0, 80.0, 50.0, 15.0, 20.0, 10.0],
        "Final Amount" => [40.0, 50.0, 240.0, 240.0, 80.0, 80.0, 100.0, 45.0, 20.0, 50.0],
        "Profit" => [
            Some(10.0), Some(15.0), Some(60.0), Some(70.0), Some(20.0),
            Some(25.0), Some(30.0), Some(12.0), Some(5.0), None,
        ],
        "Rating" => [
            Some(4.0), Some(3.5), Some(5.0), None, Some(4.5),
            Some(4.0), Some(3.0), None, Some(4.0), Some(4.0),
        ],
        "Repeat Customer" => ["Yes", "no", "YES", "No", "yes", "No", "No", "No", "No", "No"],
        "Day of Week" => [
            "Wednesday", "Wednesday", "Thursday", "Friday", "Saturday",
            "Sunday", "Monday", "Monday", "Funday", "Thursday",
        ],
    )
    .unwrap();
    Dataset::from_frame(df).unwrap()
}
