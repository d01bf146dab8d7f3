//! Field Vocabulary Module
//! Canonical column names of a meal-service transaction record.

use std::fmt;

/// How a field is coerced at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Numeric,
    Text,
}

/// A known column of the transaction dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    OrderId,
    Date,
    ItemName,
    MealType,
    ConsumerType,
    Location,
    PaymentMode,
    Quantity,
    UnitPrice,
    FinalAmount,
    TotalAmount,
    Profit,
    Rating,
    RepeatCustomer,
    DayOfWeek,
}

/// Fields without which the Sales & Revenue dashboard cannot run.
pub const REQUIRED_FIELDS: [Field; 6] = [
    Field::OrderId,
    Field::Date,
    Field::ItemName,
    Field::FinalAmount,
    Field::Profit,
    Field::Quantity,
];

impl Field {
    pub const ALL: [Field; 15] = [
        Field::OrderId,
        Field::Date,
        Field::ItemName,
        Field::MealType,
        Field::ConsumerType,
        Field::Location,
        Field::PaymentMode,
        Field::Quantity,
        Field::UnitPrice,
        Field::FinalAmount,
        Field::TotalAmount,
        Field::Profit,
        Field::Rating,
        Field::RepeatCustomer,
        Field::DayOfWeek,
    ];

    /// Normalized column name.
    pub fn column(self) -> &'static str {
        match self {
            Field::OrderId => "order_id",
            Field::Date => "date",
            Field::ItemName => "item_name",
            Field::MealType => "meal_type",
            Field::ConsumerType => "consumer_type",
            Field::Location => "location",
            Field::PaymentMode => "payment_mode",
            Field::Quantity => "quantity",
            Field::UnitPrice => "unit_price",
            Field::FinalAmount => "final_amount",
            Field::TotalAmount => "total_amount",
            Field::Profit => "profit",
            Field::Rating => "rating",
            Field::RepeatCustomer => "repeat_customer",
            Field::DayOfWeek => "day_of_week",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Date => FieldKind::Date,
            Field::Quantity
            | Field::UnitPrice
            | Field::FinalAmount
            | Field::TotalAmount
            | Field::Profit
            | Field::Rating => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }

    /// Human label used by filter pickers and chart captions.
    pub fn label(self) -> &'static str {
        match self {
            Field::OrderId => "Order ID",
            Field::Date => "Date",
            Field::ItemName => "Item",
            Field::MealType => "Meal Type",
            Field::ConsumerType => "Consumer Type",
            Field::Location => "Location",
            Field::PaymentMode => "Payment Mode",
            Field::Quantity => "Quantity",
            Field::UnitPrice => "Unit Price",
            Field::FinalAmount => "Revenue",
            Field::TotalAmount => "Total Amount",
            Field::Profit => "Profit",
            Field::Rating => "Rating",
            Field::RepeatCustomer => "Repeat Customer",
            Field::DayOfWeek => "Day of Week",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Normalize a raw header: trim, lowercase, spaces and hyphens to underscores.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}
