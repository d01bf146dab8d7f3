//! Filter module - filter specification, picker domains and the filter engine

mod engine;
mod options;
mod spec;

pub use engine::FilterEngine;
pub use options::FilterOptions;
pub use spec::{DateRange, FilterSpec, CATEGORICAL_FIELDS};
