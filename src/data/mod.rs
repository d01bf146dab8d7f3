//! Data module - loading, normalization, caching and schema checks

mod cache;
pub mod columns;
mod dataset;
mod fields;
mod loader;
mod processor;
mod schema;

pub use cache::DatasetCache;
pub use dataset::{Dataset, FilteredView, FrameView, Unavailable};
pub use fields::Field;
pub use schema::missing_required;
