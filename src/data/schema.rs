//! Required-column check for the Sales & Revenue dashboard.

use super::dataset::FrameView;
use super::fields::{Field, REQUIRED_FIELDS};

/// Required fields absent from `view`; empty means the schema is usable.
pub fn missing_required(view: &impl FrameView) -> Vec<Field> {
    view.missing(&REQUIRED_FIELDS)
}
