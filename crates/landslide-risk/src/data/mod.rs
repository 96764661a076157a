//! Tabular data handling.
//!
//! - [`Frame`]: column-oriented table with per-column type inference, read from
//!   and written to CSV
//! - [`FeatureColumns`]: the ordered feature schema a fitted model expects
//! - [`columns`]: canonical column names of the landslide dataset

mod frame;
mod schema;

pub use frame::{Column, ColumnData, Frame, FrameError, MISSING_MARKERS};
pub use schema::{columns, indicator_name, FeatureColumns};
