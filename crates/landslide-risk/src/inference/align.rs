//! Alignment of inference inputs to the stored feature schema.
//!
//! Manual entries and bulk uploads go through the same encoder: every output
//! row has exactly the stored columns, in stored order. Stored columns the
//! input lacks are zero and unknown input columns are ignored. Raw categorical
//! fields and raw timestamps are encoded with the training rules when the
//! upload does not already carry their encoded form. Outlier filtering is
//! never applied at inference.

use ndarray::{Array1, Array2};

use crate::config::PreprocessConfig;
use crate::data::{columns, indicator_name, Column, FeatureColumns, Frame};
use crate::preprocess::parse_hour;

use super::{InferenceError, ManualInput};

/// Builds feature rows shaped to a [`FeatureColumns`] schema.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAligner<'a> {
    columns: &'a FeatureColumns,
    schema: &'a PreprocessConfig,
}

impl<'a> FeatureAligner<'a> {
    pub fn new(columns: &'a FeatureColumns, schema: &'a PreprocessConfig) -> Self {
        Self { columns, schema }
    }

    /// Build one feature row from a manual entry.
    ///
    /// Starts from all zeros, sets the three numeric inputs and the indicator
    /// of each categorical choice. Choices without an indicator column (the
    /// reference category or a category never seen in training) set nothing.
    pub fn align_manual(&self, input: &ManualInput) -> Result<Array1<f64>, InferenceError> {
        input.validate()?;

        let mut row = Array1::zeros(self.columns.len());
        let mut set = |name: &str, value: f64| {
            if let Some(j) = self.columns.index_of(name) {
                row[j] = value;
            }
        };

        set(columns::PRECIPITATION, input.precipitation_mm_24h);
        set(columns::SLOPE, input.slope_degrees);
        set(self.schema.hour_column.as_str(), f64::from(input.hour));
        for (field, choice) in input.categorical_choices() {
            set(indicator_name(field, choice).as_str(), 1.0);
        }

        Ok(row)
    }

    /// Reindex an uploaded table to the stored schema.
    ///
    /// Row count and order are preserved. A stored column present in the
    /// upload must hold a number in every row.
    pub fn align_frame(&self, frame: &Frame) -> Result<Array2<f64>, InferenceError> {
        let n_rows = frame.n_rows();
        let mut features = Array2::zeros((n_rows, self.columns.len()));

        for (j, name) in self.columns.iter().enumerate() {
            if let Some(column) = frame.column(name) {
                for r in 0..n_rows {
                    features[[r, j]] = numeric_cell(column, r)?;
                }
            }
        }

        self.derive_hour(frame, &mut features)?;
        self.encode_raw_categoricals(frame, &mut features);

        Ok(features)
    }

    fn derive_hour(&self, frame: &Frame, features: &mut Array2<f64>) -> Result<(), InferenceError> {
        let hour_column = &self.schema.hour_column;
        if frame.contains(hour_column) {
            return Ok(());
        }
        let (Some(j), Some(timestamps)) = (
            self.columns.index_of(hour_column),
            frame.column(&self.schema.timestamp_column),
        ) else {
            return Ok(());
        };

        for r in 0..frame.n_rows() {
            let raw = timestamps.text_at(r).unwrap_or_default();
            let hour = parse_hour(&raw).ok_or_else(|| InferenceError::InvalidTimestamp {
                row: r,
                value: raw.clone(),
            })?;
            features[[r, j]] = f64::from(hour);
        }
        tracing::debug!(column = %hour_column, "derived hour from raw timestamp");
        Ok(())
    }

    fn encode_raw_categoricals(&self, frame: &Frame, features: &mut Array2<f64>) {
        for field in &self.schema.categorical_columns {
            let Some(raw) = frame.column(field) else {
                continue;
            };
            if self.columns.indicators_of(field).any(|name| frame.contains(name)) {
                continue;
            }
            for r in 0..frame.n_rows() {
                let Some(category) = raw.text_at(r) else {
                    continue;
                };
                if let Some(j) = self.columns.index_of(&indicator_name(field, &category)) {
                    features[[r, j]] = 1.0;
                }
            }
            tracing::debug!(field = %field, "encoded raw categorical field");
        }
    }
}

fn numeric_cell(column: &Column, row: usize) -> Result<f64, InferenceError> {
    column.value_at(row).ok_or_else(|| InferenceError::InvalidValue {
        row,
        column: column.name().to_string(),
        value: column.text_at(row).unwrap_or_default(),
    })
}
