//! Scoring with fitted artifacts.
//!
//! [`RiskModel`] bundles the feature schema, the scaler and the linear model.
//! It is built once (by training or by loading artifacts), never mutated, and
//! passed explicitly to every scoring call.
//!
//! - [`RiskModel::assess`]: single manual entry → [`Assessment`]
//! - [`RiskModel::score_frame`]: bulk table → [`ScoredTable`]

mod align;

pub use align::FeatureAligner;

use ndarray::{Array1, ArrayView2};

use crate::config::PreprocessConfig;
use crate::data::{columns, Column, FeatureColumns, Frame, FrameError};
use crate::model::{LinearModel, RiskClass, RiskThreshold, StandardScaler};

/// Errors raised while scoring.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("column {column} at row {} is not a number: {value:?}", .row + 1)]
    InvalidValue {
        /// Zero-based data row.
        row: usize,
        column: String,
        value: String,
    },

    #[error("timestamp at row {} could not be parsed: {value:?}", .row + 1)]
    InvalidTimestamp { row: usize, value: String },

    #[error("hour must be within 0..=23, got {0}")]
    InvalidHour(u32),

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Fitted components disagree on the number of features.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("feature count mismatch: {columns} columns, {scaler} scaler entries, {weights} model weights")]
pub struct ShapeMismatch {
    pub columns: usize,
    pub scaler: usize,
    pub weights: usize,
}

/// One manually entered site.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualInput {
    pub precipitation_mm_24h: f64,
    pub slope_degrees: f64,
    /// Hour of day, 0–23.
    pub hour: u32,
    pub soil_type: String,
    pub vegetation_cover: String,
    pub landslide_type: String,
}

impl ManualInput {
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.hour > 23 {
            return Err(InferenceError::InvalidHour(self.hour));
        }
        for (field, value) in [
            (columns::PRECIPITATION, self.precipitation_mm_24h),
            (columns::SLOPE, self.slope_degrees),
        ] {
            if !value.is_finite() {
                return Err(InferenceError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// `(field, choice)` pairs of the categorical selections.
    pub fn categorical_choices(&self) -> [(&'static str, &str); 3] {
        [
            (columns::LANDSLIDE_TYPE, self.landslide_type.as_str()),
            (columns::SOIL_TYPE, self.soil_type.as_str()),
            (columns::VEGETATION_COVER, self.vegetation_cover.as_str()),
        ]
    }
}

/// Result of scoring one manual entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    /// Predicted debris volume (m³).
    pub volume: f64,
    pub class: RiskClass,
    pub threshold: RiskThreshold,
    /// `volume / (1.5 · threshold)` clamped to `[0, 1]`.
    pub severity: f64,
}

/// Counts of each risk class in a scored table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskSummary {
    pub high: usize,
    pub low: usize,
}

/// Uploaded table augmented with predictions.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    /// Upload columns followed by `volume_previsto_m3` and `classificacao_risco`.
    pub frame: Frame,
    pub predictions: Array1<f64>,
    pub classes: Vec<RiskClass>,
}

impl ScoredTable {
    pub fn summary(&self) -> RiskSummary {
        let high = self.classes.iter().filter(|c| c.is_high()).count();
        RiskSummary {
            high,
            low: self.classes.len() - high,
        }
    }
}

/// Immutable bundle of fitted artifacts.
#[derive(Debug, Clone)]
pub struct RiskModel {
    columns: FeatureColumns,
    scaler: StandardScaler,
    model: LinearModel,
    schema: PreprocessConfig,
}

impl RiskModel {
    /// Bundle fitted components, checking they describe the same features.
    pub fn new(
        columns: FeatureColumns,
        scaler: StandardScaler,
        model: LinearModel,
    ) -> Result<Self, ShapeMismatch> {
        if columns.len() != scaler.n_features() || columns.len() != model.n_features() {
            return Err(ShapeMismatch {
                columns: columns.len(),
                scaler: scaler.n_features(),
                weights: model.n_features(),
            });
        }
        Ok(Self {
            columns,
            scaler,
            model,
            schema: PreprocessConfig::default(),
        })
    }

    /// Use a non-default raw schema when encoding raw fields at inference.
    pub fn with_schema(mut self, schema: PreprocessConfig) -> Self {
        self.schema = schema;
        self
    }

    pub fn columns(&self) -> &FeatureColumns {
        &self.columns
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn linear(&self) -> &LinearModel {
        &self.model
    }

    pub fn schema(&self) -> &PreprocessConfig {
        &self.schema
    }

    pub fn aligner(&self) -> FeatureAligner<'_> {
        FeatureAligner::new(&self.columns, &self.schema)
    }

    /// Predict volumes from unscaled features aligned to [`Self::columns`].
    pub fn predict_features(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        let scaled = self.scaler.transform(features);
        self.model.predict(scaled.view())
    }

    /// Predict the volume of a manual entry.
    pub fn predict_manual(&self, input: &ManualInput) -> Result<f64, InferenceError> {
        let row = self.aligner().align_manual(input)?;
        let scaled = self.scaler.transform_row(row.view());
        Ok(self.model.predict_row(scaled.view()))
    }

    /// Predict and classify a manual entry.
    pub fn assess(
        &self,
        input: &ManualInput,
        threshold: RiskThreshold,
    ) -> Result<Assessment, InferenceError> {
        let volume = self.predict_manual(input)?;
        Ok(Assessment {
            volume,
            class: threshold.classify(volume),
            threshold,
            severity: threshold.severity(volume),
        })
    }

    /// Predict one volume per row of an uploaded table.
    pub fn predict_frame(&self, frame: &Frame) -> Result<Array1<f64>, InferenceError> {
        let features = self.aligner().align_frame(frame)?;
        Ok(self.predict_features(features.view()))
    }

    /// Score an uploaded table, appending predicted volume and risk label.
    ///
    /// Existing prediction columns in the upload are replaced.
    pub fn score_frame(
        &self,
        frame: &Frame,
        threshold: RiskThreshold,
    ) -> Result<ScoredTable, InferenceError> {
        let predictions = self.predict_frame(frame)?;
        let classes: Vec<RiskClass> = predictions.iter().map(|&v| threshold.classify(v)).collect();

        let mut scored = frame.clone();
        scored.drop_column(columns::PREDICTED_VOLUME);
        scored.drop_column(columns::RISK_CLASS);
        scored.push_column(Column::numeric(columns::PREDICTED_VOLUME, predictions.to_vec()))?;
        scored.push_column(Column::text(
            columns::RISK_CLASS,
            classes.iter().map(|c| Some(c.label().to_string())).collect(),
        ))?;

        let table = ScoredTable { frame: scored, predictions, classes };
        let summary = table.summary();
        tracing::info!(
            rows = frame.n_rows(),
            high = summary.high,
            low = summary.low,
            threshold = threshold.value(),
            "scored table"
        );
        Ok(table)
    }
}
