//! Feature preprocessing for training.
//!
//! [`Preprocessor::fit_transform`] turns a raw landslide table into a numeric
//! feature matrix, a target vector and the [`FeatureColumns`] the model is
//! fitted against:
//!
//! 1. drop identifier columns (absence is fine)
//! 2. derive `horario` from `data_hora`, dropping rows with invalid timestamps
//! 3. one-hot encode categorical fields, dropping the first sorted category
//! 4. IQR outlier filtering per column, in configured order
//! 5. drop rows with any missing value
//!
//! Inference-time alignment lives in [`crate::inference`].

mod encode;
mod outliers;
mod timestamp;

pub use encode::CategoryLevels;
pub use outliers::{filter_column, quantile_sorted, IqrFence, OutlierPass};
pub use timestamp::parse_hour;

use ndarray::{Array1, Array2};

use crate::config::PreprocessConfig;
use crate::data::{Column, FeatureColumns, Frame, FrameError};

/// Errors raised while preparing training data.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("column {0} must be numeric")]
    NonNumericColumn(String),
}

/// Row accounting for one cleaning run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    pub initial_rows: usize,
    /// Rows dropped because the timestamp did not parse.
    pub invalid_timestamps: usize,
    /// One entry per outlier column, in application order.
    pub outlier_passes: Vec<OutlierPass>,
    /// Rows dropped in the final missing-value sweep.
    pub missing_values: usize,
    pub final_rows: usize,
}

/// Output of [`Preprocessor::fit_transform`].
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Shape `[n_rows, n_features]`, columns ordered as [`Self::columns`].
    pub features: Array2<f64>,
    /// Debris volume, length `n_rows`.
    pub targets: Array1<f64>,
    pub columns: FeatureColumns,
    /// Levels learned per categorical field, in encoding order.
    pub levels: Vec<CategoryLevels>,
    pub report: CleaningReport,
}

/// Fit-time feature preprocessing.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Clean and encode a raw training table.
    ///
    /// # Errors
    ///
    /// - [`FrameError::MissingColumn`] if the timestamp, a categorical field,
    ///   an outlier column or the target is absent
    /// - [`PreprocessError::NonNumericColumn`] if any column left after
    ///   encoding (outlier columns, the target, passthrough fields) holds text
    pub fn fit_transform(&self, mut frame: Frame) -> Result<PreparedData, PreprocessError> {
        let cfg = &self.config;
        self.check_required(&frame)?;

        let mut report = CleaningReport {
            initial_rows: frame.n_rows(),
            ..Default::default()
        };

        for column in &cfg.identifier_columns {
            frame.drop_column(column);
        }

        report.invalid_timestamps = self.derive_hour(&mut frame)?;
        tracing::info!(
            column = %cfg.timestamp_column,
            dropped = report.invalid_timestamps,
            "derived hour of day"
        );

        let levels = self.encode_categoricals(&mut frame)?;
        if let Some(column) = frame.columns().iter().find(|c| !c.is_numeric()) {
            return Err(PreprocessError::NonNumericColumn(column.name().to_string()));
        }

        for column in &cfg.outlier_columns {
            let pass = filter_column(&mut frame, column, cfg.iqr_multiplier)?;
            tracing::info!(
                column = %pass.column,
                removed = pass.rows_removed,
                remaining = frame.n_rows(),
                "removed outliers"
            );
            report.outlier_passes.push(pass);
        }

        let complete: Vec<bool> = (0..frame.n_rows())
            .map(|row| frame.columns().iter().all(|c| c.value_at(row).is_some()))
            .collect();
        let before = frame.n_rows();
        frame.retain_rows(&complete);
        report.missing_values = before - frame.n_rows();
        report.final_rows = frame.n_rows();
        tracing::info!(
            dropped = report.missing_values,
            rows = report.final_rows,
            columns = frame.n_columns(),
            "finished cleaning"
        );

        let target = frame
            .drop_column(&cfg.target_column)
            .ok_or_else(|| FrameError::MissingColumn(cfg.target_column.clone()))?;
        if !target.is_numeric() {
            return Err(PreprocessError::NonNumericColumn(cfg.target_column.clone()));
        }
        let targets: Array1<f64> = (0..target.len())
            .map(|r| target.value_at(r).unwrap_or(f64::NAN))
            .collect();

        let features = Array2::from_shape_fn((frame.n_rows(), frame.n_columns()), |(r, c)| {
            frame.columns()[c].value_at(r).unwrap_or(f64::NAN)
        });
        let columns = FeatureColumns::new(frame.column_names().map(str::to_string).collect())?;

        Ok(PreparedData { features, targets, columns, levels, report })
    }

    fn check_required(&self, frame: &Frame) -> Result<(), FrameError> {
        let cfg = &self.config;
        std::iter::once(&cfg.timestamp_column)
            .chain(&cfg.categorical_columns)
            .chain(&cfg.outlier_columns)
            .chain(std::iter::once(&cfg.target_column))
            .try_for_each(|name| frame.require(name).map(|_| ()))
    }

    /// Replace the timestamp by the hour column; returns rows dropped.
    fn derive_hour(&self, frame: &mut Frame) -> Result<usize, PreprocessError> {
        let cfg = &self.config;
        let timestamps = frame
            .drop_column(&cfg.timestamp_column)
            .ok_or_else(|| FrameError::MissingColumn(cfg.timestamp_column.clone()))?;

        let hours: Vec<Option<u32>> = (0..timestamps.len())
            .map(|r| timestamps.text_at(r).as_deref().and_then(parse_hour))
            .collect();
        let keep: Vec<bool> = hours.iter().map(Option::is_some).collect();

        frame.drop_column(&cfg.hour_column);
        frame.push_column(Column::numeric(
            cfg.hour_column.clone(),
            hours.iter().map(|h| h.map_or(f64::NAN, f64::from)).collect(),
        ))?;

        let before = frame.n_rows();
        frame.retain_rows(&keep);
        Ok(before - frame.n_rows())
    }

    /// Replace categorical fields by indicators appended after the other columns.
    fn encode_categoricals(&self, frame: &mut Frame) -> Result<Vec<CategoryLevels>, PreprocessError> {
        let mut levels = Vec::with_capacity(self.config.categorical_columns.len());
        let mut indicators = Vec::new();
        for field in &self.config.categorical_columns {
            let column = frame
                .drop_column(field)
                .ok_or_else(|| FrameError::MissingColumn(field.clone()))?;
            let field_levels = CategoryLevels::fit(&column);
            tracing::debug!(
                field = %field,
                reference = ?field_levels.reference,
                indicators = field_levels.encoded.len(),
                "encoded categorical field"
            );
            indicators.extend(field_levels.encode(&column));
            levels.push(field_levels);
        }
        for column in indicators {
            frame.push_column(column)?;
        }
        Ok(levels)
    }
}
