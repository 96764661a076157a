//! End-to-end training: clean, split, scale, fit, evaluate.

use ndarray::Axis;

use crate::config::TrainConfig;
use crate::data::Frame;
use crate::inference::{RiskModel, ShapeMismatch};
use crate::model::StandardScaler;
use crate::preprocess::{CategoryLevels, CleaningReport, PreprocessError, Preprocessor};

use super::metrics::{MetricFn, RSquared, Rmse};
use super::ols::OlsSolver;
use super::split::train_test_split;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("at least 2 clean rows are needed to train and evaluate, got {rows}")]
    InsufficientData { rows: usize },

    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
}

// ============================================================================
// Outcome
// ============================================================================

/// Held-out evaluation of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalReport {
    pub n_train: usize,
    pub n_test: usize,
    /// Root mean squared error on the test rows (m³).
    pub rmse: f64,
    pub r2: f64,
}

/// Everything produced by one training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: RiskModel,
    pub evaluation: EvalReport,
    pub cleaning: CleaningReport,
    pub levels: Vec<CategoryLevels>,
}

// ============================================================================
// Trainer
// ============================================================================

/// Linear regression trainer for debris volume.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train on a raw landslide table.
    ///
    /// The scaler is fitted on the training rows only; evaluation uses the
    /// held-out rows transformed with that scaler.
    pub fn fit(&self, frame: Frame) -> Result<TrainingOutcome, TrainError> {
        let cfg = &self.config;
        let prepared = Preprocessor::new(cfg.preprocess.clone()).fit_transform(frame)?;

        let n_rows = prepared.features.nrows();
        if n_rows < 2 {
            return Err(TrainError::InsufficientData { rows: n_rows });
        }

        let split = train_test_split(n_rows, cfg.test_fraction, cfg.seed);
        let x_train = prepared.features.select(Axis(0), &split.train);
        let y_train = prepared.targets.select(Axis(0), &split.train);
        let x_test = prepared.features.select(Axis(0), &split.test);
        let y_test = prepared.targets.select(Axis(0), &split.test);
        tracing::info!(
            train = split.train.len(),
            test = split.test.len(),
            features = prepared.columns.len(),
            seed = cfg.seed,
            "split dataset"
        );

        let scaler = StandardScaler::fit(x_train.view());
        let scaled_train = scaler.transform(x_train.view());
        let linear = OlsSolver::new(cfg.pivot_tolerance).fit(scaled_train.view(), y_train.view());
        tracing::debug!(intercept = linear.intercept(), "fitted linear model");

        let model = RiskModel::new(prepared.columns, scaler, linear)?
            .with_schema(cfg.preprocess.clone());

        let predictions = model.predict_features(x_test.view());
        let evaluation = EvalReport {
            n_train: split.train.len(),
            n_test: split.test.len(),
            rmse: Rmse.compute(predictions.view(), y_test.view()),
            r2: RSquared.compute(predictions.view(), y_test.view()),
        };
        tracing::info!(
            rmse = evaluation.rmse,
            r2 = evaluation.r2,
            "evaluated on held-out rows"
        );

        Ok(TrainingOutcome {
            model,
            evaluation,
            cleaning: prepared.report,
            levels: prepared.levels,
        })
    }
}
