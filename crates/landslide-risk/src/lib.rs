//! landslide-risk: debris-volume estimation and risk classification for landslides.
//!
//! A linear model is fitted on historical landslide records (precipitation,
//! slope, time of day, landslide type, soil, vegetation) to predict the
//! displaced debris volume. Predictions are compared to a user threshold to
//! label sites as high or low risk.
//!
//! # Key Types
//!
//! - [`Trainer`] / [`TrainConfig`] - Cleaning, split, scaling and OLS fit
//! - [`RiskModel`] - Immutable bundle of fitted artifacts used for scoring
//! - [`ArtifactStore`] - Saving and loading the three JSON artifacts
//! - [`RiskThreshold`] / [`RiskClass`] - Classification of predicted volumes
//! - [`Frame`] - Column-oriented CSV table
//!
//! # Training
//!
//! Read a table with [`Frame::from_csv_path`], call [`Trainer::fit`] and save
//! the resulting model with [`ArtifactStore::save`].
//!
//! # Scoring
//!
//! Load a model with [`ArtifactStore::load`], then use
//! [`RiskModel::assess`] for a single site or [`RiskModel::score_frame`] for a
//! table.

pub mod config;
pub mod data;
pub mod inference;
pub mod model;
pub mod persist;
pub mod preprocess;
pub mod testing;
pub mod training;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, PreprocessConfig, TrainConfig};
pub use data::{FeatureColumns, Frame, FrameError};
pub use inference::{Assessment, InferenceError, ManualInput, RiskModel, RiskSummary, ScoredTable};
pub use model::{LinearModel, RiskClass, RiskThreshold, StandardScaler, ThresholdError};
pub use persist::{ArtifactError, ArtifactStore};
pub use preprocess::{CleaningReport, PreprocessError, Preprocessor};
pub use training::{EvalReport, MetricFn, TrainError, Trainer, TrainingOutcome};
