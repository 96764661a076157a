//! Schema types for artifact serialization.
//!
//! These types are the stable on-disk format, kept separate from the runtime
//! types so the two can evolve independently. Every artifact carries its own
//! `version`.

use serde::{Deserialize, Serialize};

/// Current artifact schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Fitted linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub version: u32,
    /// Number of features (length of `coefficients`).
    pub num_features: usize,
    /// One coefficient per feature, in feature column order.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Fitted standard scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerSchema {
    pub version: u32,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Ordered feature names the model was fitted against, with the raw table
/// schema used to encode uploads against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumnsSchema {
    pub version: u32,
    pub columns: Vec<String>,
    pub preprocess: PreprocessSchema,
}

/// Raw table schema and cleaning rules from training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessSchema {
    pub identifier_columns: Vec<String>,
    pub timestamp_column: String,
    pub hour_column: String,
    pub categorical_columns: Vec<String>,
    pub outlier_columns: Vec<String>,
    pub iqr_multiplier: f64,
    pub target_column: String,
}
