//! Pipeline configuration with builder pattern.
//!
//! [`PreprocessConfig`] describes the raw table schema and the cleaning rules;
//! [`TrainConfig`] adds the evaluation split and solver settings. Both use the
//! `bon` crate for builder generation and validate on `build()`.
//!
//! # Example
//!
//! ```
//! use landslide_risk::config::{PreprocessConfig, TrainConfig};
//!
//! // Landslide schema, 80/20 split with seed 42
//! let config = TrainConfig::builder().build().unwrap();
//! assert_eq!(config.seed, 42);
//!
//! // Stricter outlier fences
//! let preprocess = PreprocessConfig::builder()
//!     .iqr_multiplier(1.0)
//!     .build()
//!     .unwrap();
//! let config = TrainConfig::builder()
//!     .preprocess(preprocess)
//!     .test_fraction(0.25)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::data::columns;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("iqr_multiplier must be finite and non-negative, got {0}")]
    InvalidIqrMultiplier(f64),

    #[error("outlier column {column} is {reason} and cannot be filtered on")]
    UnavailableOutlierColumn {
        column: String,
        reason: &'static str,
    },

    #[error("target column {column} is {reason}")]
    InvalidTarget {
        column: String,
        reason: &'static str,
    },

    #[error("column {0} is listed more than once")]
    DuplicateColumn(String),

    #[error("test_fraction must be in (0, 1), got {0}")]
    InvalidTestFraction(f64),

    #[error("pivot_tolerance must be finite and positive, got {0}")]
    InvalidPivotTolerance(f64),
}

// =============================================================================
// PreprocessConfig
// =============================================================================

/// Raw table schema and cleaning rules.
///
/// Defaults describe the landslide dataset (`deslizamentos.csv`).
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct PreprocessConfig {
    /// Identifying/geographic columns dropped when present.
    #[builder(default = vec![
        columns::ID.to_string(),
        columns::LATITUDE.to_string(),
        columns::LONGITUDE.to_string(),
    ])]
    pub identifier_columns: Vec<String>,

    /// Timestamp column, decomposed to hour-of-day then dropped.
    #[builder(into, default = columns::TIMESTAMP.to_string())]
    pub timestamp_column: String,

    /// Name of the derived hour-of-day column.
    #[builder(into, default = columns::HOUR.to_string())]
    pub hour_column: String,

    /// Categorical fields, one-hot encoded in this order.
    #[builder(default = vec![
        columns::LANDSLIDE_TYPE.to_string(),
        columns::SOIL_TYPE.to_string(),
        columns::VEGETATION_COVER.to_string(),
    ])]
    pub categorical_columns: Vec<String>,

    /// Continuous columns filtered with the IQR rule, applied in this order.
    #[builder(default = vec![
        columns::PRECIPITATION.to_string(),
        columns::SLOPE.to_string(),
        columns::VOLUME.to_string(),
    ])]
    pub outlier_columns: Vec<String>,

    /// Fence width in IQR units. Default: 1.5.
    #[builder(default = 1.5)]
    pub iqr_multiplier: f64,

    /// Regression target (debris volume).
    #[builder(into, default = columns::VOLUME.to_string())]
    pub target_column: String,
}

impl<S: preprocess_config_builder::IsComplete> PreprocessConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `iqr_multiplier` is negative or not finite
    /// - an outlier column is dropped or encoded before filtering
    /// - the target is an identifier, categorical or timestamp column
    /// - a categorical or outlier column is listed twice
    pub fn build(self) -> Result<PreprocessConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PreprocessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigError::InvalidIqrMultiplier(self.iqr_multiplier));
        }

        check_unique(&self.categorical_columns)?;
        check_unique(&self.outlier_columns)?;

        for column in &self.outlier_columns {
            if let Some(reason) = self.removed_before_filtering(column) {
                return Err(ConfigError::UnavailableOutlierColumn {
                    column: column.clone(),
                    reason,
                });
            }
        }

        if let Some(reason) = self.removed_before_filtering(&self.target_column) {
            return Err(ConfigError::InvalidTarget {
                column: self.target_column.clone(),
                reason,
            });
        }
        if self.target_column == self.hour_column {
            return Err(ConfigError::InvalidTarget {
                column: self.target_column.clone(),
                reason: "the derived hour column",
            });
        }

        Ok(())
    }

    /// Why `column` no longer exists once outlier filtering starts, if it doesn't.
    fn removed_before_filtering(&self, column: &str) -> Option<&'static str> {
        if self.identifier_columns.iter().any(|c| c == column) {
            Some("an identifier column dropped upstream")
        } else if self.timestamp_column == column {
            Some("the timestamp column dropped upstream")
        } else if self.categorical_columns.iter().any(|c| c == column) {
            Some("a categorical column replaced by indicators upstream")
        } else {
            None
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

fn check_unique(names: &[String]) -> Result<(), ConfigError> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(ConfigError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

// =============================================================================
// TrainConfig
// =============================================================================

/// Training pipeline configuration.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct TrainConfig {
    /// Cleaning rules applied before fitting.
    #[builder(default)]
    pub preprocess: PreprocessConfig,

    /// Held-out share for evaluation. Default: 0.2.
    #[builder(default = 0.2)]
    pub test_fraction: f64,

    /// Seed for the train/test shuffle. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Pivots below this magnitude are treated as rank-deficient directions
    /// and get a zero weight. Default: 1e-10.
    #[builder(default = 1e-10)]
    pub pivot_tolerance: f64,
}

impl<S: train_config_builder::IsComplete> TrainConfigBuilder<S> {
    /// Build and validate the configuration.
    pub fn build(self) -> Result<TrainConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl TrainConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::InvalidTestFraction(self.test_fraction));
        }
        if !self.pivot_tolerance.is_finite() || self.pivot_tolerance <= 0.0 {
            return Err(ConfigError::InvalidPivotTolerance(self.pivot_tolerance));
        }
        // Nested config is validated by its own builder, but may have been
        // constructed by struct literal.
        self.preprocess.validate()
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================
