//! Conversion between runtime types and schema types.
//!
//! Runtime → schema is lossless (`From`); schema → runtime validates
//! versions and lengths (`TryFrom`).

use ndarray::Array1;

use super::schema::{
    FeatureColumnsSchema, ModelSchema, PreprocessSchema, ScalerSchema, SCHEMA_VERSION,
};
use crate::config::{ConfigError, PreprocessConfig};
use crate::data::{FeatureColumns, FrameError};
use crate::inference::RiskModel;
use crate::model::{LinearModel, StandardScaler};

/// A schema value that does not describe a valid runtime object.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("unsupported schema version {found} (supported: {})", SCHEMA_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("{field} has {got} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("feature column {0} is listed more than once")]
    DuplicateColumn(String),

    #[error("stored preprocessing schema is invalid")]
    Preprocess(#[source] ConfigError),
}

fn check_version(found: u32) -> Result<(), SchemaError> {
    if found == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(SchemaError::UnsupportedVersion { found })
    }
}

// =============================================================================
// LinearModel
// =============================================================================

impl From<&LinearModel> for ModelSchema {
    fn from(model: &LinearModel) -> Self {
        Self {
            version: SCHEMA_VERSION,
            num_features: model.n_features(),
            coefficients: model.coefficients().to_vec(),
            intercept: model.intercept(),
        }
    }
}

impl TryFrom<ModelSchema> for LinearModel {
    type Error = SchemaError;

    fn try_from(schema: ModelSchema) -> Result<Self, Self::Error> {
        check_version(schema.version)?;
        if schema.coefficients.len() != schema.num_features {
            return Err(SchemaError::LengthMismatch {
                field: "coefficients",
                expected: schema.num_features,
                got: schema.coefficients.len(),
            });
        }
        Ok(LinearModel::new(Array1::from(schema.coefficients), schema.intercept))
    }
}

// =============================================================================
// StandardScaler
// =============================================================================

impl From<&StandardScaler> for ScalerSchema {
    fn from(scaler: &StandardScaler) -> Self {
        Self {
            version: SCHEMA_VERSION,
            mean: scaler.mean().to_vec(),
            scale: scaler.scale().to_vec(),
        }
    }
}

impl TryFrom<ScalerSchema> for StandardScaler {
    type Error = SchemaError;

    fn try_from(schema: ScalerSchema) -> Result<Self, Self::Error> {
        check_version(schema.version)?;
        if schema.scale.len() != schema.mean.len() {
            return Err(SchemaError::LengthMismatch {
                field: "scale",
                expected: schema.mean.len(),
                got: schema.scale.len(),
            });
        }
        Ok(StandardScaler::from_parts(
            Array1::from(schema.mean),
            Array1::from(schema.scale),
        ))
    }
}

// =============================================================================
// PreprocessConfig
// =============================================================================

impl From<&PreprocessConfig> for PreprocessSchema {
    fn from(config: &PreprocessConfig) -> Self {
        Self {
            identifier_columns: config.identifier_columns.clone(),
            timestamp_column: config.timestamp_column.clone(),
            hour_column: config.hour_column.clone(),
            categorical_columns: config.categorical_columns.clone(),
            outlier_columns: config.outlier_columns.clone(),
            iqr_multiplier: config.iqr_multiplier,
            target_column: config.target_column.clone(),
        }
    }
}

impl TryFrom<PreprocessSchema> for PreprocessConfig {
    type Error = SchemaError;

    fn try_from(schema: PreprocessSchema) -> Result<Self, Self::Error> {
        PreprocessConfig::builder()
            .identifier_columns(schema.identifier_columns)
            .timestamp_column(schema.timestamp_column)
            .hour_column(schema.hour_column)
            .categorical_columns(schema.categorical_columns)
            .outlier_columns(schema.outlier_columns)
            .iqr_multiplier(schema.iqr_multiplier)
            .target_column(schema.target_column)
            .build()
            .map_err(SchemaError::Preprocess)
    }
}

// =============================================================================
// FeatureColumns
// =============================================================================

impl From<&RiskModel> for FeatureColumnsSchema {
    fn from(model: &RiskModel) -> Self {
        Self {
            version: SCHEMA_VERSION,
            columns: model.columns().names().to_vec(),
            preprocess: PreprocessSchema::from(model.schema()),
        }
    }
}

impl TryFrom<FeatureColumnsSchema> for FeatureColumns {
    type Error = SchemaError;

    fn try_from(schema: FeatureColumnsSchema) -> Result<Self, Self::Error> {
        check_version(schema.version)?;
        FeatureColumns::new(schema.columns).map_err(|err| match err {
            FrameError::DuplicateColumn(name) => SchemaError::DuplicateColumn(name),
            other => SchemaError::DuplicateColumn(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn model_schema_keeps_intercept_separate() {
        let model = LinearModel::new(array![1.5, -2.0], 7.0);
        let schema = ModelSchema::from(&model);
        assert_eq!(schema.num_features, 2);
        assert_eq!(schema.coefficients, vec![1.5, -2.0]);
        assert_eq!(schema.intercept, 7.0);
        assert_eq!(LinearModel::try_from(schema).unwrap(), model);
    }

    #[test]
    fn future_version_is_rejected() {
        let schema = ScalerSchema { version: 2, mean: vec![0.0], scale: vec![1.0] };
        assert_eq!(
            StandardScaler::try_from(schema).unwrap_err(),
            SchemaError::UnsupportedVersion { found: 2 }
        );
    }

    #[test]
    fn inconsistent_lengths_are_rejected() {
        let schema = ModelSchema {
            version: SCHEMA_VERSION,
            num_features: 3,
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert!(matches!(
            LinearModel::try_from(schema),
            Err(SchemaError::LengthMismatch { field: "coefficients", expected: 3, got: 1 })
        ));

        let schema = ScalerSchema { version: SCHEMA_VERSION, mean: vec![0.0, 1.0], scale: vec![1.0] };
        assert!(matches!(StandardScaler::try_from(schema), Err(SchemaError::LengthMismatch { .. })));
    }

    #[test]
    fn duplicate_feature_column_is_rejected() {
        let schema = FeatureColumnsSchema {
            version: SCHEMA_VERSION,
            columns: vec!["horario".into(), "horario".into()],
            preprocess: PreprocessSchema::from(&PreprocessConfig::default()),
        };
        assert_eq!(
            FeatureColumns::try_from(schema).unwrap_err(),
            SchemaError::DuplicateColumn("horario".into())
        );
    }

    #[test]
    fn preprocess_schema_restores_custom_fields() {
        let config = PreprocessConfig::builder()
            .hour_column("hora")
            .timestamp_column("ocorrido_em")
            .iqr_multiplier(2.0)
            .build()
            .unwrap();
        let restored = PreprocessConfig::try_from(PreprocessSchema::from(&config)).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn invalid_preprocess_schema_is_rejected() {
        let mut schema = PreprocessSchema::from(&PreprocessConfig::default());
        schema.iqr_multiplier = -1.0;
        assert_eq!(
            PreprocessConfig::try_from(schema).unwrap_err(),
            SchemaError::Preprocess(ConfigError::InvalidIqrMultiplier(-1.0))
        );
    }
}
