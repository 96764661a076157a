//! Artifact persistence.
//!
//! A fitted [`RiskModel`](crate::inference::RiskModel) is stored as three
//! JSON files in one directory: the model weights, the scaler parameters and
//! the ordered feature column list together with the raw table schema. Each
//! file carries a schema version.
//!
//! ```no_run
//! use landslide_risk::persist::ArtifactStore;
//!
//! let model = ArtifactStore::new("pickle_deslizamento").load()?;
//! println!("{} features", model.columns().len());
//! # Ok::<(), landslide_risk::persist::ArtifactError>(())
//! ```

mod convert;
mod schema;
mod store;

pub use convert::SchemaError;
pub use schema::{
    FeatureColumnsSchema, ModelSchema, PreprocessSchema, ScalerSchema, SCHEMA_VERSION,
};
pub use store::{ArtifactError, ArtifactStore, COLUMNS_FILE, DEFAULT_DIR, MODEL_FILE, SCALER_FILE};
