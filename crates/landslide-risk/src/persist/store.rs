//! Artifact directory holding a fitted [`RiskModel`].

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::convert::SchemaError;
use super::schema::{FeatureColumnsSchema, ModelSchema, ScalerSchema};
use crate::config::PreprocessConfig;
use crate::data::FeatureColumns;
use crate::inference::{RiskModel, ShapeMismatch};
use crate::model::{LinearModel, StandardScaler};

/// Default artifact directory.
pub const DEFAULT_DIR: &str = "pickle_deslizamento";
pub const MODEL_FILE: &str = "modelo_deslizamento.json";
pub const SCALER_FILE: &str = "scaler_deslizamento.json";
pub const COLUMNS_FILE: &str = "colunas_modelo_deslizamento.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact {} not found", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {} is not valid JSON", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {} is invalid", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("artifacts in {} disagree", .dir.display())]
    Mismatch {
        dir: PathBuf,
        #[source]
        source: ShapeMismatch,
    },
}

/// Directory with the model, scaler and feature column artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_DIR)
    }
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    pub fn columns_path(&self) -> PathBuf {
        self.dir.join(COLUMNS_FILE)
    }

    /// Write all three artifacts, creating the directory if needed.
    ///
    /// Each artifact is first written next to its destination under a
    /// `.tmp` suffix; the three are renamed into place only once all of them
    /// were written, so a failed save leaves the previous artifacts intact.
    pub fn save(&self, model: &RiskModel) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let staged = [
            to_json(self.model_path(), &ModelSchema::from(model.linear()))?,
            to_json(self.scaler_path(), &ScalerSchema::from(model.scaler()))?,
            to_json(self.columns_path(), &FeatureColumnsSchema::from(model))?,
        ];

        let mut written = Vec::with_capacity(staged.len());
        for (path, bytes) in &staged {
            let tmp = staging_path(path);
            if let Err(err) = write_file(&tmp, bytes) {
                discard(written.iter().chain([&tmp]));
                return Err(err);
            }
            written.push(tmp);
        }
        for (tmp, (path, _)) in written.iter().zip(&staged) {
            fs::rename(tmp, path).map_err(|source| ArtifactError::Io {
                path: path.clone(),
                source,
            })?;
        }

        tracing::info!(
            dir = %self.dir.display(),
            features = model.columns().len(),
            "saved artifacts"
        );
        Ok(())
    }

    /// Load all three artifacts.
    ///
    /// Fails if any artifact is missing, unreadable, malformed, of another
    /// schema version, or if the three disagree on the feature count.
    pub fn load(&self) -> Result<RiskModel, ArtifactError> {
        let model: LinearModel = read_schema::<ModelSchema, _>(&self.model_path())?;
        let scaler: StandardScaler = read_schema::<ScalerSchema, _>(&self.scaler_path())?;

        let columns_path = self.columns_path();
        let stored: FeatureColumnsSchema = read_json(&columns_path)?;
        let preprocess = stored.preprocess.clone();
        let columns = FeatureColumns::try_from(stored).map_err(|source| invalid(&columns_path, source))?;
        let schema =
            PreprocessConfig::try_from(preprocess).map_err(|source| invalid(&columns_path, source))?;

        let model = RiskModel::new(columns, scaler, model)
            .map_err(|source| ArtifactError::Mismatch {
                dir: self.dir.clone(),
                source,
            })?
            .with_schema(schema);
        tracing::info!(
            dir = %self.dir.display(),
            features = model.columns().len(),
            "loaded artifacts"
        );
        Ok(model)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn discard<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

fn to_json<T: Serialize>(path: PathBuf, value: &T) -> Result<(PathBuf, Vec<u8>), ArtifactError> {
    match serde_json::to_vec_pretty(value) {
        Ok(bytes) => Ok((path, bytes)),
        Err(err) => Err(ArtifactError::Io {
            path,
            source: err.into(),
        }),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    let io_err = |source: std::io::Error| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    writer.write_all(bytes).map_err(io_err)?;
    writer.flush().map_err(io_err)
}

fn invalid(path: &Path, source: SchemaError) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        source,
    }
}

fn read_json<S: DeserializeOwned>(path: &Path) -> Result<S, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn read_schema<S, T>(path: &Path) -> Result<T, ArtifactError>
where
    S: DeserializeOwned,
    T: TryFrom<S, Error = SchemaError>,
{
    let schema: S = read_json(path)?;
    T::try_from(schema).map_err(|source| invalid(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted() -> RiskModel {
        let columns =
            FeatureColumns::new(vec!["precipitacao_mm_24h".into(), "tipo_solo_Siltoso".into()])
                .unwrap();
        let scaler = StandardScaler::from_parts(array![100.0, 0.5], array![20.0, 0.5]);
        RiskModel::new(columns, scaler, LinearModel::new(array![40.0, -3.5], 310.0)).unwrap()
    }

    #[test]
    fn save_creates_directory_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("nested").join("artifacts"));
        store.save(&fitted()).unwrap();
        assert!(store.model_path().is_file());
        assert!(store.scaler_path().is_file());
        assert!(store.columns_path().is_file());
    }

    #[test]
    fn columns_file_lists_names_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        store.save(&fitted()).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(store.columns_path()).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["columns"], serde_json::json!(["precipitacao_mm_24h", "tipo_solo_Siltoso"]));
    }

    #[test]
    fn missing_directory_reports_model_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("absent"));
        match store.load() {
            Err(ArtifactError::Missing { path }) => assert!(path.ends_with(MODEL_FILE)),
            other => panic!("expected missing artifact, got {other:?}"),
        }
    }

    #[test]
    fn save_leaves_no_staging_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        store.save(&fitted()).unwrap();
        let mut names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec![COLUMNS_FILE, MODEL_FILE, SCALER_FILE]);
    }

    #[test]
    fn failed_save_keeps_previous_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let previous = fitted();
        store.save(&previous).unwrap();

        // A directory squatting on the staging path makes the last write fail.
        fs::create_dir(staging_path(&store.columns_path())).unwrap();
        let replacement = RiskModel::new(
            previous.columns().clone(),
            previous.scaler().clone(),
            LinearModel::new(array![1.0, 1.0], 0.0),
        )
        .unwrap();
        assert!(matches!(store.save(&replacement), Err(ArtifactError::Io { .. })));

        assert!(!staging_path(&store.model_path()).exists());
        assert!(!staging_path(&store.scaler_path()).exists());
        assert_eq!(store.load().unwrap().linear(), previous.linear());
    }

    #[test]
    fn load_restores_raw_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let schema = PreprocessConfig::builder().hour_column("hora").build().unwrap();
        store.save(&fitted().with_schema(schema.clone())).unwrap();
        assert_eq!(store.load().unwrap().schema(), &schema);
    }
}
