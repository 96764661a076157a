//! Column names and the feature schema of a fitted model.

use std::collections::HashMap;

use super::FrameError;

/// Canonical column names of the landslide dataset.
pub mod columns {
    pub const ID: &str = "ID";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const TIMESTAMP: &str = "data_hora";
    pub const PRECIPITATION: &str = "precipitacao_mm_24h";
    pub const SLOPE: &str = "declividade_graus";
    pub const LANDSLIDE_TYPE: &str = "tipo_deslizamento";
    pub const SOIL_TYPE: &str = "tipo_solo";
    pub const VEGETATION_COVER: &str = "cobertura_vegetal";
    pub const VOLUME: &str = "volume_deslizado_m3";

    /// Hour of day derived from [`TIMESTAMP`].
    pub const HOUR: &str = "horario";

    /// Predicted volume appended by bulk scoring.
    pub const PREDICTED_VOLUME: &str = "volume_previsto_m3";
    /// Risk label appended by bulk scoring.
    pub const RISK_CLASS: &str = "classificacao_risco";
}

/// Indicator column name for one category of a categorical field.
pub fn indicator_name(field: &str, category: &str) -> String {
    format!("{field}_{category}")
}

/// Ordered feature schema of a fitted model.
///
/// Count, names and order are fixed at training time. The model weights are
/// positional, so every inference input is aligned to this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureColumns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureColumns {
    /// Create a schema from ordered names.
    pub fn new(names: Vec<String>) -> Result<Self, FrameError> {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(FrameError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { names, index })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Position of a column in the schema.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Columns of the schema that are indicators of `field`.
    pub fn indicators_of<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let prefix = format!("{field}_");
        self.iter().filter(move |name| name.starts_with(&prefix))
    }
}
