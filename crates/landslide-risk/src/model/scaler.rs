//! Per-feature standardization.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Standard scaler fitted on training data: `(x - mean) / scale`.
///
/// `scale` is the population standard deviation; a constant feature gets
/// scale `1.0` so it is only centered.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit on `[n_rows, n_features]` data.
    ///
    /// An empty matrix yields zero means and unit scales.
    pub fn fit(features: ArrayView2<'_, f64>) -> Self {
        let n_features = features.ncols();
        if features.nrows() == 0 {
            return Self {
                mean: Array1::zeros(n_features),
                scale: Array1::ones(n_features),
            };
        }
        let mean = features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let scale = features.std_axis(Axis(0), 0.0).mapv(|s| if s > 0.0 { s } else { 1.0 });
        Self { mean, scale }
    }

    /// Create from stored parameters.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn from_parts(mean: Array1<f64>, scale: Array1<f64>) -> Self {
        assert_eq!(mean.len(), scale.len(), "mean and scale lengths differ");
        Self { mean, scale }
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }

    /// Standardize `[n_rows, n_features]` data.
    pub fn transform(&self, features: ArrayView2<'_, f64>) -> Array2<f64> {
        (&features - &self.mean) / &self.scale
    }

    /// Standardize a single row.
    pub fn transform_row(&self, row: ArrayView1<'_, f64>) -> Array1<f64> {
        (&row - &self.mean) / &self.scale
    }
}
