//! Linear model data structure.

use ndarray::{s, Array1, ArrayView1, ArrayView2};

/// Linear regression model (weights + intercept).
///
/// Stores the coefficients as an `Array1<f64>` of length `n_features + 1`:
///
/// ```text
/// weights[feature]    → coefficient
/// weights[n_features] → intercept (last element)
/// ```
///
/// Prediction is `output = features · weights[..n] + weights[n]`.
///
/// # Example
///
/// ```
/// use landslide_risk::model::LinearModel;
/// use ndarray::array;
///
/// let model = LinearModel::from_array(array![2.0, -1.0, 10.0]);
/// assert_eq!(model.n_features(), 2);
/// assert_eq!(model.intercept(), 10.0);
/// assert_eq!(model.predict_row(array![1.0, 3.0].view()), 9.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    /// Shape `[n_features + 1]`, last element is the intercept.
    weights: Array1<f64>,
}

impl LinearModel {
    /// Create a model from separate coefficients and intercept.
    pub fn new(coefficients: Array1<f64>, intercept: f64) -> Self {
        let mut weights = Array1::zeros(coefficients.len() + 1);
        weights.slice_mut(s![..coefficients.len()]).assign(&coefficients);
        weights[coefficients.len()] = intercept;
        Self { weights }
    }

    /// Create a model from the packed layout (intercept last).
    ///
    /// # Panics
    ///
    /// Panics if the array is empty (need at least the intercept).
    pub fn from_array(weights: Array1<f64>) -> Self {
        assert!(!weights.is_empty(), "weights must hold at least the intercept");
        Self { weights }
    }

    /// Create a zero-initialized model.
    pub fn zeros(n_features: usize) -> Self {
        Self { weights: Array1::zeros(n_features + 1) }
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.len() - 1
    }

    /// Coefficient of one feature.
    #[inline]
    pub fn weight(&self, feature: usize) -> f64 {
        self.weights[feature]
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.weights[self.n_features()]
    }

    /// Coefficients without the intercept.
    #[inline]
    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.weights.slice(s![..self.n_features()])
    }

    /// Packed weights (intercept last), for serialization.
    #[inline]
    pub fn as_array(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Predict one value per row of `features` (`[n_rows, n_features]`).
    ///
    /// # Panics
    ///
    /// Panics if the column count differs from [`n_features`](Self::n_features).
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        assert_eq!(
            features.ncols(),
            self.n_features(),
            "feature count mismatch"
        );
        features.dot(&self.coefficients()) + self.intercept()
    }

    /// Predict a single row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        row.dot(&self.coefficients()) + self.intercept()
    }
}
