//! Ordinary least squares with intercept.
//!
//! Centers the design matrix and target, then solves the normal equations
//! `XᵀX w = Xᵀy` by Gauss–Jordan elimination with partial pivoting. Columns
//! whose pivot falls below tolerance (constant or collinear features) get a
//! zero weight, which yields a valid least-squares solution.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::model::LinearModel;

/// OLS fitter.
#[derive(Debug, Clone, Copy)]
pub struct OlsSolver {
    /// Relative pivot tolerance, scaled by the largest diagonal entry.
    pivot_tolerance: f64,
}

impl Default for OlsSolver {
    fn default() -> Self {
        Self { pivot_tolerance: 1e-10 }
    }
}

impl OlsSolver {
    pub fn new(pivot_tolerance: f64) -> Self {
        Self { pivot_tolerance }
    }

    /// Fit weights and intercept minimizing squared error.
    ///
    /// `features` is `[n_rows, n_features]`, `targets` has length `n_rows`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that row counts match.
    pub fn fit(&self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> LinearModel {
        debug_assert_eq!(features.nrows(), targets.len());
        let n_features = features.ncols();
        if features.nrows() == 0 {
            return LinearModel::zeros(n_features);
        }

        let x_mean = features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let y_mean = targets.mean().unwrap_or(0.0);

        let xc = &features - &x_mean;
        let yc = &targets - y_mean;

        let gram = xc.t().dot(&xc);
        let rhs = xc.t().dot(&yc);
        let weights = solve_normal_equations(gram, rhs, self.pivot_tolerance);

        let intercept = y_mean - x_mean.dot(&weights);
        LinearModel::new(weights, intercept)
    }
}

/// Solve `a · w = b` for symmetric positive semi-definite `a`.
///
/// Free variables (rank-deficient directions) are set to zero.
fn solve_normal_equations(mut a: Array2<f64>, mut b: Array1<f64>, tolerance: f64) -> Array1<f64> {
    let n = b.len();
    let scale = a
        .diag()
        .iter()
        .fold(0.0f64, |m, &v| m.max(v.abs()))
        .max(1.0);
    let tol = tolerance * scale;

    let mut pivot_row: Vec<Option<usize>> = vec![None; n];
    let mut used = vec![false; n];

    for col in 0..n {
        let best = (0..n)
            .filter(|&r| !used[r])
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()));
        let Some(p) = best else { break };
        let pivot = a[[p, col]];
        if pivot.abs() <= tol {
            continue;
        }
        used[p] = true;
        pivot_row[col] = Some(p);

        a.row_mut(p).mapv_inplace(|v| v / pivot);
        b[p] /= pivot;

        let pivot_vals = a.row(p).to_owned();
        let pivot_b = b[p];
        for r in 0..n {
            if r == p {
                continue;
            }
            let factor = a[[r, col]];
            if factor == 0.0 {
                continue;
            }
            a.row_mut(r).scaled_add(-factor, &pivot_vals);
            b[r] -= factor * pivot_b;
        }
    }

    let mut w = Array1::zeros(n);
    for (col, row) in pivot_row.iter().enumerate() {
        if let Some(p) = row {
            w[col] = b[*p];
        }
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn recovers_exact_line() {
        // y = 2*x + 1
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];
        let model = OlsSolver::default().fit(x.view(), y.view());
        assert_abs_diff_eq!(model.weight(0), 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(model.intercept(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn recovers_multifeature_plane() {
        // y = 3*a - 2*b + 0.5*c + 10
        let x = array![
            [1.0, 0.0, 2.0],
            [0.0, 1.0, 1.0],
            [2.0, 3.0, 0.0],
            [4.0, 1.0, 5.0],
            [3.0, 2.0, 2.0],
            [5.0, 0.5, 1.0],
        ];
        let y = x.map_axis(Axis(1), |r| 3.0 * r[0] - 2.0 * r[1] + 0.5 * r[2] + 10.0);
        let model = OlsSolver::default().fit(x.view(), y.view());
        assert_abs_diff_eq!(model.weight(0), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.weight(1), -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.weight(2), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(model.intercept(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn constant_column_gets_zero_weight() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let y = array![2.0, 4.0, 6.0];
        let model = OlsSolver::default().fit(x.view(), y.view());
        assert_abs_diff_eq!(model.weight(0), 2.0, epsilon = 1e-10);
        assert_eq!(model.weight(1), 0.0);
        assert_abs_diff_eq!(model.intercept(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn duplicated_column_still_fits() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [5.0, 5.0]];
        let y = array![1.0, 3.0, 5.0, 9.0];
        let model = OlsSolver::default().fit(x.view(), y.view());
        let preds = model.predict(x.view());
        for (p, t) in preds.iter().zip(y.iter()) {
            assert_abs_diff_eq!(*p, *t, epsilon = 1e-9);
        }
    }

    #[test]
    fn no_features_predicts_mean() {
        let x = Array2::<f64>::zeros((3, 0));
        let y = array![1.0, 2.0, 6.0];
        let model = OlsSolver::default().fit(x.view(), y.view());
        assert_eq!(model.n_features(), 0);
        assert_abs_diff_eq!(model.intercept(), 3.0);
    }
}
