//! Regression metrics reported after training.

use ndarray::ArrayView1;

/// A regression quality metric.
pub trait MetricFn {
    /// Compute the metric over paired predictions and targets.
    fn compute(&self, predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> f64;

    /// Whether larger values mean a better fit.
    fn higher_is_better(&self) -> bool;

    fn name(&self) -> &'static str;
}

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - label)²))
///
/// Lower is better. Reported in cubic meters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> f64 {
        let n = predictions.len();
        if n == 0 {
            return 0.0;
        }
        let sum_sq: f64 = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| (p - t) * (p - t))
            .sum();
        (sum_sq / n as f64).sqrt()
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

// =============================================================================
// R² (Coefficient of Determination)
// =============================================================================

/// Coefficient of determination: 1 - SS_res / SS_tot
///
/// Higher is better. When the targets are constant (SS_tot = 0) the score is
/// 1.0 for a perfect fit and 0.0 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RSquared;

impl MetricFn for RSquared {
    fn compute(&self, predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> f64 {
        let Some(mean) = targets.mean() else {
            return 0.0;
        };
        let ss_res: f64 = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| (t - p) * (t - p))
            .sum();
        let ss_tot: f64 = targets.iter().map(|&t| (t - mean) * (t - mean)).sum();

        if ss_tot == 0.0 {
            return if ss_res == 0.0 { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "r2"
    }
}
