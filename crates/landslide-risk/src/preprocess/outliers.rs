//! Interquartile-range outlier fences.

use crate::data::{Column, Frame};

use super::PreprocessError;

/// Quantile of sorted values with linear interpolation between order statistics.
///
/// Position is `q * (n - 1)`; returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Acceptance interval `[Q1 - k·IQR, Q3 + k·IQR]` of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFence {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFence {
    /// Fit the fence on the non-missing values.
    ///
    /// Returns `None` if every value is missing.
    pub fn fit(values: &[f64], multiplier: f64) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Inclusive on both ends; missing values are never contained.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Result of one filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierPass {
    pub column: String,
    /// `None` when the column had no values to fit on.
    pub fence: Option<IqrFence>,
    pub rows_before: usize,
    pub rows_removed: usize,
}

/// Drop rows of `frame` whose `column` value lies outside its IQR fence.
///
/// The fence is computed on the current (possibly already filtered) rows.
/// Rows with a missing value are dropped.
pub fn filter_column(
    frame: &mut Frame,
    column: &str,
    multiplier: f64,
) -> Result<OutlierPass, PreprocessError> {
    let values = numeric_values(frame.require(column)?)?;
    let fence = IqrFence::fit(&values, multiplier);
    let keep: Vec<bool> = match &fence {
        Some(f) => values.iter().map(|&v| f.contains(v)).collect(),
        None => vec![false; values.len()],
    };

    let rows_before = frame.n_rows();
    frame.retain_rows(&keep);

    Ok(OutlierPass {
        column: column.to_string(),
        fence,
        rows_before,
        rows_removed: rows_before - frame.n_rows(),
    })
}

fn numeric_values(column: &Column) -> Result<Vec<f64>, PreprocessError> {
    column
        .as_numeric()
        .map(<[f64]>::to_vec)
        .ok_or_else(|| PreprocessError::NonNumericColumn(column.name().to_string()))
}
