//! Model training and evaluation.
//!
//! - [`Trainer`]: preprocessing, split, scaling and least-squares fit
//! - [`OlsSolver`]: closed-form linear regression
//! - [`MetricFn`]: [`Rmse`] and [`RSquared`] for held-out evaluation

mod metrics;
mod ols;
mod split;
mod trainer;

pub use metrics::{MetricFn, RSquared, Rmse};
pub use ols::OlsSolver;
pub use split::{train_test_split, SplitIndices};
pub use trainer::{EvalReport, TrainError, Trainer, TrainingOutcome};
