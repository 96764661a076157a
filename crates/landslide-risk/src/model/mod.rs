//! Fitted model components.
//!
//! - [`LinearModel`]: weights + intercept mapping standardized features to volume
//! - [`StandardScaler`]: per-feature mean/scale fitted on the training split
//! - [`RiskThreshold`] / [`RiskClass`]: session threshold and resulting label

mod linear;
mod risk;
mod scaler;

pub use linear::LinearModel;
pub use risk::{RiskClass, RiskThreshold, ThresholdError};
pub use scaler::StandardScaler;
