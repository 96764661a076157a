//! Risk threshold and classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Invalid threshold value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("threshold must be within [{min}, {max}] m³, got {value}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("threshold is not a number: {0}")]
    Parse(String),
}

/// Debris-volume threshold (m³) separating high from low risk.
///
/// Supplied per session; never persisted with the model.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RiskThreshold(f64);

impl RiskThreshold {
    /// Smallest accepted threshold.
    pub const MIN: f64 = 0.0;
    /// Largest accepted threshold.
    pub const MAX: f64 = 50_000.0;
    /// Initial value offered to users.
    pub const DEFAULT: f64 = 100.0;

    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ThresholdError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Classify a predicted volume; the boundary is high risk.
    #[inline]
    pub fn classify(self, volume: f64) -> RiskClass {
        if volume >= self.0 {
            RiskClass::High
        } else {
            RiskClass::Low
        }
    }

    /// How close `volume` is to 1.5× the threshold, clamped to `[0, 1]`.
    pub fn severity(self, volume: f64) -> f64 {
        let limit = self.0 * 1.5;
        if limit > 0.0 {
            (volume / limit).clamp(0.0, 1.0)
        } else if volume > 0.0 {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for RiskThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl FromStr for RiskThreshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| ThresholdError::Parse(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for RiskThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m³", self.0)
    }
}

/// Risk label of a predicted volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskClass {
    #[serde(rename = "Alto Risco")]
    High,
    #[serde(rename = "Baixo Risco")]
    Low,
}

impl RiskClass {
    /// Label written to `classificacao_risco`.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "Alto Risco",
            Self::Low => "Baixo Risco",
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
