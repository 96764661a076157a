//! Shared helpers for integration tests.

#![allow(dead_code)]

use landslide_risk::testing::synthetic_landslides;
use landslide_risk::{ManualInput, Trainer, TrainingOutcome};

/// Train on a synthetic table with the default configuration.
pub fn train_synthetic(rows: usize, seed: u64, noise: f64) -> TrainingOutcome {
    Trainer::default()
        .fit(synthetic_landslides(rows, seed, noise))
        .expect("training on synthetic data succeeds")
}

/// Manual entry with the reference soil category.
pub fn reference_soil_input() -> ManualInput {
    ManualInput {
        precipitation_mm_24h: 200.0,
        slope_degrees: 40.0,
        hour: 14,
        soil_type: "Argiloso".into(),
        vegetation_cover: "Densa".into(),
        landslide_type: "Fluxo de Lama".into(),
    }
}

/// Volume the synthetic generator assigns to [`reference_soil_input`].
///
/// 150 + 4·200 + 12·40 + 260 (Fluxo de Lama) + 0 (Argiloso) − 60 (Densa)
pub const REFERENCE_SOIL_VOLUME: f64 = 1630.0;
