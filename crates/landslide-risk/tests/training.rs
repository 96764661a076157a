//! End-to-end training on synthetic landslide records.

mod common;

use approx::assert_abs_diff_eq;
use common::{reference_soil_input, train_synthetic, REFERENCE_SOIL_VOLUME};
use landslide_risk::testing::{synthetic_landslides, synthetic_landslides_csv};
use landslide_risk::{Frame, RiskClass, RiskThreshold, TrainConfig, TrainError, Trainer};
use rstest::rstest;

const EXPECTED_COLUMNS: [&str; 10] = [
    "precipitacao_mm_24h",
    "declividade_graus",
    "horario",
    "tipo_deslizamento_Deslizamento Planar",
    "tipo_deslizamento_Fluxo de Lama",
    "tipo_deslizamento_Queda de Rochas",
    "tipo_solo_Rochoso",
    "tipo_solo_Siltoso",
    "cobertura_vegetal_Densa",
    "cobertura_vegetal_Rasteira",
];

#[test]
fn feature_columns_have_exact_names() {
    let outcome = train_synthetic(300, 7, 0.0);
    assert_eq!(outcome.model.columns().names(), &EXPECTED_COLUMNS);

    // Σ(categories − 1) + three numeric/derived columns
    let indicators: usize = outcome.levels.iter().map(|l| l.encoded.len()).sum();
    assert_eq!(indicators, 3 + 2 + 2);
    assert_eq!(outcome.model.columns().len(), indicators + 3);

    let references: Vec<_> = outcome.levels.iter().map(|l| l.reference.as_deref()).collect();
    assert_eq!(
        references,
        vec![Some("Corrida de Detritos"), Some("Argiloso"), Some("Arbustiva")]
    );
}

#[test]
fn manual_input_sets_only_its_indicators() {
    let outcome = train_synthetic(300, 7, 0.0);
    let row = outcome
        .model
        .aligner()
        .align_manual(&reference_soil_input())
        .unwrap();
    assert_eq!(
        row.to_vec(),
        vec![200.0, 40.0, 14.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    );
}

#[test]
fn noise_free_data_is_fitted_exactly() {
    let outcome = train_synthetic(300, 11, 0.0);
    assert_abs_diff_eq!(outcome.evaluation.rmse, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(outcome.evaluation.r2, 1.0, epsilon = 1e-9);

    let assessment = outcome
        .model
        .assess(&reference_soil_input(), RiskThreshold::default())
        .unwrap();
    assert_abs_diff_eq!(assessment.volume, REFERENCE_SOIL_VOLUME, epsilon = 1e-6);
    assert_eq!(assessment.class, RiskClass::High);
    assert_eq!(assessment.severity, 1.0);
}

#[rstest]
#[case(200, 1)]
#[case(500, 2)]
#[case(1000, 3)]
fn noisy_data_still_explains_most_variance(#[case] rows: usize, #[case] seed: u64) {
    let outcome = train_synthetic(rows, seed, 25.0);
    assert!(outcome.evaluation.r2 > 0.95, "r2 = {}", outcome.evaluation.r2);
    assert!(outcome.evaluation.rmse < 25.0, "rmse = {}", outcome.evaluation.rmse);
}

#[rstest]
#[case(100, 0.2, 20)]
#[case(101, 0.2, 21)]
#[case(100, 0.5, 50)]
fn split_sizes_follow_test_fraction(#[case] rows: usize, #[case] fraction: f64, #[case] n_test: usize) {
    // Uniform precipitation/slope and a narrow volume spread keep every row.
    let config = TrainConfig::builder().test_fraction(fraction).build().unwrap();
    let outcome = Trainer::new(config)
        .fit(synthetic_landslides(rows, 5, 0.0))
        .unwrap();
    let cleaned = outcome.cleaning.final_rows;
    assert_eq!(outcome.evaluation.n_train + outcome.evaluation.n_test, cleaned);
    if cleaned == rows {
        assert_eq!(outcome.evaluation.n_test, n_test);
    }
}

#[test]
fn training_is_reproducible_for_a_seed() {
    let a = train_synthetic(200, 9, 10.0);
    let b = train_synthetic(200, 9, 10.0);
    assert_eq!(a.model.linear(), b.model.linear());
    assert_eq!(a.model.scaler(), b.model.scaler());
    assert_eq!(a.evaluation, b.evaluation);
}

#[test]
fn invalid_timestamps_are_dropped_before_fitting() {
    let mut csv = synthetic_landslides_csv(60, 4, 0.0);
    csv.push_str("999,-23.5,-46.5,not a date,100,30,Fluxo de Lama,Argiloso,Densa,1000\n");
    let frame = Frame::from_csv_reader(csv.as_bytes()).unwrap();
    let outcome = Trainer::default().fit(frame).unwrap();
    assert_eq!(outcome.cleaning.initial_rows, 61);
    assert_eq!(outcome.cleaning.invalid_timestamps, 1);
}

#[test]
fn empty_table_is_rejected() {
    let csv = synthetic_landslides_csv(0, 1, 0.0);
    let frame = Frame::from_csv_reader(csv.as_bytes()).unwrap();
    let err = Trainer::default().fit(frame).unwrap_err();
    assert!(matches!(err, TrainError::InsufficientData { rows: 0 }), "got: {err:?}");
}

#[test]
fn free_text_column_is_reported_by_name() {
    let mut frame = synthetic_landslides(40, 6, 0.0);
    frame
        .push_column(landslide_risk::data::Column::text(
            "observacoes",
            vec![Some("sem danos".to_string()); 40],
        ))
        .unwrap();
    let err = Trainer::default().fit(frame).unwrap_err();
    assert!(err.to_string().contains("observacoes"), "got: {err}");
}
