//! Property-based tests for cleaning, alignment and classification.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use landslide_risk::config::PreprocessConfig;
use landslide_risk::data::{Column, FeatureColumns, Frame};
use landslide_risk::inference::FeatureAligner;
use landslide_risk::preprocess::filter_column;
use landslide_risk::{RiskClass, RiskThreshold};

fn arb_values() -> impl Strategy<Value = Vec<f64>> {
    prop_vec(
        prop_oneof![
            9 => -1e4f64..1e4,
            1 => Just(f64::NAN),
        ],
        0..60,
    )
}

proptest! {
    #[test]
    fn outlier_pass_never_adds_rows(values in arb_values(), multiplier in 0.0f64..3.0) {
        let n = values.len();
        let mut frame = Frame::new(vec![Column::numeric("x", values)]).unwrap();
        let pass = filter_column(&mut frame, "x", multiplier).unwrap();

        prop_assert_eq!(pass.rows_before, n);
        prop_assert!(frame.n_rows() <= n);
        prop_assert_eq!(pass.rows_before - pass.rows_removed, frame.n_rows());

        let kept = frame.column("x").unwrap().as_numeric().unwrap().to_vec();
        if let Some(fence) = pass.fence {
            for v in kept {
                prop_assert!(fence.contains(v));
            }
        } else {
            prop_assert!(kept.is_empty());
        }
    }

    #[test]
    fn repeated_passes_are_monotonic(values in arb_values()) {
        let mut frame = Frame::new(vec![Column::numeric("x", values)]).unwrap();
        let mut previous = frame.n_rows();
        for _ in 0..3 {
            filter_column(&mut frame, "x", 1.5).unwrap();
            prop_assert!(frame.n_rows() <= previous);
            previous = frame.n_rows();
        }
    }

    #[test]
    fn threshold_is_inclusive(t in 0.01f64..50_000.0) {
        let threshold = RiskThreshold::new(t).unwrap();
        prop_assert_eq!(threshold.classify(t), RiskClass::High);
        prop_assert_eq!(threshold.classify(t - 0.01), RiskClass::Low);
    }

    #[test]
    fn severity_is_a_ratio(t in 0.0f64..50_000.0, volume in -1e5f64..1e5) {
        let severity = RiskThreshold::new(t).unwrap().severity(volume);
        prop_assert!((0.0..=1.0).contains(&severity));
    }

    #[test]
    fn out_of_range_thresholds_are_rejected(t in prop_oneof![-1e6f64..-1e-9, 50_000.001f64..1e7]) {
        prop_assert!(RiskThreshold::new(t).is_err());
    }

    #[test]
    fn aligned_upload_keeps_row_count_and_schema_width(
        rows in 0usize..20,
        keep_precipitation in any::<bool>(),
        extra in any::<bool>(),
    ) {
        let columns = FeatureColumns::new(vec![
            "precipitacao_mm_24h".into(),
            "declividade_graus".into(),
            "horario".into(),
            "tipo_solo_Siltoso".into(),
        ])
        .unwrap();
        let schema = PreprocessConfig::default();

        let mut upload = Vec::new();
        if keep_precipitation {
            upload.push(Column::numeric("precipitacao_mm_24h", vec![10.0; rows]));
        }
        if extra {
            upload.push(Column::numeric("umidade", vec![1.0; rows]));
        }
        upload.push(Column::numeric("horario", vec![6.0; rows]));
        let frame = Frame::new(upload).unwrap();

        let features = FeatureAligner::new(&columns, &schema).align_frame(&frame).unwrap();
        prop_assert_eq!(features.dim(), (rows, 4));
        for r in 0..rows {
            let expected_precipitation = if keep_precipitation { 10.0 } else { 0.0 };
            prop_assert_eq!(features.row(r).to_vec(), vec![expected_precipitation, 0.0, 6.0, 0.0]);
        }
    }
}
