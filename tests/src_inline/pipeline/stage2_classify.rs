use super::*;
use crate::model::params::{EnrichParams, MixBoundary};

fn types() -> Vec<String> {
    vec!["A".to_string(), "B".to_string(), "C".to_string()]
}

fn flat_thresholds(value: f64) -> ThresholdMap {
    ThresholdMap {
        top_fractions: vec![0.05; 3],
        thresholds: vec![value; 3],
    }
}

fn resolved(params: &EnrichParams) -> ResolvedParams {
    params.resolve_for(&types())
}

#[test]
fn test_top_two_ordering_and_ties() {
    let t = top_two(&[1.0, 5.0, 3.0]);
    assert_eq!((t.first, t.first_count, t.second_count), (1, 5.0, 3.0));

    let t = top_two(&[5.0, 5.0, 1.0]);
    assert_eq!((t.first, t.first_count, t.second_count), (0, 5.0, 5.0));

    let t = top_two(&[0.0, 2.0, 2.0]);
    assert_eq!(t.first, 1);
    assert_eq!(t.ratio(), 1.0);
}

#[test]
fn test_zero_runner_up_is_infinite_ratio() {
    let t = top_two(&[5.0, 0.0, 0.0]);
    assert_eq!(t.ratio(), f64::INFINITY);
}

#[test]
fn test_enriched_when_ratio_and_threshold_pass() {
    let p = resolved(&EnrichParams::default());
    let label = classify_spot(&[10.0, 1.0, 0.5], &flat_thresholds(9.0), &p);
    assert_eq!(label, SpotLabel::Enriched(0));
}

#[test]
fn test_high_ratio_below_threshold_is_unknown() {
    let p = resolved(&EnrichParams::default());
    let label = classify_spot(&[8.0, 1.0, 0.0], &flat_thresholds(9.0), &p);
    assert_eq!(label, SpotLabel::Unknown);
}

#[test]
fn test_close_counts_are_mix() {
    let p = resolved(&EnrichParams::default());
    assert_eq!(
        classify_spot(&[1.0, 1.0, 0.0], &flat_thresholds(0.0), &p),
        SpotLabel::Mix
    );
    // ratio exactly at the default bound still counts as Mix
    assert_eq!(
        classify_spot(&[1.1, 1.0, 0.0], &flat_thresholds(0.0), &p),
        SpotLabel::Mix
    );
}

#[test]
fn test_zero_runner_up_enriches_regardless_of_ratio_threshold() {
    let mut params = EnrichParams::default();
    params.ratio_threshold = 1000.0;
    let p = resolved(&params);
    assert_eq!(
        classify_spot(&[5.0, 0.0, 0.0], &flat_thresholds(5.0), &p),
        SpotLabel::Enriched(0)
    );
}

#[test]
fn test_all_zero_row() {
    let p = resolved(&EnrichParams::default());
    assert_eq!(
        classify_spot(&[0.0, 0.0, 0.0], &flat_thresholds(0.0), &p),
        SpotLabel::Enriched(0)
    );
    assert_eq!(
        classify_spot(&[0.0, 0.0, 0.0], &flat_thresholds(1.0), &p),
        SpotLabel::Unknown
    );
}

#[test]
fn test_ratio_override_applies_to_leading_type_only() {
    let mut params = EnrichParams::default();
    params.ratio_overrides.insert("B".to_string(), 5.0);
    let p = resolved(&params);
    let t = flat_thresholds(0.0);

    assert_eq!(classify_spot(&[3.0, 1.0, 0.0], &t, &p), SpotLabel::Enriched(0));
    assert_eq!(classify_spot(&[1.0, 3.0, 0.0], &t, &p), SpotLabel::Unknown);
    assert_eq!(classify_spot(&[1.0, 6.0, 0.0], &t, &p), SpotLabel::Enriched(1));
}

#[test]
fn test_mix_uses_default_ratio_even_with_override() {
    // Leading type has a stricter override (2.0). A 1.5 ratio fails
    // enrichment and also misses the Mix band, which is bounded by the
    // default 1.1 rather than the override.
    let mut params = EnrichParams::default();
    params.ratio_overrides.insert("A".to_string(), 2.0);
    let t = flat_thresholds(0.0);

    let p = resolved(&params);
    assert_eq!(classify_spot(&[3.0, 2.0, 0.0], &t, &p), SpotLabel::Unknown);

    params.mix_boundary = MixBoundary::EffectiveRatio;
    let p = resolved(&params);
    assert_eq!(classify_spot(&[3.0, 2.0, 0.0], &t, &p), SpotLabel::Mix);
}

#[test]
fn test_ratio_monotonicity() {
    let p = resolved(&EnrichParams::default());
    let t = flat_thresholds(4.0);
    let mut enriched_seen = false;
    for second in [4.0, 3.8, 3.5, 3.0, 2.0, 1.0, 0.5, 0.0] {
        let label = classify_spot(&[4.0, second, 0.0], &t, &p);
        if enriched_seen {
            assert_eq!(label, SpotLabel::Enriched(0), "second={second}");
        }
        enriched_seen |= label == SpotLabel::Enriched(0);
    }
    assert!(enriched_seen);
}

#[test]
fn test_run_stage2_keeps_row_order() {
    let table = crate::model::table::CountTable::new(
        vec!["s1".to_string(), "s2".to_string()],
        types(),
        vec![vec![1.0, 1.0, 0.0], vec![0.0, 9.0, 1.0]],
    )
    .unwrap();
    let p = resolved(&EnrichParams::default());
    let labels = run_stage2(&table, &flat_thresholds(0.0), &p);
    assert_eq!(labels, vec![SpotLabel::Mix, SpotLabel::Enriched(1)]);
}
