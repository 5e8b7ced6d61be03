use approx::assert_relative_eq;
use indexmap::IndexMap;
use proptest::prelude::*;
use ticket_chart::core::histogram::normalize;
use ticket_chart::core::{HistogramTuning, density_by_category, histogram, percentile, smooth};

#[test]
fn histogram_bins_cover_zero_to_domain_max() {
    let counts = histogram(&[0.0, 0.5, 1.0, 2.5, 9.9, 10.0], 10, 10.0);
    assert_eq!(counts, vec![2.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
}

#[test]
fn histogram_excludes_values_above_the_domain_and_non_finite() {
    let counts = histogram(&[1.0, 11.0, f64::NAN, f64::INFINITY, -3.0], 5, 10.0);
    assert_eq!(counts.iter().sum::<f64>(), 2.0);
    assert_eq!(counts[0], 2.0);
}

#[test]
fn histogram_with_non_positive_domain_uses_the_first_bin() {
    let counts = histogram(&[0.0, -1.0], 4, 0.0);
    assert_eq!(counts, vec![2.0, 0.0, 0.0, 0.0]);
    assert!(histogram(&[1.0], 0, 10.0).is_empty());
}

#[test]
fn smoothing_truncates_at_the_edges() {
    let smoothed = smooth(&[3.0, 0.0, 0.0, 0.0, 6.0], 1);
    assert_relative_eq!(smoothed[0], 1.5, epsilon = 1e-12);
    assert_relative_eq!(smoothed[1], 1.0, epsilon = 1e-12);
    assert_relative_eq!(smoothed[2], 0.0, epsilon = 1e-12);
    assert_relative_eq!(smoothed[4], 3.0, epsilon = 1e-12);
    assert_eq!(smooth(&[1.0, 2.0], 0), vec![1.0, 2.0]);
}

#[test]
fn percentile_interpolates_between_ranks() {
    let samples = [5.0, 1.0, 3.0, 2.0, 4.0];
    assert_eq!(percentile(&samples, 0.0), Some(1.0));
    assert_eq!(percentile(&samples, 0.5), Some(3.0));
    assert_eq!(percentile(&samples, 1.0), Some(5.0));
    assert_relative_eq!(percentile(&samples, 0.95).expect("samples"), 4.8, epsilon = 1e-12);
    assert_eq!(percentile(&[], 0.5), None);
    assert_eq!(percentile(&[f64::NAN], 0.5), None);
}

#[test]
fn normalize_keeps_all_zero_input() {
    assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    assert_eq!(normalize(&[1.0, 3.0]), vec![0.25, 0.75]);
}

#[test]
fn density_shares_a_percentile_domain_across_categories() {
    let mut groups = IndexMap::new();
    groups.insert("billing".to_owned(), vec![1.0, 2.0, 3.0, 4.0]);
    groups.insert("login".to_owned(), vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 200.0]);

    let set = density_by_category(&groups, HistogramTuning::default());
    let all: Vec<f64> = groups.values().flatten().copied().collect();
    assert_eq!(set.domain_max, percentile(&all, 0.95).expect("samples"));
    assert!(set.domain_max < 200.0);

    let categories: Vec<&str> = set.curves.iter().map(|curve| curve.category.as_str()).collect();
    assert_eq!(categories, vec!["billing", "login"]);

    let login = &set.curves[1];
    assert_eq!(login.sample_count, 7);
    assert_eq!(login.excluded, 1);
    assert_eq!(login.counts.len(), 40);
    assert_eq!(login.smoothed.len(), 40);
    assert!(set.peak() > 0.0);
}

#[test]
fn density_falls_back_to_unit_domain_without_positive_samples() {
    let mut groups = IndexMap::new();
    groups.insert("empty".to_owned(), Vec::new());
    groups.insert("zeros".to_owned(), vec![0.0, 0.0]);

    let set = density_by_category(&groups, HistogramTuning::default());
    assert_eq!(set.domain_max, 1.0);
    assert_eq!(set.curves[1].counts[0], 2.0);
}

#[test]
fn invalid_tuning_produces_an_empty_set() {
    let mut groups = IndexMap::new();
    groups.insert("a".to_owned(), vec![1.0]);
    let tuning = HistogramTuning {
        bin_count: 0,
        ..HistogramTuning::default()
    };
    assert!(tuning.validate().is_err());
    assert!(density_by_category(&groups, tuning).is_empty());
}

proptest! {
    #[test]
    fn histogram_conserves_in_domain_samples(
        samples in proptest::collection::vec(-100.0f64..1_000.0, 0..200),
        bins in 1usize..64,
        domain_max in 1.0f64..500.0
    ) {
        let counts = histogram(&samples, bins, domain_max);
        let expected = samples.iter().filter(|sample| **sample <= domain_max).count();
        prop_assert_eq!(counts.len(), bins);
        prop_assert_eq!(counts.iter().sum::<f64>() as usize, expected);
    }

    #[test]
    fn smoothing_stays_within_input_bounds(
        counts in proptest::collection::vec(0.0f64..100.0, 1..64),
        radius in 0usize..6
    ) {
        let smoothed = smooth(&counts, radius);
        let max = counts.iter().copied().fold(0.0, f64::max);
        prop_assert_eq!(smoothed.len(), counts.len());
        prop_assert!(smoothed.iter().all(|value| *value >= 0.0 && *value <= max + 1e-9));
    }
}
