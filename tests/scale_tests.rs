use approx::assert_relative_eq;
use ticket_chart::core::broken_scale::BreakDetection;
use ticket_chart::core::scale::{FALLBACK_DOMAIN, make_broken_scale_with_sink};
use ticket_chart::core::{
    BreakSpec, BreakTuning, Breakpoints, BrokenScale, LinearScale, Scale, make_broken_scale,
    make_linear_scale,
};
use ticket_chart::telemetry::{CollectingSink, DiagnosticEvent};

const EARLY_SPIKE: [f64; 6] = [100.0, 80.0, 5.0, 4.0, 3.0, 2.0];
const STEADY: [f64; 6] = [10.0, 12.0, 8.0, 6.0, 5.0, 4.0];

#[test]
fn linear_scale_maps_and_inverts() {
    let scale = LinearScale::new((0.0, 100.0), (300.0, 0.0));
    assert_eq!(scale.map(0.0), 300.0);
    assert_eq!(scale.map(100.0), 0.0);
    assert_eq!(scale.map(25.0), 225.0);
    assert_eq!(scale.map(150.0), -150.0);
    assert_relative_eq!(scale.invert(scale.map(42.5)), 42.5, epsilon = 1e-9);
}

#[test]
fn non_finite_input_lands_on_the_origin() {
    let scale = LinearScale::new((0.0, 100.0), (300.0, 0.0));
    assert_eq!(scale.map(f64::NAN), 300.0);
    assert_eq!(scale.map(f64::INFINITY), 300.0);
    assert_eq!(scale.invert(f64::NAN), 0.0);
}

#[test]
fn degenerate_domains_are_substituted_and_reported() {
    let sink = CollectingSink::new();
    let scale = LinearScale::with_sink((0.0, 0.0), (300.0, 0.0), &sink);

    assert_eq!(scale.domain(), FALLBACK_DOMAIN);
    assert!(scale.map(0.0).is_finite());
    assert_eq!(
        sink.events(),
        vec![DiagnosticEvent::DegenerateDomain {
            requested: (0.0, 0.0),
            substituted: FALLBACK_DOMAIN,
        }]
    );

    let nan_domain = LinearScale::with_sink((f64::NAN, 1.0), (0.0, 10.0), &sink);
    assert_eq!(nan_domain.domain(), FALLBACK_DOMAIN);
    assert_eq!(sink.len(), 2);
}

#[test]
fn non_finite_ranges_collapse_to_zero() {
    let sink = CollectingSink::new();
    let scale = LinearScale::with_sink((0.0, 1.0), (0.0, f64::INFINITY), &sink);
    assert_eq!(scale.range(), (0.0, 0.0));
    assert_eq!(scale.map(0.5), 0.0);
    assert!(matches!(
        sink.events().as_slice(),
        [DiagnosticEvent::NonFiniteClamped { .. }]
    ));
}

#[test]
fn strict_constructor_rejects_bad_input() {
    assert!(LinearScale::try_new((1.0, 1.0), (0.0, 10.0)).is_err());
    assert!(LinearScale::try_new((0.0, 1.0), (f64::NAN, 10.0)).is_err());
    assert!(LinearScale::try_new((0.0, 1.0), (0.0, 10.0)).is_ok());
}

#[test]
fn ticks_follow_the_ladder_and_nice_extends_the_domain() {
    let scale = LinearScale::new((0.0, 87.0), (300.0, 0.0));
    assert_eq!(scale.ticks(), vec![0.0, 20.0, 40.0, 60.0, 80.0]);

    let nice = scale.nice();
    assert_eq!(nice.domain(), (0.0, 100.0));
    assert_eq!(nice.ticks(), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
}

#[test]
fn break_detection_derives_breakpoints_from_the_data() {
    let spec = BreakSpec::new(&EARLY_SPIKE, &[&STEADY]);
    let detection: BreakDetection = spec.detect().expect("dominant early peak");

    assert_eq!(detection.primary_peak, 100.0);
    assert_eq!(detection.others_peak, 12.0);
    assert_relative_eq!(detection.breakpoints.lower, 20.8, epsilon = 1e-9);
    assert_relative_eq!(detection.breakpoints.upper, 64.8, epsilon = 1e-9);
    assert!(detection.breakpoints.lower > detection.others_peak);
    assert!(detection.breakpoints.upper < detection.primary_peak);
}

#[test]
fn break_detection_requires_dominance_and_a_real_peak() {
    let quiet = [8.0, 7.0, 1.0];
    assert!(BreakSpec::new(&quiet, &[&[1.0, 1.0, 1.0][..]]).detect().is_none());

    let at_threshold = [10.0, 7.0, 1.0];
    assert!(BreakSpec::new(&at_threshold, &[&[1.0, 1.0, 1.0][..]]).detect().is_none());
    let above_threshold = [10.5, 7.0, 1.0];
    assert!(BreakSpec::new(&above_threshold, &[&[1.0, 1.0, 1.0][..]]).detect().is_some());

    let close = [30.0, 20.0, 10.0];
    assert!(BreakSpec::new(&close, &[&[20.0, 20.0, 20.0][..]]).detect().is_none());

    let late_spike = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 500.0];
    assert!(BreakSpec::new(&late_spike, &[&[5.0; 10][..]]).detect().is_none());

    assert!(BreakSpec::new(&[], &[]).detect().is_none());
}

#[test]
fn broken_scale_splits_the_range_into_three_bands() {
    let sink = CollectingSink::new();
    let spec = BreakSpec::new(&EARLY_SPIKE, &[&STEADY]);
    let scale = make_broken_scale_with_sink((0.0, 100.0), (300.0, 0.0), &spec, &sink);

    assert!(scale.is_broken());
    assert_eq!(scale.map(0.0), 300.0);
    assert_relative_eq!(scale.map(20.8), 120.0, epsilon = 1e-9);
    assert_relative_eq!(scale.map(64.8), 90.0, epsilon = 1e-9);
    assert_relative_eq!(scale.map(100.0), 0.0, epsilon = 1e-9);
    let (band_start, band_end) = scale.break_band().expect("broken scale has a band");
    assert_relative_eq!(band_start, 120.0, epsilon = 1e-9);
    assert_relative_eq!(band_end, 90.0, epsilon = 1e-9);
    assert!(matches!(
        sink.events().as_slice(),
        [DiagnosticEvent::BrokenScaleActivated { primary_peak, .. }] if *primary_peak == 100.0
    ));
}

#[test]
fn broken_scale_ticks_skip_the_compressed_band() {
    let scale = make_broken_scale(
        (0.0, 100.0),
        (300.0, 0.0),
        &BreakSpec::new(&EARLY_SPIKE, &[&STEADY]),
    );
    assert_eq!(
        scale.ticks(),
        vec![0.0, 5.0, 10.0, 15.0, 20.0, 70.0, 80.0, 90.0, 100.0]
    );
}

#[test]
fn broken_scale_inverts_across_every_segment() {
    let breakpoints = Breakpoints {
        lower: 20.0,
        upper: 60.0,
    };
    let scale = BrokenScale::three_band(
        (0.0, 100.0),
        (0.0, 500.0),
        breakpoints,
        &BreakTuning::default(),
    )
    .expect("valid bands");
    for value in [0.0, 10.0, 20.0, 35.0, 60.0, 75.0, 100.0] {
        assert_relative_eq!(scale.invert(scale.map(value)), value, epsilon = 1e-9);
    }
}

#[test]
fn broken_scale_degrades_to_linear_without_dominance() {
    let scale = make_broken_scale(
        (0.0, 20.0),
        (300.0, 0.0),
        &BreakSpec::new(&STEADY, &[&STEADY]),
    );
    assert!(!scale.is_broken());
    assert_eq!(scale.breakpoints(), None);
    assert_eq!(scale, make_linear_scale((0.0, 20.0), (300.0, 0.0)));
}

#[test]
fn broken_scale_extends_the_domain_to_the_primary_peak() {
    let scale = make_broken_scale(
        (0.0, 50.0),
        (300.0, 0.0),
        &BreakSpec::new(&EARLY_SPIKE, &[&STEADY]),
    );
    assert_eq!(scale.domain(), (0.0, 100.0));
}

#[test]
fn two_segment_scale_joins_at_the_breakpoint() {
    let scale = BrokenScale::two_segment((0.0, 1_000.0), (0.0, 400.0), 100.0, 0.75).expect("valid");
    assert_eq!(scale.map(100.0), 300.0);
    assert_eq!(scale.map(1_000.0), 400.0);
    assert_eq!(scale.break_band(), (300.0, 300.0));
    assert_eq!(scale.segments().len(), 2);

    assert!(BrokenScale::two_segment((0.0, 10.0), (0.0, 400.0), 20.0, 0.75).is_none());
    assert!(BrokenScale::two_segment((0.0, 10.0), (0.0, 400.0), 5.0, 1.0).is_none());
}

#[test]
fn invalid_tuning_is_rejected() {
    let tuning = BreakTuning {
        lower_position: 0.7,
        upper_position: 0.6,
        ..BreakTuning::default()
    };
    assert!(tuning.validate().is_err());
    assert!(BreakTuning::default().validate().is_ok());

    let spec = BreakSpec::new(&EARLY_SPIKE, &[&STEADY]).with_tuning(tuning);
    assert!(spec.detect().is_none());
}

#[test]
fn scale_baseline_is_the_zero_pixel() {
    let scale: Scale = LinearScale::new((0.0, 10.0), (200.0, 0.0)).into();
    assert_eq!(scale.baseline(), 200.0);
}
