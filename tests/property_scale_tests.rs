use proptest::prelude::*;
use ticket_chart::core::{BreakTuning, Breakpoints, BrokenScale, LinearScale};
use ticket_chart::core::ticks::{tick_step, ticks_for_domain};

proptest! {
    #[test]
    fn linear_scale_round_trip_property(
        domain_start in -1_000_000.0f64..1_000_000.0,
        domain_span in 0.001f64..1_000_000.0,
        value_factor in 0.0f64..1.0
    ) {
        let domain_end = domain_start + domain_span;
        let value = domain_start + value_factor * domain_span;
        let scale = LinearScale::try_new((domain_start, domain_end), (1024.0, 0.0)).expect("valid scale");

        let recovered = scale.invert(scale.map(value));
        prop_assert!((recovered - value).abs() <= 1e-6 * domain_span.max(1.0));
    }

    #[test]
    fn linear_scale_never_emits_non_finite_pixels(
        domain_start in proptest::num::f64::ANY,
        domain_end in proptest::num::f64::ANY,
        value in proptest::num::f64::ANY
    ) {
        let scale = LinearScale::new((domain_start, domain_end), (300.0, 0.0));
        prop_assert!(scale.map(value).is_finite());
    }

    #[test]
    fn broken_scale_is_monotonic_across_joins(
        lower_factor in 0.05f64..0.45,
        upper_factor in 0.55f64..0.95,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0
    ) {
        let domain = (0.0, 1_000.0);
        let breakpoints = Breakpoints {
            lower: domain.1 * lower_factor,
            upper: domain.1 * upper_factor,
        };
        let scale = BrokenScale::three_band(domain, (400.0, 0.0), breakpoints, &BreakTuning::default())
            .expect("valid bands");

        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_pixel = scale.map(low * domain.1);
        let high_pixel = scale.map(high * domain.1);
        // Inverted Y range: larger values sit higher, so pixels decrease.
        prop_assert!(high_pixel <= low_pixel + 1e-9);

        for join in [breakpoints.lower, breakpoints.upper] {
            let below = scale.map(join - 1e-6);
            let above = scale.map(join + 1e-6);
            prop_assert!((below - above).abs() < 1e-3);
        }
    }

    #[test]
    fn broken_scale_round_trip_property(value_factor in 0.0f64..1.0) {
        let breakpoints = Breakpoints { lower: 20.0, upper: 70.0 };
        let scale = BrokenScale::three_band((0.0, 100.0), (0.0, 500.0), breakpoints, &BreakTuning::default())
            .expect("valid bands");

        let value = value_factor * 100.0;
        prop_assert!((scale.invert(scale.map(value)) - value).abs() <= 1e-7);
    }

    #[test]
    fn ladder_ticks_never_exceed_six(max in 0.001f64..5_000.0) {
        let ticks = ticks_for_domain(0.0, max);
        prop_assert!(!ticks.is_empty());
        prop_assert!(ticks.len() <= 6);
        prop_assert!(ticks.iter().all(|tick| *tick >= 0.0 && *tick <= max + 1e-9));
        prop_assert!((max / tick_step(max)).ceil() <= 5.0);
    }
}
