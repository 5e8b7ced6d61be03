/// Step sizes tried in order when choosing axis ticks.
pub const TICK_STEP_LADDER: [f64; 10] = [1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0];

/// Maximum number of intervals between ticks (six ticks including zero).
pub const MAX_TICK_INTERVALS: f64 = 5.0;

/// Step for spans beyond the ladder is rounded up to this unit.
const OVERFLOW_STEP_UNIT: f64 = 100.0;

/// Tick lists longer than this are treated as a caller error and dropped.
const MAX_TICKS_PER_AXIS: i64 = 1_000;

/// Tolerance for float noise when testing whether a multiple lies in range.
const TICK_EPSILON: f64 = 1e-9;

/// Chooses the tick step for a domain span.
///
/// Returns the smallest ladder step that divides `span` into at most
/// [`MAX_TICK_INTERVALS`] intervals. Spans past the ladder use
/// `ceil(span / 5 / 100) * 100`. Non-positive or non-finite spans use the
/// first ladder step.
#[must_use]
pub fn tick_step(span: f64) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return TICK_STEP_LADDER[0];
    }

    TICK_STEP_LADDER
        .iter()
        .copied()
        .find(|step| (span / step).ceil() <= MAX_TICK_INTERVALS)
        .unwrap_or_else(|| (span / MAX_TICK_INTERVALS / OVERFLOW_STEP_UNIT).ceil() * OVERFLOW_STEP_UNIT)
}

/// Multiples of `step` inside `[min, max]`, ascending.
#[must_use]
pub fn ticks_with_step(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || !step.is_finite() || step <= 0.0 || max < min {
        return Vec::new();
    }

    let first = (min / step - TICK_EPSILON).ceil() as i64;
    let last = (max / step + TICK_EPSILON).floor() as i64;
    if last.saturating_sub(first) > MAX_TICKS_PER_AXIS {
        return Vec::new();
    }
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Ladder ticks for the domain `[min, max]`.
#[must_use]
pub fn ticks_for_domain(min: f64, max: f64) -> Vec<f64> {
    ticks_with_step(min, max, tick_step(max - min))
}

/// Rounds `max` up to the next tick of its ladder step.
#[must_use]
pub fn nice_domain_max(min: f64, max: f64) -> f64 {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return max;
    }
    let step = tick_step(max - min);
    (max / step - TICK_EPSILON).ceil() * step
}
