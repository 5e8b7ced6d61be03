use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ticks::{tick_step, ticks_for_domain, ticks_with_step};
use crate::error::{ChartError, ChartResult};

/// Controls when a broken scale activates and how it splits the pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakTuning {
    /// Share of leading buckets that form the early window.
    pub early_window_ratio: f64,
    /// Lower bound on the early window length, in buckets.
    pub min_early_window: usize,
    /// Primary early peak must be at least this multiple of the others' peak.
    pub dominance_ratio: f64,
    /// Primary early peaks at or below this are treated as noise.
    pub min_peak: f64,
    /// Lower breakpoint position between the others' peak (0) and the primary peak (1).
    pub lower_position: f64,
    /// Upper breakpoint position on the same interpolation.
    pub upper_position: f64,
    /// Share of the pixel range given to values below the lower breakpoint.
    pub lower_band: f64,
    /// Share of the pixel range given to the compressed band.
    pub break_band: f64,
}

impl Default for BreakTuning {
    fn default() -> Self {
        Self {
            early_window_ratio: 1.0 / 3.0,
            min_early_window: 3,
            dominance_ratio: 2.0,
            min_peak: 10.0,
            lower_position: 0.1,
            upper_position: 0.6,
            lower_band: 0.6,
            break_band: 0.1,
        }
    }
}

impl BreakTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.early_window_ratio.is_finite()
            || self.early_window_ratio <= 0.0
            || self.early_window_ratio > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "break early window ratio must be in (0, 1]".to_owned(),
            ));
        }
        if !self.dominance_ratio.is_finite() || self.dominance_ratio < 1.0 {
            return Err(ChartError::InvalidConfig(
                "break dominance ratio must be finite and >= 1".to_owned(),
            ));
        }
        if !self.min_peak.is_finite() || self.min_peak <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "break minimum peak must be finite and > 0".to_owned(),
            ));
        }
        if !(0.0 < self.lower_position
            && self.lower_position < self.upper_position
            && self.upper_position < 1.0)
        {
            return Err(ChartError::InvalidConfig(
                "break positions must satisfy 0 < lower < upper < 1".to_owned(),
            ));
        }
        if !(self.lower_band > 0.0
            && self.break_band > 0.0
            && self.lower_band + self.break_band < 1.0)
        {
            return Err(ChartError::InvalidConfig(
                "break bands must be > 0 and leave room for the upper band".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Early window length for a series of `len` buckets.
    #[must_use]
    pub fn early_window_len(self, len: usize) -> usize {
        let by_ratio = (len as f64 * self.early_window_ratio).ceil() as usize;
        by_ratio.max(self.min_early_window).min(len)
    }
}

/// Domain values where the compressed band starts and ends.
///
/// Two-segment scales use the same value for both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub lower: f64,
    pub upper: f64,
}

/// Outcome of a successful break detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakDetection {
    pub primary_peak: f64,
    pub others_peak: f64,
    pub breakpoints: Breakpoints,
}

/// Series data that decides whether a scale should break.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakSpec<'a> {
    /// Series expected to dominate early buckets (e.g. self-resolved durations).
    pub primary: &'a [f64],
    pub others: Vec<&'a [f64]>,
    pub tuning: BreakTuning,
}

impl<'a> BreakSpec<'a> {
    #[must_use]
    pub fn new(primary: &'a [f64], others: &[&'a [f64]]) -> Self {
        Self {
            primary,
            others: others.to_vec(),
            tuning: BreakTuning::default(),
        }
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: BreakTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Detects a dominant early peak and derives breakpoints from the data.
    ///
    /// Returns `None` when the tuning is invalid, the primary series is empty,
    /// its early peak is below the noise threshold, or it does not dominate
    /// every other series in the same window.
    #[must_use]
    pub fn detect(&self) -> Option<BreakDetection> {
        let tuning = self.tuning.validate().ok()?;
        let window = tuning.early_window_len(self.primary.len());
        if window == 0 {
            return None;
        }

        let primary_peak = finite_peak(&self.primary[..window]);
        let others_peak = self
            .others
            .iter()
            .map(|series| finite_peak(&series[..window.min(series.len())]))
            .fold(0.0, f64::max);

        if primary_peak <= tuning.min_peak
            || primary_peak < tuning.dominance_ratio * others_peak
            || primary_peak <= others_peak
        {
            return None;
        }

        let span = primary_peak - others_peak;
        let breakpoints = Breakpoints {
            lower: others_peak + span * tuning.lower_position,
            upper: others_peak + span * tuning.upper_position,
        };
        Some(BreakDetection {
            primary_peak,
            others_peak,
            breakpoints,
        })
    }
}

fn finite_peak(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(0.0, f64::max)
}

/// One affine piece of a broken scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleSegment {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub compressed: bool,
}

impl ScaleSegment {
    fn map(self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        let normalized = (value - self.domain.0) / span;
        self.range.0 + normalized * (self.range.1 - self.range.0)
    }

    fn invert(self, pixel: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return self.domain.0;
        }
        let normalized = (pixel - self.range.0) / span;
        self.domain.0 + normalized * (self.domain.1 - self.domain.0)
    }
}

/// Piecewise-affine scale with two or three continuous segments.
///
/// Segments share their join pixels, so the whole map stays monotonic in the
/// direction of the range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokenScale {
    segments: SmallVec<[ScaleSegment; 3]>,
    breakpoints: Breakpoints,
}

impl BrokenScale {
    /// Low band, compressed band and upper band, sized by `tuning`.
    ///
    /// Returns `None` unless `domain.0 < lower < upper < domain.1`, the range
    /// is finite and the tuning is valid.
    #[must_use]
    pub fn three_band(
        domain: (f64, f64),
        range: (f64, f64),
        breakpoints: Breakpoints,
        tuning: &BreakTuning,
    ) -> Option<Self> {
        let tuning = tuning.validate().ok()?;
        let values = [domain.0, breakpoints.lower, breakpoints.upper, domain.1];
        if !values.iter().all(|value| value.is_finite())
            || !values.windows(2).all(|pair| pair[0] < pair[1])
            || !range.0.is_finite()
            || !range.1.is_finite()
        {
            return None;
        }

        let pixel_span = range.1 - range.0;
        let lower_pixel = range.0 + pixel_span * tuning.lower_band;
        let upper_pixel = range.0 + pixel_span * (tuning.lower_band + tuning.break_band);

        let mut segments = SmallVec::new();
        segments.push(ScaleSegment {
            domain: (domain.0, breakpoints.lower),
            range: (range.0, lower_pixel),
            compressed: false,
        });
        segments.push(ScaleSegment {
            domain: (breakpoints.lower, breakpoints.upper),
            range: (lower_pixel, upper_pixel),
            compressed: true,
        });
        segments.push(ScaleSegment {
            domain: (breakpoints.upper, domain.1),
            range: (upper_pixel, range.1),
            compressed: false,
        });
        Some(Self {
            segments,
            breakpoints,
        })
    }

    /// Two segments joined at `breakpoint`; values above it share the
    /// remaining `1 - lower_share` of the range.
    #[must_use]
    pub fn two_segment(
        domain: (f64, f64),
        range: (f64, f64),
        breakpoint: f64,
        lower_share: f64,
    ) -> Option<Self> {
        let values = [domain.0, breakpoint, domain.1];
        if !values.iter().all(|value| value.is_finite())
            || !values.windows(2).all(|pair| pair[0] < pair[1])
            || !range.0.is_finite()
            || !range.1.is_finite()
            || !(lower_share > 0.0 && lower_share < 1.0)
        {
            return None;
        }

        let join = range.0 + (range.1 - range.0) * lower_share;
        let mut segments = SmallVec::new();
        segments.push(ScaleSegment {
            domain: (domain.0, breakpoint),
            range: (range.0, join),
            compressed: false,
        });
        segments.push(ScaleSegment {
            domain: (breakpoint, domain.1),
            range: (join, range.1),
            compressed: true,
        });
        Some(Self {
            segments,
            breakpoints: Breakpoints {
                lower: breakpoint,
                upper: breakpoint,
            },
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[ScaleSegment] {
        &self.segments
    }

    #[must_use]
    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.first().domain.0, self.last().domain.1)
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.first().range.0, self.last().range.1)
    }

    /// Pixel extent of the compressed band. For two segments both ends equal
    /// the join pixel.
    #[must_use]
    pub fn break_band(&self) -> (f64, f64) {
        if self.segments.len() == 3 {
            self.segments[1].range
        } else {
            let join = self.first().range.1;
            (join, join)
        }
    }

    /// Dispatches `value` to its segment by comparing against the breakpoints.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let origin = self.first().range.0;
        if !value.is_finite() {
            return origin;
        }
        let segment = self
            .segments
            .iter()
            .find(|segment| value <= segment.domain.1)
            .unwrap_or_else(|| self.last());
        let pixel = segment.map(value);
        if pixel.is_finite() { pixel } else { origin }
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        let (range_start, range_end) = self.range();
        let span = range_end - range_start;
        if !pixel.is_finite() || span == 0.0 {
            return self.first().domain.0;
        }

        let position = (pixel - range_start) / span;
        let segment = self
            .segments
            .iter()
            .find(|segment| position <= (segment.range.1 - range_start) / span)
            .unwrap_or_else(|| self.last());
        let value = segment.invert(pixel);
        if value.is_finite() {
            value
        } else {
            self.first().domain.0
        }
    }

    /// Ladder ticks below the lower breakpoint plus ladder ticks above the
    /// upper breakpoint. The compressed band carries no ticks.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        let (domain_start, domain_end) = self.domain();
        let Breakpoints { lower, upper } = self.breakpoints;

        let mut ticks = ticks_for_domain(domain_start, lower);
        let upper_ticks = ticks_with_step(upper, domain_end, tick_step(domain_end - upper));
        for tick in upper_ticks {
            if ticks.last().is_none_or(|last| tick > *last) {
                ticks.push(tick);
            }
        }
        ticks
    }

    fn first(&self) -> &ScaleSegment {
        &self.segments[0]
    }

    fn last(&self) -> &ScaleSegment {
        &self.segments[self.segments.len() - 1]
    }
}
