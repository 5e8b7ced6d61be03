use serde::{Deserialize, Serialize};

use crate::core::broken_scale::{BreakSpec, BrokenScale, Breakpoints};
use crate::core::ticks::{nice_domain_max, ticks_for_domain};
use crate::error::{ChartError, ChartResult};
use crate::telemetry::{DiagnosticEvent, DiagnosticsSink, TracingSink};

/// Domain used when the requested one cannot produce finite pixels.
pub const FALLBACK_DOMAIN: (f64, f64) = (0.0, 1.0);

/// Single affine map from a numeric domain onto a pixel range.
///
/// The range may run in either direction (`(bottom, top)` for a Y axis).
/// Mapping is total: non-finite input or output lands on the range start,
/// which is the chart origin for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    /// Builds a scale, substituting [`FALLBACK_DOMAIN`] for a non-finite or
    /// empty domain and a zero-length range at `0` for a non-finite range.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::with_sink(domain, range, &TracingSink)
    }

    #[must_use]
    pub fn with_sink(domain: (f64, f64), range: (f64, f64), sink: &dyn DiagnosticsSink) -> Self {
        let (domain_start, domain_end) = if is_usable_domain(domain) {
            domain
        } else {
            sink.record(&DiagnosticEvent::DegenerateDomain {
                requested: domain,
                substituted: FALLBACK_DOMAIN,
            });
            FALLBACK_DOMAIN
        };
        let (range_start, range_end) = if range.0.is_finite() && range.1.is_finite() {
            range
        } else {
            sink.record(&DiagnosticEvent::NonFiniteClamped {
                context: "linear scale range",
            });
            (0.0, 0.0)
        };

        Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        }
    }

    /// Strict constructor that rejects instead of substituting.
    pub fn try_new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !is_usable_domain(domain) {
            return Err(ChartError::InvalidData(
                "scale domain must be finite with max > min".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps a domain value to a pixel. Values outside the domain extrapolate.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.range_start;
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        let pixel = self.range_start + normalized * (self.range_end - self.range_start);
        if pixel.is_finite() {
            pixel
        } else {
            self.range_start
        }
    }

    /// Maps a pixel back to the domain. A zero-length range inverts to the
    /// domain start.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if !pixel.is_finite() || span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        let value = self.domain_start + normalized * (self.domain_end - self.domain_start);
        if value.is_finite() {
            value
        } else {
            self.domain_start
        }
    }

    /// Ladder ticks inside the domain.
    #[must_use]
    pub fn ticks(self) -> Vec<f64> {
        ticks_for_domain(self.domain_start, self.domain_end)
    }

    /// Extends the domain end to the next ladder tick.
    #[must_use]
    pub fn nice(self) -> Self {
        Self {
            domain_end: nice_domain_max(self.domain_start, self.domain_end),
            ..self
        }
    }

    /// Same domain mapped onto another pixel range.
    #[must_use]
    pub fn with_range(self, range: (f64, f64)) -> Self {
        if !range.0.is_finite() || !range.1.is_finite() {
            return self;
        }
        Self {
            range_start: range.0,
            range_end: range.1,
            ..self
        }
    }
}

fn is_usable_domain(domain: (f64, f64)) -> bool {
    domain.0.is_finite() && domain.1.is_finite() && domain.1 > domain.0
}

/// Active pixel mapping for one chart axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Scale {
    Linear(LinearScale),
    Broken(BrokenScale),
}

impl Scale {
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        match self {
            Self::Linear(scale) => scale.map(value),
            Self::Broken(scale) => scale.map(value),
        }
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        match self {
            Self::Linear(scale) => scale.invert(pixel),
            Self::Broken(scale) => scale.invert(pixel),
        }
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        match self {
            Self::Linear(scale) => scale.ticks(),
            Self::Broken(scale) => scale.ticks(),
        }
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.domain(),
            Self::Broken(scale) => scale.domain(),
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Broken(scale) => scale.range(),
        }
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        matches!(self, Self::Broken(_))
    }

    #[must_use]
    pub fn breakpoints(&self) -> Option<Breakpoints> {
        match self {
            Self::Linear(_) => None,
            Self::Broken(scale) => Some(scale.breakpoints()),
        }
    }

    /// Pixel band of the compressed segment, ordered as the range runs.
    #[must_use]
    pub fn break_band(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(_) => None,
            Self::Broken(scale) => Some(scale.break_band()),
        }
    }

    /// Pixel of domain value `0`, used as the fill baseline for areas.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.map(0.0)
    }
}

impl From<LinearScale> for Scale {
    fn from(scale: LinearScale) -> Self {
        Self::Linear(scale)
    }
}

impl From<BrokenScale> for Scale {
    fn from(scale: BrokenScale) -> Self {
        Self::Broken(scale)
    }
}

/// Linear scale with degenerate-domain substitution.
#[must_use]
pub fn make_linear_scale(domain: (f64, f64), range: (f64, f64)) -> Scale {
    Scale::Linear(LinearScale::new(domain, range))
}

/// Broken scale when `spec` detects a dominant early peak, linear otherwise.
#[must_use]
pub fn make_broken_scale(domain: (f64, f64), range: (f64, f64), spec: &BreakSpec<'_>) -> Scale {
    make_broken_scale_with_sink(domain, range, spec, &TracingSink)
}

#[must_use]
pub fn make_broken_scale_with_sink(
    domain: (f64, f64),
    range: (f64, f64),
    spec: &BreakSpec<'_>,
    sink: &dyn DiagnosticsSink,
) -> Scale {
    let linear = LinearScale::with_sink(domain, range, sink);
    let Some(detection) = spec.detect() else {
        return Scale::Linear(linear);
    };

    let (domain_start, domain_end) = linear.domain();
    let domain_end = domain_end.max(detection.primary_peak);
    match BrokenScale::three_band(
        (domain_start, domain_end),
        linear.range(),
        detection.breakpoints,
        &spec.tuning,
    ) {
        Some(broken) => {
            sink.record(&DiagnosticEvent::BrokenScaleActivated {
                primary_peak: detection.primary_peak,
                others_peak: detection.others_peak,
                breakpoints: detection.breakpoints,
            });
            Scale::Broken(broken)
        }
        None => Scale::Linear(linear),
    }
}
