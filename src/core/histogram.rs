use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::error::{ChartError, ChartResult};

/// Tuning for density curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramTuning {
    pub bin_count: usize,
    pub smoothing_radius: usize,
    /// Quantile of all samples used as the shared domain max.
    pub domain_percentile: f64,
}

impl Default for HistogramTuning {
    fn default() -> Self {
        Self {
            bin_count: 40,
            smoothing_radius: 2,
            domain_percentile: 0.95,
        }
    }
}

impl HistogramTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if self.bin_count == 0 {
            return Err(ChartError::InvalidConfig(
                "histogram bin count must be > 0".to_owned(),
            ));
        }
        if !self.domain_percentile.is_finite() || !(0.0..=1.0).contains(&self.domain_percentile)
        {
            return Err(ChartError::InvalidConfig(
                "histogram domain percentile must be in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Counts samples into `bin_count` equal-width bins over `[0, domain_max]`.
///
/// Negative samples fall into the first bin, samples above `domain_max` and
/// non-finite samples are excluded, so the counts always sum to the number of
/// finite samples `<= domain_max`. A value equal to `domain_max` lands in the
/// last bin. A non-positive `domain_max` places every qualifying sample in the
/// first bin.
#[must_use]
pub fn histogram(samples: &[f64], bin_count: usize, domain_max: f64) -> Vec<f64> {
    let mut counts = vec![0.0; bin_count];
    if bin_count == 0 || domain_max.is_nan() {
        return counts;
    }

    let bin_width = domain_max / bin_count as f64;
    for &sample in samples {
        if !sample.is_finite() || sample > domain_max {
            continue;
        }
        let index = if domain_max <= 0.0 || sample <= 0.0 {
            0
        } else {
            ((sample / bin_width).floor() as usize).min(bin_count - 1)
        };
        counts[index] += 1.0;
    }
    counts
}

/// Centered moving average with truncation at the array bounds.
///
/// Each output bin averages itself and up to `radius` neighbors on each side
/// that exist; there is no wraparound.
#[must_use]
pub fn smooth(counts: &[f64], radius: usize) -> Vec<f64> {
    if radius == 0 {
        return counts.to_vec();
    }

    (0..counts.len())
        .map(|index| {
            let start = index.saturating_sub(radius);
            let end = (index + radius + 1).min(counts.len());
            let window = &counts[start..end];
            let sum: f64 = window.iter().copied().filter(|v| v.is_finite()).sum();
            sum / window.len() as f64
        })
        .collect()
}

/// Quantile `p` of the finite samples, interpolating between closest ranks.
#[must_use]
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if !p.is_finite() {
        return None;
    }
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Rescales counts so they sum to `1`. All-zero input stays all zero.
#[must_use]
pub fn normalize(counts: &[f64]) -> Vec<f64> {
    let total: f64 = counts.iter().copied().filter(|v| v.is_finite()).sum();
    if total <= 0.0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|v| if v.is_finite() { v / total } else { 0.0 })
        .collect()
}

/// Smoothed histogram of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub category: String,
    pub sample_count: usize,
    /// Samples above the shared domain max.
    pub excluded: usize,
    pub counts: Vec<f64>,
    pub smoothed: Vec<f64>,
}

impl DensityCurve {
    /// Domain value at the center of bin `index`.
    #[must_use]
    pub fn bin_center(&self, index: usize, domain_max: f64) -> f64 {
        let bins = self.counts.len().max(1) as f64;
        (index as f64 + 0.5) * domain_max / bins
    }

    #[must_use]
    pub fn peak(&self) -> f64 {
        self.smoothed.iter().copied().fold(0.0, f64::max)
    }
}

/// Density curves for several categories over one shared domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensitySet {
    pub domain_max: f64,
    pub curves: Vec<DensityCurve>,
}

impl DensitySet {
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.curves.iter().map(DensityCurve::peak).fold(0.0, f64::max)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// Builds one smoothed histogram per category.
///
/// The domain max is the configured percentile of every sample across all
/// categories, so one extreme category cannot flatten the rest.
#[must_use]
pub fn density_by_category(
    groups: &IndexMap<String, Vec<f64>>,
    tuning: HistogramTuning,
) -> DensitySet {
    let Ok(tuning) = tuning.validate() else {
        return DensitySet {
            domain_max: 0.0,
            curves: Vec::new(),
        };
    };

    let all: Vec<f64> = groups.values().flatten().copied().collect();
    let domain_max = percentile(&all, tuning.domain_percentile)
        .filter(|max| *max > 0.0)
        .unwrap_or(1.0);

    let build = |(category, samples): (&String, &Vec<f64>)| {
        let counts = histogram(samples, tuning.bin_count, domain_max);
        let finite = samples.iter().filter(|v| v.is_finite()).count();
        let binned = counts.iter().sum::<f64>() as usize;
        DensityCurve {
            category: category.clone(),
            sample_count: finite,
            excluded: finite.saturating_sub(binned),
            smoothed: smooth(&counts, tuning.smoothing_radius),
            counts,
        }
    };

    #[cfg(feature = "parallel-projection")]
    let curves: Vec<DensityCurve> = groups
        .iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(build)
        .collect();

    #[cfg(not(feature = "parallel-projection"))]
    let curves: Vec<DensityCurve> = groups.iter().map(build).collect();

    DensitySet { domain_max, curves }
}
