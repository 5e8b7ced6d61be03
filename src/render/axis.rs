use serde::{Deserialize, Serialize};

use crate::core::path::{break_marker_path, polyline_path};
use crate::core::{Bucket, LinearScale, PlotArea, Scale};
use crate::render::{
    AXIS_COLOR, PathShape, RenderFrame, TEXT_COLOR, TextHAlign, TextShape,
};

/// Font size for tick labels.
pub const AXIS_FONT_SIZE_PX: f64 = 11.0;
/// Minimum horizontal room per category label before labels are thinned.
pub const MIN_CATEGORY_LABEL_SPACING_PX: f64 = 48.0;

/// One labeled position along an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub pixel: f64,
    pub label: String,
}

/// Value-axis ticks for a linear or broken scale.
#[must_use]
pub fn value_axis_ticks(scale: &Scale, label: impl Fn(f64) -> String) -> Vec<AxisTick> {
    scale
        .ticks()
        .into_iter()
        .map(|value| AxisTick {
            value,
            pixel: scale.map(value),
            label: label(value),
        })
        .collect()
}

/// Category ticks at band centers, thinned to fit `plot_width`.
///
/// The first category is always labeled; after that every `step`-th one is.
#[must_use]
pub fn category_axis_ticks(labels: &[String], x_scale: &LinearScale, plot_width: f64) -> Vec<AxisTick> {
    if labels.is_empty() {
        return Vec::new();
    }
    let capacity = if plot_width.is_finite() && plot_width > 0.0 {
        (plot_width / MIN_CATEGORY_LABEL_SPACING_PX).floor().max(1.0) as usize
    } else {
        1
    };
    let step = labels.len().div_ceil(capacity).max(1);

    labels
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(index, label)| {
            let value = index as f64;
            AxisTick {
                value,
                pixel: x_scale.map(value),
                label: label.clone(),
            }
        })
        .collect()
}

/// Month captions for buckets that open a new month.
#[must_use]
pub fn month_axis_ticks(buckets: &[Bucket], x_scale: &LinearScale) -> Vec<AxisTick> {
    buckets
        .iter()
        .enumerate()
        .filter_map(|(index, bucket)| {
            let label = bucket.month_label.clone()?;
            let value = index as f64;
            Some(AxisTick {
                value,
                pixel: x_scale.map(value),
                label,
            })
        })
        .collect()
}

/// Appends the value axis: baseline, dashed grid lines and labels left of
/// the plot.
#[must_use]
pub fn append_value_axis(mut frame: RenderFrame, ticks: &[AxisTick], plot: PlotArea) -> RenderFrame {
    frame = frame.with_path(PathShape::stroked(
        polyline_path([(plot.left, plot.bottom), (plot.right, plot.bottom)]),
        AXIS_COLOR,
        1.0,
    ));
    for tick in ticks {
        frame = frame
            .with_path(
                PathShape::stroked(
                    polyline_path([(plot.left, tick.pixel), (plot.right, tick.pixel)]),
                    AXIS_COLOR.with_alpha(0.35),
                    1.0,
                )
                .with_dash(true),
            )
            .with_text(TextShape::new(
                tick.label.clone(),
                plot.left - 6.0,
                tick.pixel + AXIS_FONT_SIZE_PX / 3.0,
                AXIS_FONT_SIZE_PX,
                TEXT_COLOR,
                TextHAlign::Right,
            ));
    }
    frame
}

/// Appends category labels under the plot, with month captions one line
/// lower.
#[must_use]
pub fn append_category_axis(
    mut frame: RenderFrame,
    ticks: &[AxisTick],
    month_ticks: &[AxisTick],
    plot: PlotArea,
) -> RenderFrame {
    let label_y = plot.bottom + AXIS_FONT_SIZE_PX + 4.0;
    for tick in ticks {
        frame = frame.with_text(TextShape::new(
            tick.label.clone(),
            tick.pixel,
            label_y,
            AXIS_FONT_SIZE_PX,
            TEXT_COLOR,
            TextHAlign::Center,
        ));
    }
    for tick in month_ticks {
        frame = frame.with_text(TextShape::new(
            tick.label.clone(),
            tick.pixel,
            label_y + AXIS_FONT_SIZE_PX + 4.0,
            AXIS_FONT_SIZE_PX,
            TEXT_COLOR,
            TextHAlign::Center,
        ));
    }
    frame
}

/// Zig-zag across the compressed band of a broken value axis. Linear scales
/// leave the frame unchanged.
#[must_use]
pub fn append_break_marker(frame: RenderFrame, scale: &Scale, plot: PlotArea) -> RenderFrame {
    let Some((band_start, band_end)) = scale.break_band() else {
        return frame;
    };
    let center = (band_start + band_end) / 2.0;
    let half = ((band_end - band_start).abs() / 2.0).clamp(2.0, 6.0);
    let data = break_marker_path(plot.left - 8.0, plot.left + 8.0, center + half, center - half, 2);
    if data.is_empty() {
        return frame;
    }
    frame.with_path(PathShape::stroked(data, AXIS_COLOR, 1.5))
}
