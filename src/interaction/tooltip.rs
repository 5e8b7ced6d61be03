use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::core::{
    ArcSegment, GanttBar, LineGeometry, PathVertex, Scale, Series, SeriesPoint, SeriesSet,
};
use crate::interaction::format::{ValueFormat, percent_of};

/// Tooltip payload for the series point nearest to the pointer.
///
/// `label` and `value` are the pre-scale inputs; `x`/`y` are the pixel
/// position the point was drawn at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipDescriptor {
    pub series: String,
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub percent_of_total: Option<f64>,
    pub x: f64,
    pub y: f64,
}

impl TooltipDescriptor {
    /// `"{label}: {value}"`, with the share appended when known.
    #[must_use]
    pub fn text(&self, format: ValueFormat) -> String {
        let value = format.format(self.value);
        match self.percent_of_total {
            Some(percent) => format!(
                "{}: {value} ({})",
                self.label,
                ValueFormat::Percent.format(percent)
            ),
            None => format!("{}: {value}", self.label),
        }
    }
}

/// Finds the point whose pixel `x` is nearest to `pixel_x`.
///
/// Ties go to the point nearer in `y`, then to the earlier point. The same
/// scales used for drawing must be passed in, so the reported position is
/// the drawn one.
#[must_use]
pub fn describe_at(
    pixel_x: f64,
    pixel_y: f64,
    series: &Series,
    x_scale: &Scale,
    y_scale: &Scale,
    total: Option<f64>,
) -> Option<TooltipDescriptor> {
    let vertices: Vec<PathVertex> = series
        .points
        .iter()
        .enumerate()
        .map(|(position, point)| PathVertex {
            x: x_scale.map(point.index as f64),
            y: y_scale.map(point.value),
            index: position,
        })
        .collect();
    describe_vertex_at(pixel_x, pixel_y, series, &vertices, total)
}

/// Nearest-point lookup against vertices that were already drawn.
///
/// `vertices[i].index` is the position of the source point in `series`.
/// Stacked layers are drawn at their cumulative height, so the position
/// comes from the vertex while `value` stays the raw series value.
#[must_use]
pub fn describe_vertex_at(
    pixel_x: f64,
    pixel_y: f64,
    series: &Series,
    vertices: &[PathVertex],
    total: Option<f64>,
) -> Option<TooltipDescriptor> {
    if !pixel_x.is_finite() {
        return None;
    }
    let pixel_y = if pixel_y.is_finite() { pixel_y } else { 0.0 };

    let mut best: Option<(f64, f64, &PathVertex)> = None;
    for vertex in vertices {
        if series.points.get(vertex.index).is_none() {
            continue;
        }
        let dx = (vertex.x - pixel_x).abs();
        let dy = (vertex.y - pixel_y).abs();
        let closer = match best {
            None => true,
            Some((best_dx, best_dy, _)) => dx < best_dx || (dx == best_dx && dy < best_dy),
        };
        if closer {
            best = Some((dx, dy, vertex));
        }
    }

    let (_, _, vertex) = best?;
    let point = series.points.get(vertex.index)?;
    Some(TooltipDescriptor {
        series: series.name.clone(),
        index: point.index,
        label: point.label.clone(),
        value: point.value,
        percent_of_total: total.and_then(|total| percent_of(point.value, total)),
        x: vertex.x,
        y: vertex.y,
    })
}

/// One series' value inside an [`AlignedTooltip`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipEntry {
    pub series: String,
    pub value: f64,
    pub y: f64,
}

/// Values of every series at one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTooltip {
    pub index: usize,
    pub label: String,
    pub x: f64,
    pub entries: Vec<TooltipEntry>,
}

/// Looks up the bucket nearest to `pixel_x` and reports every series at it.
#[must_use]
pub fn describe_aligned_at(
    pixel_x: f64,
    set: &SeriesSet,
    x_scale: &Scale,
    y_scale: &Scale,
) -> Option<AlignedTooltip> {
    describe_aligned_with(pixel_x, set, x_scale, |_, point| Some(y_scale.map(point.value)))
}

/// Like [`describe_aligned_at`], with each entry's `y` taken from the drawn
/// geometry. `lines` holds one geometry per series of `set`, in order.
#[must_use]
pub fn describe_aligned_drawn_at(
    pixel_x: f64,
    set: &SeriesSet,
    x_scale: &Scale,
    lines: &[LineGeometry],
) -> Option<AlignedTooltip> {
    describe_aligned_with(pixel_x, set, x_scale, |series_index, point| {
        lines
            .get(series_index)?
            .vertices
            .iter()
            .find(|vertex| vertex.index == point.index)
            .map(|vertex| vertex.y)
    })
}

fn describe_aligned_with(
    pixel_x: f64,
    set: &SeriesSet,
    x_scale: &Scale,
    y_of: impl Fn(usize, &SeriesPoint) -> Option<f64>,
) -> Option<AlignedTooltip> {
    if !pixel_x.is_finite() || set.is_empty() {
        return None;
    }
    let index = (0..set.labels().len())
        .map(|index| (index, (x_scale.map(index as f64) - pixel_x).abs()))
        .fold(None, |best: Option<(usize, f64)>, (index, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((index, distance)),
        })
        .map(|(index, _)| index)?;

    let entries = set
        .series()
        .iter()
        .enumerate()
        .filter_map(|(series_index, series)| {
            let point = series.points.get(index)?;
            Some(TooltipEntry {
                series: series.name.clone(),
                value: point.value,
                y: y_of(series_index, point)?,
            })
        })
        .collect();

    Some(AlignedTooltip {
        index,
        label: set.labels()[index].clone(),
        x: x_scale.map(index as f64),
        entries,
    })
}

/// Donut slice under the pointer, by angle and radius.
#[must_use]
pub fn slice_at(pixel_x: f64, pixel_y: f64, arcs: &[ArcSegment]) -> Option<&ArcSegment> {
    let first = arcs.first()?;
    let dx = pixel_x - first.cx;
    let dy = pixel_y - first.cy;
    let radius = dx.hypot(dy);
    if !radius.is_finite() || radius < first.inner_radius || radius > first.outer_radius {
        return None;
    }
    // Clockwise from 12 o'clock, matching the layout's `sin`/`-cos` placement.
    let angle = dx.atan2(-dy);
    arcs.iter().find(|arc| {
        let sweep = arc.sweep();
        sweep >= TAU || (angle - arc.start_angle).rem_euclid(TAU) < sweep
    })
}

/// Timeline bar under the pointer.
#[must_use]
pub fn bar_at(pixel_x: f64, pixel_y: f64, bars: &[GanttBar]) -> Option<&GanttBar> {
    bars.iter().find(|bar| bar.contains(pixel_x, pixel_y))
}
