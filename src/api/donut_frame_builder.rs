use chrono::TimeZone;
use serde::Serialize;
use tracing::debug;

use crate::core::series::tag_value_counts;
use crate::core::{ArcSegment, Record, donut_arcs};
use crate::interaction::{TooltipDescriptor, ValueFormat, percent_of, slice_at};
use crate::render::{
    ArcShape, HitRegion, HitTarget, RenderFrame, TEXT_COLOR, TextHAlign, TextShape,
    series_color,
};

use super::ChartPipeline;

const SLICE_LABEL_FONT_SIZE_PX: f64 = 12.0;

/// Rendered donut with the slice geometry used for hit testing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub frame: RenderFrame,
    pub arcs: Vec<ArcSegment>,
    /// Sum of the drawn slice values.
    pub total: f64,
}

impl DonutChart {
    #[must_use]
    pub fn slice_at(&self, pixel_x: f64, pixel_y: f64) -> Option<&ArcSegment> {
        slice_at(pixel_x, pixel_y, &self.arcs)
    }

    /// Tooltip for the slice under the pointer, anchored at the slice's
    /// label position.
    #[must_use]
    pub fn describe_at(&self, pixel_x: f64, pixel_y: f64) -> Option<TooltipDescriptor> {
        let arc = self.slice_at(pixel_x, pixel_y)?;
        let (x, y) = slice_center(arc);
        Some(TooltipDescriptor {
            series: String::new(),
            index: arc.index,
            label: arc.label.clone(),
            value: arc.value,
            percent_of_total: percent_of(arc.value, self.total),
            x,
            y,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

fn slice_center(arc: &ArcSegment) -> (f64, f64) {
    let radius = (arc.inner_radius + arc.outer_radius) / 2.0;
    let angle = (arc.start_angle + arc.end_angle) / 2.0;
    (arc.cx + radius * angle.sin(), arc.cy - radius * angle.cos())
}

impl<Tz: TimeZone> ChartPipeline<'_, Tz> {
    /// Draws `(label, value)` slices clockwise from the configured start
    /// angle.
    #[must_use]
    pub fn donut<L: AsRef<str>>(&self, slices: &[(L, f64)]) -> DonutChart {
        let config = self.config();
        let arcs = donut_arcs(slices, config.donut_layout);
        let total = arcs.iter().map(|arc| arc.value).sum();

        let mut frame = RenderFrame::new(config.viewport);
        for arc in &arcs {
            frame = frame.with_arc(ArcShape {
                index: arc.index,
                data: arc.path.clone(),
                fill: series_color(arc.index),
                start_angle: arc.start_angle,
                end_angle: arc.end_angle,
            });
            if let Some((x, y)) = arc.label_anchor {
                frame = frame.with_text(TextShape::new(
                    ValueFormat::Percent.format(arc.share * 100.0),
                    x,
                    y + SLICE_LABEL_FONT_SIZE_PX / 3.0,
                    SLICE_LABEL_FONT_SIZE_PX,
                    TEXT_COLOR,
                    TextHAlign::Center,
                ));
            }
            let (x, y) = slice_center(arc);
            let half_thickness = ((arc.outer_radius - arc.inner_radius) / 2.0).max(1.0);
            frame = frame.with_hit_region(HitRegion::around(
                HitTarget::Slice { index: arc.index },
                x,
                y,
                half_thickness,
            ));
        }

        debug!(slices = arcs.len(), total, "donut frame built");
        DonutChart { frame, arcs, total }
    }

    /// Counts records per tag value within `category` and draws them as
    /// slices, largest first.
    #[must_use]
    pub fn donut_from_tags(&self, records: &[Record], tag_field: &str, category: &str) -> DonutChart {
        let counts = tag_value_counts(records, tag_field, category);
        self.donut(&counts)
    }
}
