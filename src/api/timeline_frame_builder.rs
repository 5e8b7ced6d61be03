use chrono::TimeZone;
use serde::Serialize;
use tracing::debug;

use crate::core::bucket::month_text;
use crate::core::primitives::{date_wall_clock_seconds, wall_clock_from_seconds};
use crate::core::path::polyline_path;
use crate::core::{
    BucketKey, GanttBar, GanttItem, Granularity, LinearScale, Scale, VisibleWindow, gantt_bars,
};
use crate::interaction::bar_at;
use crate::render::{
    AXIS_COLOR, AxisTick, BarShape, HitRegion, HitTarget, PathShape, RenderFrame, TEXT_COLOR,
    TextHAlign, TextShape, append_category_axis, series_color,
};

use super::ChartPipeline;

const ROW_LABEL_FONT_SIZE_PX: f64 = 11.0;
/// Month ticks beyond this many are not emitted for a single window.
const MAX_MONTH_TICKS: usize = 240;

/// Rendered timeline with the bars used for hit testing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineChart {
    pub frame: RenderFrame,
    pub bars: Vec<GanttBar>,
    pub window: VisibleWindow,
    pub x_scale: Scale,
    pub month_ticks: Vec<AxisTick>,
}

impl TimelineChart {
    #[must_use]
    pub fn bar_at(&self, pixel_x: f64, pixel_y: f64) -> Option<&GanttBar> {
        bar_at(pixel_x, pixel_y, &self.bars)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Ticks at the first day of every month inside the window.
fn month_ticks(window: VisibleWindow, x_scale: &LinearScale) -> Vec<AxisTick> {
    let Some(start) = wall_clock_from_seconds(window.start) else {
        return Vec::new();
    };
    let mut ticks = Vec::new();
    let mut cursor = Some(BucketKey::for_time(start, Granularity::Monthly));
    while let Some(key) = cursor {
        if ticks.len() >= MAX_MONTH_TICKS {
            break;
        }
        let value = date_wall_clock_seconds(key.first_day());
        if value > window.end {
            break;
        }
        if value >= window.start {
            if let BucketKey::Month { month, .. } = key {
                ticks.push(AxisTick {
                    value,
                    pixel: x_scale.map(value),
                    label: month_text(month),
                });
            }
        }
        cursor = key.next();
    }
    ticks
}

impl<Tz: TimeZone> ChartPipeline<'_, Tz> {
    /// Draws items clipped to `window`, one row per visible item.
    ///
    /// `now` (wall-clock seconds) closes ongoing items and places the "today"
    /// guide when it falls inside the window.
    #[must_use]
    pub fn timeline(&self, items: &[GanttItem], window: VisibleWindow, now: f64) -> TimelineChart {
        let config = self.config();
        let plot = self.plot_area();
        let x_linear = LinearScale::with_sink((window.start, window.end), plot.x_range(), self.sink());
        let x_scale = Scale::Linear(x_linear);
        let bars = gantt_bars(items, window, now, &x_scale, config.gantt_layout);

        let mut frame = RenderFrame::new(config.viewport);
        if bars.is_empty() {
            debug!(items = items.len(), "timeline has no visible bars, emitting empty frame");
            return TimelineChart {
                frame,
                bars,
                window,
                x_scale,
                month_ticks: Vec::new(),
            };
        }

        let ticks = month_ticks(window, &x_linear);
        frame = append_category_axis(frame, &ticks, &[], plot);

        if now.is_finite() && now >= window.start && now <= window.end {
            let x = x_scale.map(now);
            frame = frame.with_path(
                PathShape::stroked(polyline_path([(x, plot.top), (x, plot.bottom)]), AXIS_COLOR, 1.0)
                    .with_dash(true),
            );
        }

        for bar in &bars {
            let color = series_color(bar.row);
            frame = frame
                .with_bar(
                    BarShape::new(bar.x, bar.y, bar.width, bar.height, color.with_alpha(0.85))
                        .with_end_marker(bar.ongoing),
                )
                .with_hit_region(HitRegion::new(
                    HitTarget::TimelineBar {
                        item_index: bar.item_index,
                    },
                    bar.x,
                    bar.y,
                    bar.width,
                    bar.height,
                ));
            if !bar.label.is_empty() {
                frame = frame.with_text(TextShape::new(
                    bar.label.clone(),
                    plot.left - 6.0,
                    bar.y + bar.height * 0.7,
                    ROW_LABEL_FONT_SIZE_PX,
                    TEXT_COLOR,
                    TextHAlign::Right,
                ));
            }
        }

        debug!(
            items = items.len(),
            visible = bars.len(),
            ongoing = bars.iter().filter(|bar| bar.ongoing).count(),
            "timeline frame built"
        );
        TimelineChart {
            frame,
            bars,
            window,
            x_scale,
            month_ticks: ticks,
        }
    }
}
