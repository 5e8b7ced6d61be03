use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::primitives::date_wall_clock_seconds;
use crate::core::scale::Scale;

/// Timeline item in wall-clock seconds. `end: None` means ongoing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttItem {
    pub label: String,
    pub start: f64,
    pub end: Option<f64>,
}

impl GanttItem {
    #[must_use]
    pub fn new(label: impl Into<String>, start: f64, end: Option<f64>) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// Item spanning calendar dates, each taken at local midnight.
    #[must_use]
    pub fn from_dates(label: impl Into<String>, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self::new(
            label,
            date_wall_clock_seconds(start),
            end.map(date_wall_clock_seconds),
        )
    }
}

/// Visible time window of a timeline chart, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub start: f64,
    pub end: f64,
}

impl VisibleWindow {
    /// Window with ends in ascending order.
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    #[must_use]
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(date_wall_clock_seconds(start), date_wall_clock_seconds(end))
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }
}

/// Clips `[start, end]` to the window.
///
/// Returns `None` when either interval is invalid, when they do not
/// overlap, or when an interval of positive length only touches a window
/// edge. Zero-length intervals inside the window are kept.
#[must_use]
pub fn clip_interval(start: f64, end: f64, window: VisibleWindow) -> Option<(f64, f64)> {
    if !window.is_valid() || !start.is_finite() || !end.is_finite() || end < start {
        return None;
    }
    let clipped_start = start.max(window.start);
    let clipped_end = end.min(window.end);
    if clipped_start > clipped_end || (clipped_start == clipped_end && end > start) {
        return None;
    }
    Some((clipped_start, clipped_end))
}

/// Row geometry of a timeline chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GanttLayout {
    /// Y of the first row's top edge.
    pub top: f64,
    pub row_height: f64,
    pub bar_height: f64,
    /// Bars never render narrower than this.
    pub min_bar_width: f64,
}

impl Default for GanttLayout {
    fn default() -> Self {
        Self {
            top: 20.0,
            row_height: 28.0,
            bar_height: 18.0,
            min_bar_width: 2.0,
        }
    }
}

/// Horizontal bar for one visible timeline item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttBar {
    /// Position of the item in the input.
    pub item_index: usize,
    pub row: usize,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub clipped_start: f64,
    pub clipped_end: f64,
    /// No end date; the bar runs to "now" and gets an end marker.
    pub ongoing: bool,
    pub clipped_left: bool,
    pub clipped_right: bool,
}

impl GanttBar {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Lays out bars for the items that overlap the visible window.
///
/// Ongoing items are clipped to `now`. Items that are invalid or fall
/// entirely outside the window are omitted; remaining bars take consecutive
/// rows in input order.
#[must_use]
pub fn gantt_bars(
    items: &[GanttItem],
    window: VisibleWindow,
    now: f64,
    x_scale: &Scale,
    layout: GanttLayout,
) -> Vec<GanttBar> {
    let row_height = sanitize_length(layout.row_height);
    let bar_height = sanitize_length(layout.bar_height).min(row_height);
    let min_width = sanitize_length(layout.min_bar_width);
    let top = if layout.top.is_finite() { layout.top } else { 0.0 };
    let bar_offset = (row_height - bar_height) / 2.0;

    let mut bars = Vec::new();
    for (item_index, item) in items.iter().enumerate() {
        let ongoing = item.end.is_none();
        let end = item.end.unwrap_or(now);
        let Some((clipped_start, clipped_end)) = clip_interval(item.start, end, window) else {
            continue;
        };

        let x_start = x_scale.map(clipped_start);
        let x_end = x_scale.map(clipped_end);
        let x = x_start.min(x_end);
        let width = (x_end - x_start).abs().max(min_width);
        let row = bars.len();

        bars.push(GanttBar {
            item_index,
            row,
            label: item.label.clone(),
            x,
            y: top + row as f64 * row_height + bar_offset,
            width,
            height: bar_height,
            clipped_start,
            clipped_end,
            ongoing,
            clipped_left: item.start < window.start,
            clipped_right: end > window.end,
        });
    }
    bars
}

fn sanitize_length(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
