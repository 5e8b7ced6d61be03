use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::core::path::PathBuilder;

/// Sweeps closer than this to a full turn are drawn as a closed ring.
const FULL_TURN_EPSILON: f64 = 1e-9;

/// Placement of a donut or pie chart.
///
/// Angles are radians measured clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonutLayout {
    pub cx: f64,
    pub cy: f64,
    /// `0` draws a pie.
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    /// Slices narrower than this carry no text label.
    pub min_label_angle: f64,
}

impl Default for DonutLayout {
    fn default() -> Self {
        Self {
            cx: 120.0,
            cy: 120.0,
            inner_radius: 60.0,
            outer_radius: 100.0,
            start_angle: 0.0,
            min_label_angle: 0.25,
        }
    }
}

impl DonutLayout {
    fn sanitized(self) -> Option<Self> {
        let values = [
            self.cx,
            self.cy,
            self.inner_radius,
            self.outer_radius,
            self.start_angle,
            self.min_label_angle,
        ];
        if !values.iter().all(|value| value.is_finite()) || self.outer_radius <= 0.0 {
            return None;
        }
        Some(Self {
            inner_radius: self.inner_radius.clamp(0.0, self.outer_radius),
            ..self
        })
    }

    /// Point at `radius` and `angle` around the center.
    #[must_use]
    pub fn point_at(self, radius: f64, angle: f64) -> (f64, f64) {
        (
            self.cx + radius * angle.sin(),
            self.cy - radius * angle.cos(),
        )
    }
}

/// One slice of a donut, with everything needed to draw and hit-test it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    /// Position of the slice in the input.
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub share: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Outer arc start.
    pub x1: f64,
    pub y1: f64,
    /// Outer arc end.
    pub x2: f64,
    pub y2: f64,
    pub large_arc: bool,
    pub path: String,
    /// Label position, absent when the slice is too narrow to label.
    pub label_anchor: Option<(f64, f64)>,
}

impl ArcSegment {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Lays slices around the ring in input order.
///
/// Non-finite and non-positive values are skipped but keep their input index
/// as back-reference. A zero total yields no slices.
#[must_use]
pub fn donut_arcs<L: AsRef<str>>(slices: &[(L, f64)], layout: DonutLayout) -> Vec<ArcSegment> {
    let Some(layout) = layout.sanitized() else {
        return Vec::new();
    };
    let total: f64 = slices
        .iter()
        .map(|(_, value)| *value)
        .filter(|value| value.is_finite() && *value > 0.0)
        .sum();
    if !(total > 0.0 && total.is_finite()) {
        return Vec::new();
    }

    let mut angle = layout.start_angle;
    let mut arcs = Vec::new();
    for (index, (label, value)) in slices.iter().enumerate() {
        if !value.is_finite() || *value <= 0.0 {
            continue;
        }
        let share = value / total;
        let sweep = share * TAU;
        let start_angle = angle;
        let end_angle = angle + sweep;
        angle = end_angle;

        let (x1, y1) = layout.point_at(layout.outer_radius, start_angle);
        let (x2, y2) = layout.point_at(layout.outer_radius, end_angle);
        let label_anchor = (sweep >= layout.min_label_angle).then(|| {
            layout.point_at(
                (layout.inner_radius + layout.outer_radius) / 2.0,
                start_angle + sweep / 2.0,
            )
        });

        arcs.push(ArcSegment {
            index,
            label: label.as_ref().to_owned(),
            value: *value,
            share,
            start_angle,
            end_angle,
            cx: layout.cx,
            cy: layout.cy,
            inner_radius: layout.inner_radius,
            outer_radius: layout.outer_radius,
            x1,
            y1,
            x2,
            y2,
            large_arc: sweep > PI,
            path: arc_path(layout, start_angle, end_angle),
            label_anchor,
        });
    }
    arcs
}

fn arc_path(layout: DonutLayout, start_angle: f64, end_angle: f64) -> String {
    let sweep = end_angle - start_angle;
    let outer = layout.outer_radius;
    let inner = layout.inner_radius;

    if sweep >= TAU - FULL_TURN_EPSILON {
        // Start and end coincide, so the ring is drawn as two half turns.
        let mid_angle = start_angle + PI;
        let (ox1, oy1) = layout.point_at(outer, start_angle);
        let (oxm, oym) = layout.point_at(outer, mid_angle);
        let mut builder = PathBuilder::new()
            .move_to(ox1, oy1)
            .arc_to(outer, false, true, oxm, oym)
            .arc_to(outer, false, true, ox1, oy1)
            .close();
        if inner > 0.0 {
            let (ix1, iy1) = layout.point_at(inner, start_angle);
            let (ixm, iym) = layout.point_at(inner, mid_angle);
            builder = builder
                .move_to(ix1, iy1)
                .arc_to(inner, false, false, ixm, iym)
                .arc_to(inner, false, false, ix1, iy1)
                .close();
        }
        return builder.build();
    }

    let large_arc = sweep > PI;
    let (ox1, oy1) = layout.point_at(outer, start_angle);
    let (ox2, oy2) = layout.point_at(outer, end_angle);
    let builder = if inner > 0.0 {
        let (ix1, iy1) = layout.point_at(inner, start_angle);
        let (ix2, iy2) = layout.point_at(inner, end_angle);
        PathBuilder::new()
            .move_to(ox1, oy1)
            .arc_to(outer, large_arc, true, ox2, oy2)
            .line_to(ix2, iy2)
            .arc_to(inner, large_arc, false, ix1, iy1)
    } else {
        PathBuilder::new()
            .move_to(layout.cx, layout.cy)
            .line_to(ox1, oy1)
            .arc_to(outer, large_arc, true, ox2, oy2)
    };
    builder.close().build()
}
