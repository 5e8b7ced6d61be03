//! SVG path-data emission.
//!
//! Coordinates are rounded to two decimals and printed without trailing
//! zeros, so identical geometry always produces byte-identical strings.

use std::fmt::Write as _;

/// Formats one coordinate. Non-finite input prints as `0`.
#[must_use]
pub fn format_coord(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Incremental builder for SVG path data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBuilder {
    data: String,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_command(&mut self, command: char) {
        if !self.data.is_empty() {
            self.data.push(' ');
        }
        self.data.push(command);
    }

    fn push_point(&mut self, x: f64, y: f64) {
        let _ = write!(self.data, " {},{}", format_coord(x), format_coord(y));
    }

    #[must_use]
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.push_command('M');
        self.push_point(x, y);
        self
    }

    #[must_use]
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.push_command('L');
        self.push_point(x, y);
        self
    }

    /// Elliptical arc with equal radii and no rotation.
    #[must_use]
    pub fn arc_to(mut self, radius: f64, large_arc: bool, clockwise: bool, x: f64, y: f64) -> Self {
        self.push_command('A');
        let _ = write!(
            self.data,
            " {r},{r} 0 {} {}",
            u8::from(large_arc),
            u8::from(clockwise),
            r = format_coord(radius)
        );
        self.push_point(x, y);
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.push_command('Z');
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn build(self) -> String {
        self.data
    }
}

/// `M x0,y0 L x1,y1 ...` through finite points. Empty input yields `""`.
#[must_use]
pub fn polyline_path(points: impl IntoIterator<Item = (f64, f64)>) -> String {
    let mut builder = PathBuilder::new();
    for (x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        builder = if builder.is_empty() {
            builder.move_to(x, y)
        } else {
            builder.line_to(x, y)
        };
    }
    builder.build()
}

/// Closed polygon through finite points. Fewer than two points yield `""`.
#[must_use]
pub fn polygon_path(points: impl IntoIterator<Item = (f64, f64)>) -> String {
    let finite: Vec<(f64, f64)> = points
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if finite.len() < 2 {
        return String::new();
    }
    let mut data = polyline_path(finite);
    data.push_str(" Z");
    data
}

/// Zig-zag across `[x_start, x_end]` marking an axis break.
///
/// The line alternates between `y_a` and `y_b`, starting at `y_a`, with
/// `teeth` full periods. Returns `""` for non-finite input or zero teeth.
#[must_use]
pub fn break_marker_path(x_start: f64, x_end: f64, y_a: f64, y_b: f64, teeth: usize) -> String {
    if teeth == 0 || ![x_start, x_end, y_a, y_b].iter().all(|value| value.is_finite()) {
        return String::new();
    }
    let steps = teeth * 2;
    let step = (x_end - x_start) / steps as f64;
    polyline_path((0..=steps).map(|index| {
        let y = if index % 2 == 0 { y_a } else { y_b };
        (x_start + step * index as f64, y)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_trimmed_and_rounded() {
        assert_eq!(format_coord(12.0), "12");
        assert_eq!(format_coord(12.346), "12.35");
        assert_eq!(format_coord(-0.001), "0");
        assert_eq!(format_coord(f64::NAN), "0");
    }

    #[test]
    fn polyline_skips_non_finite_points() {
        let data = polyline_path([(0.0, 10.0), (f64::NAN, 1.0), (5.5, 2.0)]);
        assert_eq!(data, "M 0,10 L 5.5,2");
        assert_eq!(polyline_path(Vec::<(f64, f64)>::new()), "");
    }

    #[test]
    fn arc_command_carries_flags() {
        let data = PathBuilder::new()
            .move_to(0.0, -10.0)
            .arc_to(10.0, true, true, 0.0, 10.0)
            .close()
            .build();
        assert_eq!(data, "M 0,-10 A 10,10 0 1 1 0,10 Z");
    }

    #[test]
    fn break_marker_alternates_between_edges() {
        let data = break_marker_path(0.0, 20.0, 100.0, 96.0, 2);
        assert_eq!(data, "M 0,100 L 5,96 L 10,100 L 15,96 L 20,100");
        assert_eq!(break_marker_path(0.0, 20.0, f64::NAN, 96.0, 2), "");
    }
}
