use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// `#rrggbb`, ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Series colors assigned in order, wrapping around.
pub const SERIES_PALETTE: [Color; 8] = [
    Color::rgb(0.231, 0.510, 0.965),
    Color::rgb(0.937, 0.267, 0.267),
    Color::rgb(0.063, 0.725, 0.506),
    Color::rgb(0.961, 0.620, 0.043),
    Color::rgb(0.545, 0.361, 0.965),
    Color::rgb(0.925, 0.282, 0.600),
    Color::rgb(0.078, 0.722, 0.651),
    Color::rgb(0.392, 0.455, 0.545),
];

pub const AXIS_COLOR: Color = Color::rgb(0.612, 0.639, 0.686);
pub const TEXT_COLOR: Color = Color::rgb(0.216, 0.255, 0.318);

#[must_use]
pub fn series_color(index: usize) -> Color {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

fn validate_stroke_width(width: f64) -> ChartResult<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(ChartError::InvalidData(
            "stroke width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

/// Stroked and/or filled SVG path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub data: String,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub fill: Option<Color>,
    pub dashed: bool,
}

impl PathShape {
    #[must_use]
    pub fn stroked(data: impl Into<String>, color: Color, stroke_width: f64) -> Self {
        Self {
            data: data.into(),
            stroke: Some(color),
            stroke_width,
            fill: None,
            dashed: false,
        }
    }

    #[must_use]
    pub fn filled(data: impl Into<String>, color: Color) -> Self {
        Self {
            data: data.into(),
            stroke: None,
            stroke_width: 1.0,
            fill: Some(color),
            dashed: false,
        }
    }

    #[must_use]
    pub fn with_dash(mut self, dashed: bool) -> Self {
        self.dashed = dashed;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.data.is_empty() {
            return Err(ChartError::InvalidData(
                "path shape must carry path data".to_owned(),
            ));
        }
        if self.stroke.is_none() && self.fill.is_none() {
            return Err(ChartError::InvalidData(
                "path shape needs a stroke or a fill".to_owned(),
            ));
        }
        validate_stroke_width(self.stroke_width)?;
        self.stroke.map_or(Ok(()), Color::validate)?;
        self.fill.map_or(Ok(()), Color::validate)
    }
}

/// One donut slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcShape {
    /// Index of the slice in the donut input.
    pub index: usize,
    pub data: String,
    pub fill: Color,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcShape {
    pub fn validate(&self) -> ChartResult<()> {
        if self.data.is_empty() {
            return Err(ChartError::InvalidData(
                "arc shape must carry path data".to_owned(),
            ));
        }
        if !self.start_angle.is_finite()
            || !self.end_angle.is_finite()
            || self.end_angle < self.start_angle
        {
            return Err(ChartError::InvalidData(
                "arc angles must be finite and ascending".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Axis-aligned rectangle, optionally with a marker on its right edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    /// Draws the end-of-bar marker used for ongoing items.
    pub end_marker: bool,
}

impl BarShape {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            end_marker: false,
        }
    }

    #[must_use]
    pub const fn with_end_marker(mut self, end_marker: bool) -> Self {
        self.end_marker = end_marker;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "bar coordinates must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "bar size must be >= 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextShape::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

impl TextHAlign {
    /// SVG `text-anchor` value.
    #[must_use]
    pub fn anchor(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextShape {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text shape must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// What a hit region points back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    /// Point `index` of series `series` in a time-series chart.
    SeriesPoint { series: usize, index: usize },
    /// Donut slice by input index.
    Slice { index: usize },
    /// Timeline bar by input item index.
    TimelineBar { item_index: usize },
    /// Density curve by category position.
    Curve { category: usize },
}

/// Bounding box of one interactive element, parallel to the drawn shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    pub target: HitTarget,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl HitRegion {
    #[must_use]
    pub const fn new(target: HitTarget, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            target,
            x,
            y,
            width,
            height,
        }
    }

    /// Square region of half-size `radius` around a point.
    #[must_use]
    pub fn around(target: HitTarget, x: f64, y: f64, radius: f64) -> Self {
        Self::new(target, x - radius, y - radius, radius * 2.0, radius * 2.0)
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn validate(self) -> ChartResult<()> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite())
            || self.width < 0.0
            || self.height < 0.0
        {
            return Err(ChartError::InvalidData(
                "hit region must be finite with non-negative size".to_owned(),
            ));
        }
        Ok(())
    }
}
