use serde::{Deserialize, Serialize};

use crate::core::{
    BreakTuning, ChartMargins, DonutLayout, GanttLayout, Granularity, HistogramTuning, Viewport,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::ValueFormat;

/// Public pipeline configuration.
///
/// This type is serializable so host applications can persist and load chart
/// setup without inventing their own ad-hoc format. Every field has a
/// default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPipelineConfig {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub margins: ChartMargins,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,
    #[serde(default = "default_fill_gaps")]
    pub fill_gaps: bool,
    #[serde(default)]
    pub value_format: ValueFormat,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub break_tuning: BreakTuning,
    #[serde(default)]
    pub histogram_tuning: HistogramTuning,
    #[serde(default)]
    pub donut_layout: DonutLayout,
    #[serde(default)]
    pub gantt_layout: GanttLayout,
}

impl Default for ChartPipelineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            margins: ChartMargins::default(),
            granularity: Granularity::default(),
            timestamp_field: default_timestamp_field(),
            fill_gaps: default_fill_gaps(),
            value_format: ValueFormat::default(),
            line_width: default_line_width(),
            break_tuning: BreakTuning::default(),
            histogram_tuning: HistogramTuning::default(),
            donut_layout: DonutLayout::default(),
            gantt_layout: GanttLayout::default(),
        }
    }
}

impl ChartPipelineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: ChartMargins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Sets the record field read as the bucketing timestamp.
    #[must_use]
    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    #[must_use]
    pub fn with_gap_filling(mut self, fill_gaps: bool) -> Self {
        self.fill_gaps = fill_gaps;
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_break_tuning(mut self, tuning: BreakTuning) -> Self {
        self.break_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_histogram_tuning(mut self, tuning: HistogramTuning) -> Self {
        self.histogram_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_donut_layout(mut self, layout: DonutLayout) -> Self {
        self.donut_layout = layout;
        self
    }

    #[must_use]
    pub fn with_gantt_layout(mut self, layout: GanttLayout) -> Self {
        self.gantt_layout = layout;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidConfig(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        let margins = self.margins;
        if ![margins.top, margins.right, margins.bottom, margins.left]
            .iter()
            .all(|margin| margin.is_finite() && *margin >= 0.0)
        {
            return Err(ChartError::InvalidConfig(
                "margins must be finite and >= 0".to_owned(),
            ));
        }
        if self.timestamp_field.trim().is_empty() {
            return Err(ChartError::InvalidConfig(
                "timestamp field must not be empty".to_owned(),
            ));
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "line width must be finite and > 0".to_owned(),
            ));
        }
        self.break_tuning.validate()?;
        self.histogram_tuning.validate()?;
        validate_donut_layout(self.donut_layout)?;
        validate_gantt_layout(self.gantt_layout)
    }
}

fn validate_donut_layout(layout: DonutLayout) -> ChartResult<()> {
    let values = [
        layout.cx,
        layout.cy,
        layout.inner_radius,
        layout.outer_radius,
        layout.start_angle,
        layout.min_label_angle,
    ];
    if !values.iter().all(|value| value.is_finite()) {
        return Err(ChartError::InvalidConfig(
            "donut layout values must be finite".to_owned(),
        ));
    }
    if layout.outer_radius <= 0.0 || !(0.0..layout.outer_radius).contains(&layout.inner_radius) {
        return Err(ChartError::InvalidConfig(
            "donut radii must satisfy 0 <= inner < outer".to_owned(),
        ));
    }
    Ok(())
}

fn validate_gantt_layout(layout: GanttLayout) -> ChartResult<()> {
    if !layout.top.is_finite() {
        return Err(ChartError::InvalidConfig(
            "gantt top must be finite".to_owned(),
        ));
    }
    for (name, value) in [
        ("row height", layout.row_height),
        ("bar height", layout.bar_height),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "gantt {name} must be finite and > 0"
            )));
        }
    }
    if layout.bar_height > layout.row_height {
        return Err(ChartError::InvalidConfig(
            "gantt bar height must not exceed row height".to_owned(),
        ));
    }
    if !layout.min_bar_width.is_finite() || layout.min_bar_width < 0.0 {
        return Err(ChartError::InvalidConfig(
            "gantt minimum bar width must be finite and >= 0".to_owned(),
        ));
    }
    Ok(())
}

fn default_timestamp_field() -> String {
    "created_at".to_owned()
}

fn default_fill_gaps() -> bool {
    true
}

fn default_line_width() -> f64 {
    2.0
}
