use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::line_series::series_points;
use crate::core::scale::make_broken_scale_with_sink;
use crate::core::ticks::nice_domain_max;
use crate::core::{
    AggregateRow, BreakSpec, Bucket, LineGeometry, LinearScale, MetricSpec, PlotArea, Record,
    Scale, SeriesSet, bucket_index_scale, project_area, project_line, project_stacked_areas,
    stack_series,
};
use crate::interaction::{
    AlignedTooltip, TooltipDescriptor, describe_aligned_drawn_at, describe_vertex_at,
};
use crate::render::{
    AxisTick, HitRegion, HitTarget, PathShape, RenderFrame, append_break_marker,
    append_category_axis, append_value_axis, category_axis_ticks, month_axis_ticks,
    series_color, value_axis_ticks,
};

use super::ChartPipeline;

/// Pointer slop around a series vertex, in pixels.
const POINT_HIT_RADIUS_PX: f64 = 6.0;

/// How each series of a time-series chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeriesStyle {
    #[default]
    Line,
    /// Line plus fill down to the zero baseline.
    Area,
    /// Series stacked bottom-up in metric order.
    StackedArea,
}

/// What to draw on a time-series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRequest {
    pub metrics: Vec<MetricSpec>,
    #[serde(default)]
    pub style: SeriesStyle,
    /// Metric whose early dominance may break the value axis. Ignored for
    /// stacked charts.
    #[serde(default)]
    pub break_primary: Option<String>,
}

impl TimeSeriesRequest {
    #[must_use]
    pub fn new(metrics: Vec<MetricSpec>) -> Self {
        Self {
            metrics,
            style: SeriesStyle::Line,
            break_primary: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_break_primary(mut self, metric: impl Into<String>) -> Self {
        self.break_primary = Some(metric.into());
        self
    }
}

/// Rendered time-series chart plus the scales it was drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesChart {
    pub frame: RenderFrame,
    pub buckets: Vec<Bucket>,
    pub series: SeriesSet,
    pub x_scale: Scale,
    pub y_scale: Scale,
    /// One geometry per series, in metric order. Stacked charts hold the
    /// upper edge of each band.
    pub lines: Vec<LineGeometry>,
    pub value_ticks: Vec<AxisTick>,
    pub category_ticks: Vec<AxisTick>,
}

impl TimeSeriesChart {
    /// Tooltip for the nearest drawn vertex of `series_name`. Stacked charts
    /// report the raw layer value at the band's upper edge.
    #[must_use]
    pub fn describe_at(
        &self,
        pixel_x: f64,
        pixel_y: f64,
        series_name: &str,
        total: Option<f64>,
    ) -> Option<TooltipDescriptor> {
        let position = self
            .series
            .series()
            .iter()
            .position(|series| series.name == series_name)?;
        let series = &self.series.series()[position];
        let line = self.lines.get(position)?;
        describe_vertex_at(pixel_x, pixel_y, series, &line.vertices, total)
    }

    /// Every series at the bucket nearest to `pixel_x`.
    #[must_use]
    pub fn describe_aligned_at(&self, pixel_x: f64) -> Option<AlignedTooltip> {
        describe_aligned_drawn_at(pixel_x, &self.series, &self.x_scale, &self.lines)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<Tz: TimeZone> ChartPipeline<'_, Tz> {
    /// Buckets records and draws one series per requested metric.
    #[must_use]
    pub fn time_series(&self, records: &[Record], request: &TimeSeriesRequest) -> TimeSeriesChart {
        let (bucketed, set) = self.series_set(records, &request.metrics);
        self.build_time_series(bucketed.buckets().to_vec(), set, request)
    }

    /// Draws pre-aggregated `{label, metric...}` rows.
    #[must_use]
    pub fn time_series_from_rows(
        &self,
        rows: &[AggregateRow],
        request: &TimeSeriesRequest,
    ) -> TimeSeriesChart {
        let metrics: Vec<&str> = request
            .metrics
            .iter()
            .map(|metric| metric.name.as_str())
            .collect();
        let set = SeriesSet::from_rows(rows, &metrics);
        self.build_time_series(Vec::new(), set, request)
    }

    fn build_time_series(
        &self,
        buckets: Vec<Bucket>,
        set: SeriesSet,
        request: &TimeSeriesRequest,
    ) -> TimeSeriesChart {
        let config = self.config();
        let plot = self.plot_area();
        let x_linear = bucket_index_scale(set.labels().len(), plot.x_range());
        let x_scale = Scale::Linear(x_linear);

        let stacked = (request.style == SeriesStyle::StackedArea).then(|| {
            let layers: Vec<Vec<f64>> = set.series().iter().map(|series| series.values()).collect();
            stack_series(&layers)
        });
        let max_value = match &stacked {
            Some(bands) => bands
                .last()
                .map(|top| top.iter().map(|band| band.upper).fold(0.0, f64::max))
                .unwrap_or(0.0),
            None => set.max_value(),
        };
        let y_scale = self.value_scale(&set, request, max_value, plot);

        let mut frame = RenderFrame::new(config.viewport);
        if set.is_empty() {
            debug!("time series has no buckets, emitting empty frame");
            return TimeSeriesChart {
                frame,
                buckets,
                series: set,
                x_scale,
                y_scale,
                lines: Vec::new(),
                value_ticks: Vec::new(),
                category_ticks: Vec::new(),
            };
        }

        let value_format = config.value_format;
        let value_ticks = value_axis_ticks(&y_scale, |value| value_format.format(value));
        let category_ticks = category_axis_ticks(set.labels(), &x_linear, plot.width());
        let month_ticks = month_axis_ticks(&buckets, &x_linear);
        frame = append_value_axis(frame, &value_ticks, plot);
        frame = append_category_axis(frame, &category_ticks, &month_ticks, plot);
        frame = append_break_marker(frame, &y_scale, plot);

        let mut lines = Vec::with_capacity(set.series().len());
        match &stacked {
            Some(bands) => {
                for band in project_stacked_areas(bands, &x_scale, &y_scale) {
                    let color = series_color(band.layer);
                    frame = frame
                        .with_path(PathShape::filled(band.fill_path.clone(), color.with_alpha(0.35)))
                        .with_path(PathShape::stroked(
                            band.upper_path.clone(),
                            color,
                            config.line_width,
                        ));
                    lines.push(LineGeometry {
                        path: band.upper_path,
                        vertices: band.upper,
                    });
                }
            }
            None => {
                for (index, series) in set.series().iter().enumerate() {
                    let color = series_color(index);
                    let points = series_points(series);
                    let line = if request.style == SeriesStyle::Area {
                        let area = project_area(&points, &x_scale, &y_scale);
                        if !area.fill_path.is_empty() {
                            frame = frame.with_path(PathShape::filled(
                                area.fill_path,
                                color.with_alpha(0.2),
                            ));
                        }
                        LineGeometry {
                            vertices: area.line_points,
                            path: area.line_path,
                        }
                    } else {
                        project_line(&points, &x_scale, &y_scale)
                    };
                    if !line.path.is_empty() {
                        frame = frame.with_path(PathShape::stroked(
                            line.path.clone(),
                            color,
                            config.line_width,
                        ));
                    }
                    lines.push(line);
                }
            }
        }

        for (series_index, line) in lines.iter().enumerate() {
            for vertex in &line.vertices {
                frame = frame.with_hit_region(HitRegion::around(
                    HitTarget::SeriesPoint {
                        series: series_index,
                        index: vertex.index,
                    },
                    vertex.x,
                    vertex.y,
                    POINT_HIT_RADIUS_PX,
                ));
            }
        }

        debug!(
            series = set.series().len(),
            buckets = set.labels().len(),
            broken = y_scale.is_broken(),
            "time series frame built"
        );
        TimeSeriesChart {
            frame,
            buckets,
            series: set,
            x_scale,
            y_scale,
            lines,
            value_ticks,
            category_ticks,
        }
    }

    fn value_scale(
        &self,
        set: &SeriesSet,
        request: &TimeSeriesRequest,
        max_value: f64,
        plot: PlotArea,
    ) -> Scale {
        let domain = (0.0, nice_domain_max(0.0, max_value));
        let range = plot.y_range();

        let primary = request
            .break_primary
            .as_deref()
            .filter(|_| request.style != SeriesStyle::StackedArea)
            .and_then(|name| set.get(name));
        let Some(primary) = primary else {
            return Scale::Linear(LinearScale::with_sink(domain, range, self.sink()));
        };

        let primary_values = primary.values();
        let other_values: Vec<Vec<f64>> = set
            .series()
            .iter()
            .filter(|series| series.name != primary.name)
            .map(|series| series.values())
            .collect();
        let others: Vec<&[f64]> = other_values.iter().map(Vec::as_slice).collect();
        let spec = BreakSpec::new(&primary_values, &others).with_tuning(self.config().break_tuning);
        make_broken_scale_with_sink(domain, range, &spec, self.sink())
    }
}
