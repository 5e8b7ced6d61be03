use chrono::TimeZone;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::core::series::samples_by_tag;
use crate::core::ticks::nice_domain_max;
use crate::core::{
    DataPoint, DensitySet, FieldReader, LineGeometry, LinearScale, Record, Scale,
    density_by_category, project_area,
};
use crate::interaction::ValueFormat;
use crate::render::{
    AxisTick, HitRegion, HitTarget, PathShape, RenderFrame, append_category_axis,
    append_value_axis, series_color, value_axis_ticks,
};

use super::ChartPipeline;

const CURVE_HIT_RADIUS_PX: f64 = 8.0;

/// Rendered density curves, one per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityChart {
    pub frame: RenderFrame,
    pub density: DensitySet,
    pub x_scale: Scale,
    pub y_scale: Scale,
    pub lines: Vec<LineGeometry>,
    pub value_ticks: Vec<AxisTick>,
}

impl DensityChart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }
}

impl<Tz: TimeZone> ChartPipeline<'_, Tz> {
    /// Groups `value_field` samples by the tag value each record carries in
    /// `category` and draws one smoothed distribution per group.
    #[must_use]
    pub fn density(
        &self,
        records: &[Record],
        tag_field: &str,
        category: &str,
        value_field: &str,
        reader: FieldReader,
    ) -> DensityChart {
        let groups = samples_by_tag(records, tag_field, category, value_field, reader);
        self.density_from_groups(&groups)
    }

    /// Draws one smoothed distribution per pre-grouped sample list.
    #[must_use]
    pub fn density_from_groups(&self, groups: &IndexMap<String, Vec<f64>>) -> DensityChart {
        let config = self.config();
        let plot = self.plot_area();
        let density = density_by_category(groups, config.histogram_tuning);

        let x_linear = LinearScale::with_sink((0.0, density.domain_max), plot.x_range(), self.sink());
        let x_scale = Scale::Linear(x_linear);
        let y_scale = Scale::Linear(LinearScale::with_sink(
            (0.0, nice_domain_max(0.0, density.peak())),
            plot.y_range(),
            self.sink(),
        ));

        let mut frame = RenderFrame::new(config.viewport);
        if density.is_empty() {
            debug!("density has no categories, emitting empty frame");
            return DensityChart {
                frame,
                density,
                x_scale,
                y_scale,
                lines: Vec::new(),
                value_ticks: Vec::new(),
            };
        }

        let value_ticks = value_axis_ticks(&y_scale, |value| ValueFormat::Decimal(1).format(value));
        let x_ticks = value_axis_ticks(&x_scale, |value| ValueFormat::Minutes.format(value));
        frame = append_value_axis(frame, &value_ticks, plot);
        frame = append_category_axis(frame, &x_ticks, &[], plot);

        let mut lines = Vec::with_capacity(density.curves.len());
        for (category, curve) in density.curves.iter().enumerate() {
            let color = series_color(category);
            let points: Vec<DataPoint> = curve
                .smoothed
                .iter()
                .enumerate()
                .map(|(index, value)| DataPoint::new(curve.bin_center(index, density.domain_max), *value))
                .collect();
            let area = project_area(&points, &x_scale, &y_scale);
            if !area.fill_path.is_empty() {
                frame = frame.with_path(PathShape::filled(area.fill_path, color.with_alpha(0.15)));
            }
            if !area.line_path.is_empty() {
                frame = frame.with_path(PathShape::stroked(
                    area.line_path.clone(),
                    color,
                    config.line_width,
                ));
            }
            let peak = area
                .line_points
                .iter()
                .min_by(|left, right| left.y.total_cmp(&right.y));
            if let Some(peak) = peak {
                frame = frame.with_hit_region(HitRegion::around(
                    HitTarget::Curve { category },
                    peak.x,
                    peak.y,
                    CURVE_HIT_RADIUS_PX,
                ));
            }
            lines.push(LineGeometry {
                vertices: area.line_points,
                path: area.line_path,
            });
        }

        debug!(
            categories = density.curves.len(),
            domain_max = density.domain_max,
            "density frame built"
        );
        DensityChart {
            frame,
            density,
            x_scale,
            y_scale,
            lines,
            value_ticks,
        }
    }
}
