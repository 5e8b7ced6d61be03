use serde::{Deserialize, Serialize};

use crate::core::line_series::{PathVertex, project_vertices};
use crate::core::path::{polygon_path, polyline_path};
use crate::core::scale::Scale;
use crate::core::types::DataPoint;

/// Deterministic geometry for an area series.
///
/// `line_points` follows the mapped data points.
/// `fill_polygon` is an explicitly closed polygon against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaGeometry {
    pub line_points: Vec<PathVertex>,
    pub fill_polygon: Vec<(f64, f64)>,
    pub line_path: String,
    pub fill_path: String,
}

impl AreaGeometry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            line_points: Vec::new(),
            fill_polygon: Vec::new(),
            line_path: String::new(),
            fill_path: String::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_points.is_empty()
    }
}

/// Projects points into an area closed against the pixel of domain value `0`.
#[must_use]
pub fn project_area(points: &[DataPoint], x_scale: &Scale, y_scale: &Scale) -> AreaGeometry {
    let line_points = project_vertices(points, x_scale, y_scale);
    let (Some(first), Some(last)) = (line_points.first(), line_points.last()) else {
        return AreaGeometry::empty();
    };

    let baseline_y = y_scale.baseline();
    let mut fill_polygon = Vec::with_capacity(line_points.len() + 3);
    fill_polygon.push((first.x, baseline_y));
    fill_polygon.extend(line_points.iter().map(|vertex| (vertex.x, vertex.y)));
    fill_polygon.push((last.x, baseline_y));
    // Explicitly repeat the first baseline vertex so consumers can render this
    // as a closed polygon without adding implicit closure rules.
    fill_polygon.push((first.x, baseline_y));

    let line_path = polyline_path(line_points.iter().map(|vertex| (vertex.x, vertex.y)));
    let fill_path = polygon_path(fill_polygon[..fill_polygon.len() - 1].iter().copied());
    AreaGeometry {
        line_points,
        fill_polygon,
        line_path,
        fill_path,
    }
}

/// Lower and upper bound of one stacked layer at one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackBand {
    pub lower: f64,
    pub upper: f64,
}

/// Cumulative bands for stacked areas, first layer at the bottom.
///
/// Layers shorter than the longest one are padded with zero. Negative and
/// non-finite values contribute nothing.
#[must_use]
pub fn stack_series(layers: &[Vec<f64>]) -> Vec<Vec<StackBand>> {
    let width = layers.iter().map(Vec::len).max().unwrap_or(0);
    let mut running = vec![0.0; width];

    layers
        .iter()
        .map(|layer| {
            (0..width)
                .map(|index| {
                    let value = layer
                        .get(index)
                        .copied()
                        .filter(|value| value.is_finite() && *value > 0.0)
                        .unwrap_or(0.0);
                    let lower = running[index];
                    running[index] += value;
                    StackBand {
                        lower,
                        upper: running[index],
                    }
                })
                .collect()
        })
        .collect()
}

/// Filled band between two edges of a stacked layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandGeometry {
    pub layer: usize,
    pub upper: Vec<PathVertex>,
    pub lower: Vec<PathVertex>,
    /// Upper edge forward, lower edge backward, closed.
    pub fill_path: String,
    pub upper_path: String,
}

/// Projects stacked bands, using the bucket index as `x`.
#[must_use]
pub fn project_stacked_areas(
    stacked: &[Vec<StackBand>],
    x_scale: &Scale,
    y_scale: &Scale,
) -> Vec<BandGeometry> {
    stacked
        .iter()
        .enumerate()
        .filter(|(_, bands)| !bands.is_empty())
        .map(|(layer, bands)| {
            let upper: Vec<DataPoint> = bands
                .iter()
                .enumerate()
                .map(|(index, band)| DataPoint::new(index as f64, band.upper))
                .collect();
            let lower: Vec<DataPoint> = bands
                .iter()
                .enumerate()
                .map(|(index, band)| DataPoint::new(index as f64, band.lower))
                .collect();
            let upper = project_vertices(&upper, x_scale, y_scale);
            let lower = project_vertices(&lower, x_scale, y_scale);

            let outline = upper
                .iter()
                .chain(lower.iter().rev())
                .map(|vertex| (vertex.x, vertex.y));
            BandGeometry {
                layer,
                fill_path: polygon_path(outline),
                upper_path: polyline_path(upper.iter().map(|vertex| (vertex.x, vertex.y))),
                upper,
                lower,
            }
        })
        .collect()
}
