use serde::{Deserialize, Serialize};

use crate::core::path::polyline_path;
use crate::core::scale::{LinearScale, Scale};
use crate::core::series::Series;
use crate::core::types::DataPoint;

/// Vertex in pixel coordinates that remembers its source point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathVertex {
    pub x: f64,
    pub y: f64,
    /// Index of the originating point in the projected input.
    pub index: usize,
}

/// Polyline geometry for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    pub vertices: Vec<PathVertex>,
    pub path: String,
}

impl LineGeometry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            path: String::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// X scale placing bucket `i` at the center of the `i`-th of `count` equal
/// bands across `x_range`.
#[must_use]
pub fn bucket_index_scale(count: usize, x_range: (f64, f64)) -> LinearScale {
    let count = count.max(1) as f64;
    LinearScale::new((-0.5, count - 0.5), x_range)
}

/// Domain points of a series, using the bucket index as `x`.
#[must_use]
pub fn series_points(series: &Series) -> Vec<DataPoint> {
    series
        .points
        .iter()
        .map(|point| DataPoint::new(point.index as f64, point.value))
        .collect()
}

/// Maps points through both scales, dropping points with non-finite input.
#[must_use]
pub fn project_vertices(points: &[DataPoint], x_scale: &Scale, y_scale: &Scale) -> Vec<PathVertex> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| point.x.is_finite() && point.y.is_finite())
        .map(|(index, point)| PathVertex {
            x: x_scale.map(point.x),
            y: y_scale.map(point.y),
            index,
        })
        .collect()
}

/// Projects points into a polyline path.
///
/// The function is deterministic and side-effect free so both rendering and
/// hit-testing consume the exact same geometry.
#[must_use]
pub fn project_line(points: &[DataPoint], x_scale: &Scale, y_scale: &Scale) -> LineGeometry {
    let vertices = project_vertices(points, x_scale, y_scale);
    if vertices.is_empty() {
        return LineGeometry::empty();
    }
    let path = polyline_path(vertices.iter().map(|vertex| (vertex.x, vertex.y)));
    LineGeometry { vertices, path }
}
