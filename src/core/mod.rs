pub mod area_series;
pub mod broken_scale;
pub mod bucket;
pub mod donut;
pub mod duration;
pub mod gantt;
pub mod histogram;
pub mod line_series;
pub mod path;
pub mod primitives;
pub mod scale;
pub mod series;
pub mod ticks;
pub mod types;

pub use area_series::{AreaGeometry, BandGeometry, StackBand, project_area, project_stacked_areas, stack_series};
pub use broken_scale::{BreakDetection, BreakSpec, BreakTuning, Breakpoints, BrokenScale, ScaleSegment};
pub use bucket::{Bucket, BucketKey, BucketedRecords, Bucketizer, bucketize};
pub use donut::{ArcSegment, DonutLayout, donut_arcs};
pub use duration::{to_minutes, try_parse_minutes};
pub use gantt::{GanttBar, GanttItem, GanttLayout, VisibleWindow, clip_interval, gantt_bars};
pub use histogram::{DensityCurve, DensitySet, HistogramTuning, density_by_category, histogram, percentile, smooth};
pub use line_series::{LineGeometry, PathVertex, bucket_index_scale, project_line};
pub use primitives::parse_timestamp;
pub use scale::{LinearScale, Scale, make_broken_scale, make_linear_scale};
pub use series::{Aggregation, AggregateRow, FieldReader, MetricSpec, Series, SeriesPoint, SeriesSet, TagPath};
pub use types::{ChartMargins, DataPoint, FieldValue, Granularity, PlotArea, Record, Viewport};
