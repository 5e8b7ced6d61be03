//! Per-chart mappers wiring bucket, series, scale and geometry into frames.

mod density_frame_builder;
mod donut_frame_builder;
mod json_contract;
mod pipeline;
mod pipeline_config;
mod time_series_frame_builder;
mod timeline_frame_builder;

pub use density_frame_builder::DensityChart;
pub use donut_frame_builder::DonutChart;
pub use json_contract::{ChartPipelineConfigJsonContractV1, PIPELINE_CONFIG_JSON_SCHEMA_V1};
pub use pipeline::ChartPipeline;
pub use pipeline_config::ChartPipelineConfig;
pub use time_series_frame_builder::{SeriesStyle, TimeSeriesChart, TimeSeriesRequest};
pub use timeline_frame_builder::TimelineChart;
