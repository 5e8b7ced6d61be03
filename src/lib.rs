//! ticket-chart-rs: aggregation and geometry core for ticket dashboards.
//!
//! Records are bucketed by time, reduced into aligned series, mapped through
//! linear or broken scales and emitted as deterministic SVG-ready frames with
//! parallel hit-test metadata. Nothing here touches the network, the file
//! system or any global state.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartPipeline, ChartPipelineConfig};
pub use error::{ChartError, ChartResult};
