use chrono::{Local, TimeZone};
use tracing::debug;

use crate::core::{
    BucketedRecords, Bucketizer, MetricSpec, PlotArea, Record, SeriesSet,
};
use crate::error::ChartResult;
use crate::telemetry::{DiagnosticsSink, TracingSink};

use super::ChartPipelineConfig;

/// Maps raw records and pre-aggregated rows onto render frames.
///
/// A pipeline owns only configuration: every call is a pure transform of its
/// inputs, so identical inputs produce identical frames. Recoveries (dropped
/// records, substituted domains, activated broken scales) are reported to the
/// diagnostics sink instead of being raised.
pub struct ChartPipeline<'a, Tz: TimeZone = Local> {
    config: ChartPipelineConfig,
    tz: Tz,
    sink: &'a dyn DiagnosticsSink,
}

impl ChartPipeline<'static, Local> {
    /// Pipeline in the host's local time zone, logging through `tracing`.
    pub fn new(config: ChartPipelineConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tz: Local,
            sink: &TracingSink,
        })
    }
}

impl<'a, Tz: TimeZone> ChartPipeline<'a, Tz> {
    /// Same pipeline bucketing in another time zone.
    #[must_use]
    pub fn with_time_zone<Other: TimeZone>(self, tz: Other) -> ChartPipeline<'a, Other> {
        ChartPipeline {
            config: self.config,
            tz,
            sink: self.sink,
        }
    }

    /// Same pipeline reporting to `sink`.
    #[must_use]
    pub fn with_sink<'b>(self, sink: &'b dyn DiagnosticsSink) -> ChartPipeline<'b, Tz> {
        ChartPipeline {
            config: self.config,
            tz: self.tz,
            sink,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ChartPipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    pub(super) fn sink(&self) -> &'a dyn DiagnosticsSink {
        self.sink
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        PlotArea::resolve(self.config.viewport, self.config.margins)
    }

    #[must_use]
    pub fn bucketizer(&self) -> Bucketizer {
        Bucketizer::new(self.config.granularity, self.config.timestamp_field.clone())
            .with_gap_filling(self.config.fill_gaps)
    }

    /// Buckets records by the configured timestamp field and granularity.
    #[must_use]
    pub fn bucketize(&self, records: &[Record]) -> BucketedRecords {
        let bucketed = self.bucketizer().bucketize(records, &self.tz, self.sink);
        debug!(
            granularity = ?bucketed.granularity(),
            buckets = bucketed.len(),
            dropped = bucketed.dropped(),
            "records bucketed"
        );
        bucketed
    }

    /// Buckets records and aggregates one aligned series per metric.
    #[must_use]
    pub fn series_set(&self, records: &[Record], metrics: &[MetricSpec]) -> (BucketedRecords, SeriesSet) {
        let bucketed = self.bucketize(records);
        let set = SeriesSet::from_bucketed(&bucketed, records, metrics);
        (bucketed, set)
    }
}
