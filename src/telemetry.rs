//! Telemetry helpers for applications embedding `ticket-chart-rs`.
//!
//! Tracing setup stays explicit and opt-in. Consumers can either call
//! `init_default_tracing` or wire their own `tracing` subscriber and filters.
//!
//! Pipeline diagnostics flow through a [`DiagnosticsSink`] handed to each
//! call. Nothing in the crate keeps a global snapshot of the data it saw.

use std::cell::RefCell;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::{Breakpoints, Granularity};

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Recoverable conditions observed while building chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiagnosticEvent {
    /// Records excluded because `field` did not parse to a timestamp.
    RecordsDropped {
        field: String,
        dropped: usize,
        total: usize,
    },
    /// A scale domain was replaced so pixel math stays finite.
    DegenerateDomain {
        requested: (f64, f64),
        substituted: (f64, f64),
    },
    BrokenScaleActivated {
        primary_peak: f64,
        others_peak: f64,
        breakpoints: Breakpoints,
    },
    /// A non-finite coordinate was replaced by the chart origin.
    NonFiniteClamped { context: &'static str },
    SeriesBucketed {
        granularity: Granularity,
        buckets: usize,
        records: usize,
    },
}

/// Receiver for pipeline diagnostics.
pub trait DiagnosticsSink {
    fn record(&self, event: &DiagnosticEvent);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: &DiagnosticEvent) {
        match event {
            DiagnosticEvent::RecordsDropped {
                field,
                dropped,
                total,
            } => debug!(field = %field, dropped, total, "dropped unparseable records"),
            DiagnosticEvent::DegenerateDomain {
                requested,
                substituted,
            } => warn!(
                requested_min = requested.0,
                requested_max = requested.1,
                substituted_min = substituted.0,
                substituted_max = substituted.1,
                "substituted degenerate scale domain"
            ),
            DiagnosticEvent::BrokenScaleActivated {
                primary_peak,
                others_peak,
                breakpoints,
            } => debug!(
                primary_peak,
                others_peak,
                lower = breakpoints.lower,
                upper = breakpoints.upper,
                "broken scale activated"
            ),
            DiagnosticEvent::NonFiniteClamped { context } => {
                trace!(context, "clamped non-finite coordinate");
            }
            DiagnosticEvent::SeriesBucketed {
                granularity,
                buckets,
                records,
            } => debug!(?granularity, buckets, records, "bucketed records"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn record(&self, _event: &DiagnosticEvent) {}
}

/// Keeps every event in memory for later inspection by the host.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: RefCell<Vec<DiagnosticEvent>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl DiagnosticsSink for CollectingSink {
    fn record(&self, event: &DiagnosticEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
