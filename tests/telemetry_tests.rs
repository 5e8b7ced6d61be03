use ticket_chart::core::LinearScale;
use ticket_chart::telemetry::{
    CollectingSink, DiagnosticEvent, DiagnosticsSink, NoopSink, TracingSink, init_default_tracing,
};

#[test]
fn collecting_sink_keeps_events_in_order() {
    let sink = CollectingSink::new();
    assert!(sink.is_empty());

    sink.record(&DiagnosticEvent::NonFiniteClamped { context: "first" });
    sink.record(&DiagnosticEvent::NonFiniteClamped { context: "second" });
    assert_eq!(sink.len(), 2);
    assert_eq!(
        sink.events()[1],
        DiagnosticEvent::NonFiniteClamped { context: "second" }
    );

    sink.clear();
    assert!(sink.is_empty());
}

#[test]
fn tracing_and_noop_sinks_accept_every_event() {
    let events = [
        DiagnosticEvent::RecordsDropped {
            field: "created_at".to_owned(),
            dropped: 1,
            total: 2,
        },
        DiagnosticEvent::DegenerateDomain {
            requested: (1.0, 1.0),
            substituted: (0.0, 1.0),
        },
        DiagnosticEvent::NonFiniteClamped { context: "test" },
    ];
    for event in &events {
        TracingSink.record(event);
        NoopSink.record(event);
    }
}

#[test]
fn events_serialize_for_host_logs() {
    let event = DiagnosticEvent::RecordsDropped {
        field: "created_at".to_owned(),
        dropped: 3,
        total: 10,
    };
    let json = serde_json::to_string(&event).expect("serialize");
    assert_eq!(
        json,
        r#"{"RecordsDropped":{"field":"created_at","dropped":3,"total":10}}"#
    );
}

#[test]
fn noop_sink_silences_scale_fallbacks() {
    let scale = LinearScale::with_sink((5.0, 5.0), (0.0, 10.0), &NoopSink);
    assert_eq!(scale.domain(), (0.0, 1.0));
}

#[cfg(not(feature = "telemetry"))]
#[test]
fn default_tracing_is_a_no_op_without_the_feature() {
    assert!(!init_default_tracing());
}

#[cfg(feature = "telemetry")]
#[test]
fn default_tracing_installs_at_most_once() {
    let first = init_default_tracing();
    let second = init_default_tracing();
    assert!(!(first && second));
}
