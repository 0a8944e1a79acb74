//! Ingestion event sink trait and implementations.

use std::sync::{Arc, Mutex};

use log::{error, info, warn};

use super::{EventSeverity, IngestionEvent};

/// Trait for receiving ingestion events.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no DB writes)
/// - Failure to emit must not affect ingestion (best-effort)
pub trait IngestionEventSink: Send + Sync {
    /// Emit a single ingestion event.
    fn emit(&self, event: IngestionEvent);

    /// Emit multiple ingestion events.
    ///
    /// Default implementation calls `emit()` for each event.
    fn emit_batch(&self, events: Vec<IngestionEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// No-op implementation for contexts that only need the returned report.
#[derive(Clone, Default)]
pub struct NoOpIngestionEventSink;

impl IngestionEventSink for NoOpIngestionEventSink {
    fn emit(&self, _event: IngestionEvent) {}
}

/// Forwards events to the `log` facade at a level matching their severity.
#[derive(Clone, Default)]
pub struct LogIngestionEventSink;

impl IngestionEventSink for LogIngestionEventSink {
    fn emit(&self, event: IngestionEvent) {
        match event.severity {
            EventSeverity::Info => info!("{}", event),
            EventSeverity::Warning => warn!("{}", event),
            EventSeverity::Error | EventSeverity::Abort => error!("{}", event),
        }
    }
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockIngestionEventSink {
    events: Arc<Mutex<Vec<IngestionEvent>>>,
}

impl MockIngestionEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<IngestionEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Returns collected events of one severity.
    pub fn with_severity(&self, severity: EventSeverity) -> Vec<IngestionEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity == severity)
            .collect()
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IngestionEventSink for MockIngestionEventSink {
    fn emit(&self, event: IngestionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_and_log_sinks_do_not_panic() {
        NoOpIngestionEventSink.emit(IngestionEvent::warning("ignored"));
        LogIngestionEventSink.emit_batch(vec![
            IngestionEvent::warning("section not found").at("Sheet1", Some(4)),
            IngestionEvent::error("no as-on date"),
        ]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockIngestionEventSink::new();
        assert!(sink.is_empty());

        sink.emit(IngestionEvent::warning("a"));
        sink.emit_batch(vec![IngestionEvent::error("b"), IngestionEvent::warning("c")]);

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.with_severity(EventSeverity::Warning).len(), 2);
        assert_eq!(sink.events()[1].message, "b");
    }

    #[test]
    fn test_event_display_uses_one_based_rows() {
        let event = IngestionEvent::warning("Section 'X' not found").at("Equity", Some(0));
        assert_eq!(event.to_string(), "[Equity:1] Section 'X' not found");
    }
}
