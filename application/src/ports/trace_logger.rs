//! Port for structured execution-trace logging.
//!
//! Separate from `tracing`-based operation logs: tracing carries diagnostic
//! messages, while this port captures one machine-readable record per
//! dispatched request (JSONL in the default adapter).

use serde_json::Value;

/// A structured trace event.
pub struct TraceEvent {
    /// Event type identifier (e.g., "dispatch", "reload").
    pub event_type: &'static str,
    pub payload: Value,
}

impl TraceEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging trace events.
///
/// `log` is synchronous and infallible; write failures are the adapter's
/// problem and never reach the dispatch path.
pub trait TraceLogger: Send + Sync {
    fn log(&self, event: TraceEvent);
}

/// No-op implementation for tests and when trace logging is disabled.
pub struct NoTraceLogger;

impl TraceLogger for NoTraceLogger {
    fn log(&self, _event: TraceEvent) {}
}
