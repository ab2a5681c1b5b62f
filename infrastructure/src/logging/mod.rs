//! Execution-trace logging.
//!
//! Provides [`JsonlTraceLogger`], a JSONL file writer implementing the
//! [`TraceLogger`](switchyard_application::TraceLogger) port.

mod jsonl_trace;

pub use jsonl_trace::JsonlTraceLogger;
