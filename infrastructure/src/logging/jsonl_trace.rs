//! JSONL execution-trace writer.
//!
//! One line per [`TraceEvent`]: the payload object with `type` and
//! `timestamp` merged in. The file is opened in append mode so traces from
//! successive runs accumulate.

use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use switchyard_application::{TraceEvent, TraceLogger};
use tracing::warn;

/// Thread-safe via `Mutex<BufWriter<File>>`; flushed after every record.
pub struct JsonlTraceLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTraceLogger {
    /// Open (or create) the trace file, creating parent directories.
    ///
    /// Returns `None` when the file cannot be opened; tracing is then skipped.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(dir = %parent.display(), error = %e, "Could not create trace log directory");
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open trace log file");
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: TraceEvent) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    match event.payload {
        Value::Object(mut map) => {
            map.insert("type".to_string(), Value::String(event.event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        }
        other => serde_json::json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl TraceLogger for JsonlTraceLogger {
    fn log(&self, event: TraceEvent) {
        let Ok(line) = serde_json::to_string(&record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTraceLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
