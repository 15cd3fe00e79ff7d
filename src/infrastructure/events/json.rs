//! JSON Event Sink
//!
//! Outputs bridge events as NDJSON for CI/automation consumption.

use crate::domain::ports::{BridgeEvent, EventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// NDJSON shape of one event
pub fn to_json(event: &BridgeEvent) -> serde_json::Value {
    match event {
        BridgeEvent::Started { command, packages } => serde_json::json!({
            "event": "start",
            "command": command,
            "packages": packages,
        }),

        BridgeEvent::NativeInstalled { names } => serde_json::json!({
            "event": "native_installed",
            "names": names,
        }),

        BridgeEvent::Cloned { address, dir } => serde_json::json!({
            "event": "cloned",
            "address": address,
            "dir": dir.display().to_string(),
        }),

        BridgeEvent::Reused { address, dir } => serde_json::json!({
            "event": "reused",
            "address": address,
            "dir": dir.display().to_string(),
        }),

        BridgeEvent::CheckedOut {
            address,
            branch,
            version,
        } => serde_json::json!({
            "event": "checked_out",
            "address": address,
            "branch": branch,
            "version": version,
        }),

        BridgeEvent::Resolving {
            address,
            dependencies,
        } => serde_json::json!({
            "event": "resolving",
            "address": address,
            "dependencies": dependencies,
        }),

        BridgeEvent::Building { package } => serde_json::json!({
            "event": "building",
            "package": package,
        }),

        BridgeEvent::Installed {
            address,
            short_name,
        } => serde_json::json!({
            "event": "installed",
            "address": address,
            "short_name": short_name,
        }),

        BridgeEvent::Built { package, artifacts } => serde_json::json!({
            "event": "built",
            "package": package,
            "artifacts": artifacts
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        }),

        BridgeEvent::Generated { package, files } => serde_json::json!({
            "event": "generated",
            "package": package,
            "files": files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        }),

        BridgeEvent::Skipped { address, reason } => serde_json::json!({
            "event": "item_skipped",
            "address": address,
            "reason": reason,
        }),

        BridgeEvent::Removed { names } => serde_json::json!({
            "event": "removed",
            "names": names,
        }),

        BridgeEvent::UploadStarted { file, url, size } => serde_json::json!({
            "event": "upload_start",
            "file": file,
            "url": url,
            "size": size,
        }),

        BridgeEvent::UploadProgress { file, sent, total } => serde_json::json!({
            "event": "upload_progress",
            "file": file,
            "sent": sent,
            "total": total,
        }),

        BridgeEvent::Uploaded { file } => serde_json::json!({
            "event": "uploaded",
            "file": file,
        }),

        BridgeEvent::Completed { command } => serde_json::json!({
            "event": "complete",
            "command": command,
            "status": "success",
        }),
    }
}

impl EventSink for JsonEventSink {
    fn on_event(&self, event: BridgeEvent) {
        self.write_event(to_json(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn json_sink_writes_one_line_per_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(BridgeEvent::Started {
            command: "install".to_string(),
            packages: vec!["curl".to_string(), "github.com/o/tool@v1".to_string()],
        });
        sink.on_event(BridgeEvent::Completed {
            command: "install".to_string(),
        });

        let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"event\":\"start\""));
        assert!(lines[0].contains("\"github.com/o/tool@v1\""));
        assert!(lines[1].contains("\"status\":\"success\""));
    }

    #[test]
    fn paths_are_rendered_as_strings() {
        let value = to_json(&BridgeEvent::Built {
            package: "tool".to_string(),
            artifacts: vec![PathBuf::from("/cache/tool-1-1-any.pkg.tar.zst")],
        });
        assert_eq!(value["artifacts"][0], "/cache/tool-1-1-any.pkg.tar.zst");
        assert_eq!(value["event"], "built");
    }

    #[test]
    fn generated_lists_written_files() {
        let value = to_json(&BridgeEvent::Generated {
            package: "tool".to_string(),
            files: vec![PathBuf::from("/src/tool/PKGBUILD"), PathBuf::from("/src/tool/README.md")],
        });
        assert_eq!(value["event"], "generated");
        assert_eq!(value["files"][1], "/src/tool/README.md");
    }
}
