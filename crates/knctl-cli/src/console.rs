use std::io::Write;

use knctl_core::{ConsoleSink, ProcessListener, StreamKind};
use tracing::info;

/// Mirrors streamed process output onto the terminal.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl ConsoleSink for TerminalConsole {
    fn print(&self, text: &str, stream: StreamKind) {
        // Write errors are ignored.
        let _ = match stream {
            StreamKind::Stdout => std::io::stdout().lock().write_all(text.as_bytes()),
            StreamKind::Stderr => std::io::stderr().lock().write_all(text.as_bytes()),
        };
    }
}

/// Logs process start and exit.
#[derive(Debug)]
pub struct LogListener {
    pub operation: String,
}

impl ProcessListener for LogListener {
    fn started(&self, pid: Option<u32>) {
        info!(target: "knctl", "{} started (pid {:?})", self.operation, pid);
    }

    fn terminated(&self, exit_code: Option<i32>) {
        info!(target: "knctl", "{} finished with {:?}", self.operation, exit_code);
    }
}
