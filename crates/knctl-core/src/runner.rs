use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

pub mod subprocess;

pub use subprocess::SubprocessRunner;

/// Captured result of a completed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// Receives streamed process output, e.g. a console view.
pub trait ConsoleSink: Send + Sync {
    fn print(&self, text: &str, stream: StreamKind);
}

/// Notified about the lifecycle of a streamed process.
pub trait ProcessListener: Send + Sync {
    fn started(&self, _pid: Option<u32>) {}

    /// `None` when the process was killed by a signal.
    fn terminated(&self, exit_code: Option<i32>);
}

/// A running streamed process.
pub trait ProcessHandle: std::fmt::Debug + Send {
    fn pid(&self) -> Option<u32>;

    /// Kills the process and its descendants; a no-op once all have exited.
    fn terminate(&mut self) -> io::Result<()>;

    /// Blocks until exit and returns the exit code.
    fn wait(&mut self) -> io::Result<Option<i32>>;
}

/// Executes external commands on behalf of [`crate::KnCli`].
pub trait ProcessRunner: std::fmt::Debug + Send + Sync {
    /// Runs to completion and captures output regardless of the exit code.
    fn execute_with_result(
        &self,
        command: &str,
        env: &HashMap<String, String>,
        args: &[String],
    ) -> io::Result<ExecResult>;

    /// Runs to completion and returns stdout, failing on a nonzero exit.
    fn execute(
        &self,
        command: &str,
        env: &HashMap<String, String>,
        args: &[String],
    ) -> io::Result<String> {
        let result = self.execute_with_result(command, env, args)?;
        if result.success() {
            return Ok(result.stdout);
        }
        let message = if result.stderr.trim().is_empty() {
            result.stdout.trim()
        } else {
            result.stderr.trim()
        };
        Err(io::Error::other(message.to_string()))
    }

    /// Spawns the command attached to `console` and returns immediately.
    fn execute_with_terminal(
        &self,
        work_dir: Option<&Path>,
        command: &str,
        env: &HashMap<String, String>,
        console: Arc<dyn ConsoleSink>,
        listener: Option<Arc<dyn ProcessListener>>,
        args: &[String],
    ) -> io::Result<Box<dyn ProcessHandle>>;
}
