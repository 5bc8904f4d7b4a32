use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::runner::{ConsoleSink, ExecResult, ProcessHandle, ProcessListener, ProcessRunner, StreamKind};

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Runs commands as local child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

fn spawn_error(command: &str, err: io::Error) -> io::Error {
    io::Error::new(err.kind(), format!("failed to start '{command}': {err}"))
}

impl ProcessRunner for SubprocessRunner {
    fn execute_with_result(
        &self,
        command: &str,
        env: &HashMap<String, String>,
        args: &[String],
    ) -> io::Result<ExecResult> {
        debug!("exec {} {}", command, args.join(" "));
        let output = Command::new(command)
            .args(args)
            .envs(env)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(command, e))?;

        let result = ExecResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };
        if !result.success() {
            warn!("{} exited with status {}", command, output.status);
        }
        Ok(result)
    }

    fn execute_with_terminal(
        &self,
        work_dir: Option<&Path>,
        command: &str,
        env: &HashMap<String, String>,
        console: Arc<dyn ConsoleSink>,
        listener: Option<Arc<dyn ProcessListener>>,
        args: &[String],
    ) -> io::Result<Box<dyn ProcessHandle>> {
        debug!("stream {} {}", command, args.join(" "));
        let mut cmd = Command::new(command);
        cmd.args(args)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = work_dir {
            cmd.current_dir(dir);
        }
        // Own process group, so terminate() reaches every descendant.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd.spawn().map_err(|e| spawn_error(command, e))?;
        let pid = child.id();
        let mut pumps = Vec::new();
        if let Some(out) = child.stdout.take() {
            pumps.push(pump(out, StreamKind::Stdout, Arc::clone(&console)));
        }
        if let Some(err) = child.stderr.take() {
            pumps.push(pump(err, StreamKind::Stderr, Arc::clone(&console)));
        }

        if let Some(listener) = &listener {
            listener.started(Some(pid));
        }

        let child = Arc::new(Mutex::new(child));
        let exit = Arc::new((Mutex::new(None), Condvar::new()));
        watch(Arc::clone(&child), Arc::clone(&exit), pumps, listener);

        Ok(Box::new(SubprocessHandle { pid, child, exit }))
    }
}

/// Forwards one output stream to the console line by line.
fn pump<R: Read + Send + 'static>(
    stream: R,
    kind: StreamKind,
    console: Arc<dyn ConsoleSink>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => console.print(&String::from_utf8_lossy(&buf), kind),
                Err(e) => {
                    warn!("failed to read process output: {}", e);
                    break;
                }
            }
        }
    })
}

type ExitState = Arc<(Mutex<Option<Option<i32>>>, Condvar)>;

/// Records the exit code as soon as the child exits, then notifies.
fn watch(
    child: Arc<Mutex<Child>>,
    exit: ExitState,
    pumps: Vec<JoinHandle<()>>,
    listener: Option<Arc<dyn ProcessListener>>,
) {
    thread::spawn(move || {
        let code = loop {
            let status = match child.lock() {
                Ok(mut guard) => guard.try_wait(),
                Err(_) => break None,
            };
            match status {
                Ok(Some(status)) => break status.code(),
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    warn!("failed to poll process: {}", e);
                    break None;
                }
            }
        };
        drain(pumps);

        let (lock, cvar) = &*exit;
        if let Ok(mut state) = lock.lock() {
            *state = Some(code);
            cvar.notify_all();
        }
        if let Some(listener) = listener {
            listener.terminated(code);
        }
    });
}

/// Lets the pumps flush what the child wrote before exiting. Descendants
/// that still hold the pipes only delay this by `DRAIN_TIMEOUT`; their
/// pumps keep forwarding in the background.
fn drain(pumps: Vec<JoinHandle<()>>) {
    let deadline = Instant::now() + DRAIN_TIMEOUT;
    while !pumps.iter().all(JoinHandle::is_finished) && Instant::now() < deadline {
        thread::sleep(POLL_INTERVAL);
    }
    for pump in pumps.into_iter().filter(|p| p.is_finished()) {
        let _ = pump.join();
    }
}

#[cfg(unix)]
fn kill_group(pgid: u32) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let pgid = i32::try_from(pgid).map_err(|_| io::Error::other("process id out of range"))?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(io::Error::from(e)),
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: u32) -> io::Result<()> {
    Ok(())
}

#[derive(Debug)]
struct SubprocessHandle {
    pid: u32,
    child: Arc<Mutex<Child>>,
    exit: ExitState,
}

fn poisoned() -> io::Error {
    io::Error::other("process state lock poisoned")
}

impl ProcessHandle for SubprocessHandle {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn terminate(&mut self) -> io::Result<()> {
        let mut child = self.child.lock().map_err(|_| poisoned())?;
        let exited = child.try_wait()?.is_some();
        debug!("terminating process group {}", self.pid);
        kill_group(self.pid)?;
        if exited {
            return Ok(());
        }
        child.kill()
    }

    fn wait(&mut self) -> io::Result<Option<i32>> {
        let (lock, cvar) = &*self.exit;
        let mut state = lock.lock().map_err(|_| poisoned())?;
        while state.is_none() {
            state = cvar.wait(state).map_err(|_| poisoned())?;
        }
        Ok((*state).flatten())
    }
}
