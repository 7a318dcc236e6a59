use std::io::{self, Read};
use std::process::{Child, ExitStatus, Stdio};
use std::thread;

use camino::Utf8PathBuf;
use installer_config::MAX_LINE_BYTES;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::command::CommandSpec;
use crate::lines::LineSplitter;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Installer command is empty")]
    EmptyCommand,
    #[error("Command parsing error")]
    ParseError,
    #[error("Failed to start installation process `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A running installer whose stdout and stderr arrive as one line stream.
pub trait InstallerProcess: Send {
    /// Next raw line without its `\n`, or `None` once every output stream
    /// has closed. Blocks until a line is available.
    fn next_line(&mut self) -> Option<io::Result<String>>;

    /// Waits for the process and returns its exit code.
    fn wait(&mut self) -> io::Result<i32>;
}

pub trait ProcessLauncher: Send + Sync + 'static {
    type Process: InstallerProcess + 'static;

    fn launch(&self, command: &CommandSpec) -> Result<Self::Process, ProcessError>;
}

/// Spawns real processes through `std::process`.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    max_line_bytes: usize,
    working_dir: Option<Utf8PathBuf>,
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemLauncher {
    pub fn new() -> Self {
        Self {
            max_line_bytes: MAX_LINE_BYTES,
            working_dir: None,
        }
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    pub fn with_working_dir(mut self, dir: Utf8PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }
}

impl ProcessLauncher for SystemLauncher {
    type Process = SystemProcess;

    fn launch(&self, command: &CommandSpec) -> Result<SystemProcess, ProcessError> {
        let mut cmd = command.to_command()?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            program: command.program().to_string(),
            source,
        })?;
        debug!(pid = child.id(), program = command.program(), "installer spawned");

        let (tx, rx) = mpsc::unbounded_channel();
        let pumps = (|| -> io::Result<()> {
            if let Some(stdout) = child.stdout.take() {
                spawn_pump(stdout, "stdout", tx.clone(), self.max_line_bytes)?;
            }
            if let Some(stderr) = child.stderr.take() {
                spawn_pump(stderr, "stderr", tx, self.max_line_bytes)?;
            }
            Ok(())
        })();
        if let Err(e) = pumps {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e.into());
        }

        Ok(SystemProcess { child, lines: rx })
    }
}

pub struct SystemProcess {
    child: Child,
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl InstallerProcess for SystemProcess {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.lines.blocking_recv()
    }

    fn wait(&mut self) -> io::Result<i32> {
        let status = self.child.wait()?;
        Ok(exit_code(status))
    }
}

/// Forwards one output stream into the shared line channel. Both streams feed
/// the same channel, so lines interleave in arrival order.
fn spawn_pump(
    stream: impl Read + Send + 'static,
    name: &'static str,
    tx: mpsc::UnboundedSender<io::Result<String>>,
    max_line_bytes: usize,
) -> io::Result<()> {
    thread::Builder::new()
        .name(format!("installer-{name}"))
        .spawn(move || pump(stream, name, &tx, max_line_bytes))?;
    Ok(())
}

/// Reads `stream` to its end. After the first read error is reported the rest
/// of the stream is still consumed and discarded, so the child never blocks on
/// a full pipe. A second error ends the pump.
fn pump(
    mut stream: impl Read,
    name: &'static str,
    tx: &mpsc::UnboundedSender<io::Result<String>>,
    max_line_bytes: usize,
) {
    let mut splitter = LineSplitter::new(max_line_bytes);
    let mut buffer = [0u8; 4096];
    let mut failed = false;
    loop {
        let n = match stream.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if failed => {
                debug!(stream = name, "giving up on installer output: {e}");
                return;
            }
            Err(e) => {
                warn!(stream = name, "reading installer output failed: {e}");
                let _ = tx.send(Err(e));
                failed = true;
                continue;
            }
        };
        if failed {
            continue;
        }
        for line in splitter.push(&buffer[..n]) {
            if tx.send(Ok(line)).is_err() {
                return;
            }
        }
    }
    if failed {
        return;
    }
    if let Some(line) = splitter.finish() {
        let _ = tx.send(Ok(line));
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
