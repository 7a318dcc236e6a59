use std::sync::Arc;

use installer_core::{classify, ExitPolicy, OutputEvent, SessionState};
use installer_infra::{CommandSpec, InstallerProcess, ProcessLauncher};
use tracing::{debug, info, warn};

use crate::queue::SessionSender;

pub const PREPARING_STATUS: &str = "Preparing installation...";
pub const INITIAL_PROGRESS: &str = "Starting...";

/// Runs one installer process and reports everything it says through a
/// [`SessionSender`]. It never touches UI state directly.
pub struct InstallWorker<L> {
    launcher: Arc<L>,
    policy: ExitPolicy,
}

impl<L: ProcessLauncher> InstallWorker<L> {
    pub fn new(launcher: Arc<L>) -> Self {
        Self {
            launcher,
            policy: ExitPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ExitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Blocks until the installer has exited. Exactly one terminal event is
    /// posted, and it is always the last one.
    pub fn run(&self, command: &CommandSpec, out: &SessionSender) -> SessionState {
        let session_id = out.session_id();
        info!(%session_id, program = command.program(), "starting installer");

        out.post(OutputEvent::status(PREPARING_STATUS));
        out.post(OutputEvent::progress(0, INITIAL_PROGRESS));

        let mut process = match self.launcher.launch(command) {
            Ok(process) => process,
            Err(e) => {
                warn!(%session_id, "installer failed to start: {e}");
                out.post(OutputEvent::error(e.to_string()));
                out.post(OutputEvent::InstallFailed { exit_code: None });
                return SessionState::Failed;
            }
        };

        let mut line_count = 0usize;
        while let Some(next) = process.next_line() {
            let raw = match next {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(%session_id, "reading installer output failed: {e}");
                    out.post(OutputEvent::error(format!(
                        "Failed to read installer output: {e}"
                    )));
                    break;
                }
            };
            let Some(line) = clean_line(&raw) else {
                continue;
            };
            line_count += 1;
            debug!(line = line_count, "{line}");
            for event in classify(line) {
                out.post(event);
            }
        }

        let exit_code = match process.wait() {
            Ok(code) => code,
            Err(e) => {
                warn!(%session_id, "waiting for installer failed: {e}");
                out.post(OutputEvent::error(format!(
                    "Failed to wait for installation process: {e}"
                )));
                out.post(OutputEvent::InstallFailed { exit_code: None });
                return SessionState::Failed;
            }
        };
        info!(%session_id, exit_code, lines = line_count, "installer finished");

        for event in self.policy.closing_events(exit_code) {
            out.post(event);
        }
        self.policy.final_state(exit_code)
    }
}

/// Applies carriage-return overwrite semantics to one raw line: only the text
/// after the last `\r` survives, and a remainder that is empty or starts with
/// whitespace is a cursor artifact, so the line is dropped.
pub fn clean_line(raw: &str) -> Option<&str> {
    let Some(idx) = raw.rfind('\r') else {
        return Some(raw);
    };
    let tail = &raw[idx + 1..];
    if tail.is_empty() || tail.starts_with(char::is_whitespace) {
        None
    } else {
        Some(tail)
    }
}
