use serde::{Deserialize, Serialize};

pub mod exit;
pub mod progress;
pub mod protocol;

pub use exit::ExitPolicy;
pub use progress::TransferProgress;
pub use protocol::{classify, parse_line, ControlLine};

/// One unit of work for the UI context, produced from installer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputEvent {
    LogLine { text: String },
    /// Overwrites the newest log line (carriage-return driven transfer output).
    LogLineReplace { text: String },
    ProgressUpdate { percent: u8, message: String },
    StatusUpdate { message: String },
    /// Reported by the installer itself; never ends the session on its own.
    ErrorNotice { message: String },
    /// The installer announced success; the subprocess may still be running.
    MarkComplete,
    /// Carries the accepted exit code, which may be a warning code.
    InstallSucceeded { exit_code: i32 },
    InstallFailed { exit_code: Option<i32> },
}

impl OutputEvent {
    pub fn log(text: impl Into<String>) -> Self {
        Self::LogLine { text: text.into() }
    }

    pub fn replace_log(text: impl Into<String>) -> Self {
        Self::LogLineReplace { text: text.into() }
    }

    pub fn progress(percent: u8, message: impl Into<String>) -> Self {
        Self::ProgressUpdate {
            percent,
            message: message.into(),
        }
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::StatusUpdate {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::ErrorNotice {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::InstallSucceeded { .. } | Self::InstallFailed { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
