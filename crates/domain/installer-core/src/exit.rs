use installer_config::ACCEPTED_EXIT_CODES;

use crate::{OutputEvent, SessionState};

pub const SUCCESS_LOG_LINE: &str = "=== Installation completed successfully! ===";
pub const COMPLETE_MESSAGE: &str = "Installation complete!";

/// Decides how a finished installer process is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitPolicy {
    accepted: Vec<i32>,
}

impl Default for ExitPolicy {
    fn default() -> Self {
        Self::new(ACCEPTED_EXIT_CODES)
    }
}

impl ExitPolicy {
    pub fn new(accepted: impl IntoIterator<Item = i32>) -> Self {
        Self {
            accepted: accepted.into_iter().collect(),
        }
    }

    pub fn is_success(&self, exit_code: i32) -> bool {
        self.accepted.contains(&exit_code)
    }

    pub fn final_state(&self, exit_code: i32) -> SessionState {
        if self.is_success(exit_code) {
            SessionState::Succeeded
        } else {
            SessionState::Failed
        }
    }

    /// Events closing a session whose process exited with `exit_code`.
    /// The terminal event is always last.
    pub fn closing_events(&self, exit_code: i32) -> Vec<OutputEvent> {
        if self.is_success(exit_code) {
            vec![
                OutputEvent::log(SUCCESS_LOG_LINE),
                OutputEvent::progress(100, COMPLETE_MESSAGE),
                OutputEvent::InstallSucceeded { exit_code },
            ]
        } else {
            vec![
                OutputEvent::error(format!("Installation failed with exit code {exit_code}")),
                OutputEvent::InstallFailed {
                    exit_code: Some(exit_code),
                },
            ]
        }
    }
}
