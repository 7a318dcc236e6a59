use installer_core::SessionState;
use installer_infra::CommandSpec;
use installer_pipeline::SessionId;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("An installation is already running")]
    AlreadyRunning,
    #[error("This installation attempt has already finished; prepare a new one")]
    AlreadyFinished,
}

/// What a call to `start` did. Repeated starts are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    AlreadyFinished,
}

impl StartOutcome {
    /// For callers that start exactly once and treat anything else as a bug.
    pub fn into_result(self) -> Result<(), SessionError> {
        match self {
            StartOutcome::Started => Ok(()),
            StartOutcome::AlreadyRunning => Err(SessionError::AlreadyRunning),
            StartOutcome::AlreadyFinished => Err(SessionError::AlreadyFinished),
        }
    }
}

/// One attempt at running the installer. A finished attempt is never
/// restarted; a new one is created instead.
#[derive(Debug, Clone)]
pub struct InstallSession {
    id: SessionId,
    state: SessionState,
    command: CommandSpec,
    exit_code: Option<i32>,
}

impl InstallSession {
    pub fn new(command: CommandSpec) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            state: SessionState::Idle,
            command,
            exit_code: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    /// Set at termination; `None` only when the process never ran to exit.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub(crate) fn mark_running(&mut self) {
        self.state = SessionState::Running;
    }

    /// Returns false if the session had already terminated.
    pub(crate) fn finish(&mut self, state: SessionState, exit_code: Option<i32>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = state;
        self.exit_code = exit_code;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> InstallSession {
        InstallSession::new(CommandSpec::shell("true").unwrap())
    }

    #[test]
    fn new_sessions_are_idle_with_fresh_ids() {
        let a = session();
        let b = session();
        assert_eq!(a.state(), SessionState::Idle);
        assert_eq!(a.exit_code(), None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn terminal_transition_happens_once() {
        let mut s = session();
        s.mark_running();
        assert!(s.finish(SessionState::Failed, Some(1)));
        assert!(!s.finish(SessionState::Succeeded, None));
        assert_eq!(s.state(), SessionState::Failed);
        assert_eq!(s.exit_code(), Some(1));
    }

    #[test]
    fn start_outcome_maps_to_errors() {
        assert_eq!(StartOutcome::Started.into_result(), Ok(()));
        assert_eq!(
            StartOutcome::AlreadyFinished.into_result(),
            Err(SessionError::AlreadyFinished)
        );
    }
}
