use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use camino::Utf8Path;
use installer_config::{LOG_CAPACITY, REDACTED_FLAGS};
use installer_core::{ExitPolicy, OutputEvent, SessionState};
use installer_infra::{CommandSpec, ProcessLauncher};
use installer_pipeline::{update_queue, InstallWorker, UpdateReceiver, UpdateSender};
use tracing::{debug, error, info, warn};

use crate::progress::{apply_event, ProgressState};
use crate::session::{InstallSession, SessionError, StartOutcome};
use crate::transcript::Transcript;
use crate::viewmodel::{navigation_vm, progress_vm, NavigationVm, ProgressVm};

/// Owns the current [`InstallSession`] and everything the UI context shows
/// for it. Only the thread that calls [`drain`](Self::drain) mutates it; the
/// worker talks to it through the update queue.
pub struct SessionController<L: ProcessLauncher> {
    launcher: Arc<L>,
    policy: ExitPolicy,
    tx: UpdateSender,
    rx: UpdateReceiver,
    busy: Arc<AtomicBool>,
    session: InstallSession,
    progress: ProgressState,
    log_capacity: usize,
    transcript: Option<Transcript>,
}

impl<L: ProcessLauncher> SessionController<L> {
    pub fn new(launcher: L, command: CommandSpec) -> Self {
        let (tx, rx) = update_queue();
        Self {
            launcher: Arc::new(launcher),
            policy: ExitPolicy::default(),
            tx,
            rx,
            busy: Arc::new(AtomicBool::new(false)),
            session: InstallSession::new(command),
            progress: ProgressState::with_log_capacity(LOG_CAPACITY),
            log_capacity: LOG_CAPACITY,
            transcript: None,
        }
    }

    pub fn with_policy(mut self, policy: ExitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity.max(1);
        self.progress = ProgressState::with_log_capacity(self.log_capacity);
        self
    }

    /// Mirrors the log to `path`. Failing to open the file only disables the
    /// mirror.
    pub fn with_transcript(mut self, path: impl AsRef<Utf8Path>) -> Self {
        let path = path.as_ref();
        match Transcript::open(path) {
            Ok(t) => self.transcript = Some(t),
            Err(e) => warn!(%path, "cannot open transcript file: {e}"),
        }
        self
    }

    pub fn session(&self) -> &InstallSession {
        &self.session
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn navigation(&self) -> NavigationVm {
        navigation_vm(&self.session, &self.progress)
    }

    pub fn progress_vm(&self) -> ProgressVm {
        progress_vm(&self.session, &self.progress)
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    /// The command as it may be shown to a user.
    pub fn display_command(&self) -> String {
        self.session.command().redacted(&REDACTED_FLAGS)
    }

    /// Replaces the current attempt with a fresh idle one. Refused only while
    /// a worker is alive; an attempt whose worker exited but was never drained
    /// is abandoned, and its queued events are discarded by
    /// [`drain`](Self::drain).
    pub fn prepare(&mut self, command: CommandSpec) -> Result<(), SessionError> {
        if self.busy.load(Ordering::SeqCst) {
            return Err(SessionError::AlreadyRunning);
        }
        if self.session.state() == SessionState::Running {
            debug!(session_id = %self.session.id(), "abandoning undrained attempt");
        }
        self.session = InstallSession::new(command);
        self.progress = ProgressState::with_log_capacity(self.log_capacity);
        debug!(session_id = %self.session.id(), "prepared new installation attempt");
        Ok(())
    }

    /// Starts the worker for the current attempt. The busy flag and the
    /// Running state are set before the thread exists, so a second call can
    /// never spawn a second worker.
    pub fn start(&mut self) -> anyhow::Result<StartOutcome> {
        match self.session.state() {
            SessionState::Running => return Ok(StartOutcome::AlreadyRunning),
            SessionState::Succeeded | SessionState::Failed => {
                return Ok(StartOutcome::AlreadyFinished)
            }
            SessionState::Idle => {}
        }
        if self.busy.swap(true, Ordering::SeqCst) {
            return Ok(StartOutcome::AlreadyRunning);
        }
        self.session.mark_running();

        let session_id = self.session.id();
        let shown = self.display_command();
        info!(%session_id, command = %shown, "starting installation");
        if let Some(t) = self.transcript.as_mut() {
            t.begin(session_id, &shown);
        }

        let worker =
            InstallWorker::new(Arc::clone(&self.launcher)).with_policy(self.policy.clone());
        let command = self.session.command().clone();
        let out = self.tx.for_session(session_id);
        let busy = Arc::clone(&self.busy);
        let spawned = std::thread::Builder::new()
            .name("installer-worker".into())
            .spawn(move || {
                match panic::catch_unwind(AssertUnwindSafe(|| worker.run(&command, &out))) {
                    Ok(state) => debug!(%session_id, ?state, "install worker exited"),
                    Err(_) => {
                        error!(%session_id, "install worker panicked");
                        out.post(OutputEvent::error("Installation worker stopped unexpectedly"));
                        out.post(OutputEvent::InstallFailed { exit_code: None });
                    }
                }
                busy.store(false, Ordering::SeqCst);
            })
            .context("Failed to spawn install worker thread");

        if let Err(e) = spawned {
            self.busy.store(false, Ordering::SeqCst);
            self.apply(OutputEvent::error(format!("{e:#}")));
            self.apply(OutputEvent::InstallFailed { exit_code: None });
            return Err(e);
        }
        Ok(StartOutcome::Started)
    }

    /// Applies every queued update for the current attempt, in order, and
    /// returns the applied events.
    pub fn drain(&mut self) -> Vec<OutputEvent> {
        let mut applied = Vec::new();
        while let Some(update) = self.rx.try_next() {
            if update.session_id != self.session.id() {
                debug!(stale = %update.session_id, "dropping update from an earlier attempt");
                continue;
            }
            if self.apply(update.event.clone()) {
                applied.push(update.event);
            }
        }
        applied
    }

    fn apply(&mut self, ev: OutputEvent) -> bool {
        if self.session.state().is_terminal() {
            warn!(?ev, "ignoring event after the session terminated");
            return false;
        }
        apply_event(&mut self.progress, &ev);
        if let Some(t) = self.transcript.as_mut() {
            t.record(&ev);
        }

        let finished = match ev {
            OutputEvent::InstallSucceeded { exit_code } => {
                Some((SessionState::Succeeded, Some(exit_code)))
            }
            OutputEvent::InstallFailed { exit_code } => Some((SessionState::Failed, exit_code)),
            _ => None,
        };
        if let Some((state, exit_code)) = finished {
            if self.session.finish(state, exit_code) {
                info!(session_id = %self.session.id(), ?state, ?exit_code, "installation finished");
                if let Some(t) = self.transcript.as_mut() {
                    t.end(state, exit_code);
                }
            }
        }
        true
    }
}
