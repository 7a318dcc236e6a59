use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use installer_app_core::{OutputEvent, ProcessLauncher, SessionController};
use installer_infra::{CommandSpec, InstallerProcess, ProcessError};

/// Serves lines fed by the test through a channel; the process "exits" when
/// the test drops the feeding side.
pub struct FedLauncher {
    feeds: Mutex<Vec<mpsc::Receiver<String>>>,
    exit_code: i32,
    pub launches: Arc<AtomicUsize>,
}

impl FedLauncher {
    /// One feed per expected launch, consumed in order.
    pub fn new(exit_code: i32, attempts: usize) -> (Self, Vec<mpsc::Sender<String>>) {
        // Reversed so that `pop` hands out the first attempt's feed first.
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..attempts).map(|_| mpsc::channel()).rev().unzip();
        (
            Self {
                feeds: Mutex::new(receivers),
                exit_code,
                launches: Arc::new(AtomicUsize::new(0)),
            },
            senders,
        )
    }
}

pub struct FedProcess {
    lines: mpsc::Receiver<String>,
    exit_code: i32,
}

impl InstallerProcess for FedProcess {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.lines.recv().ok().map(Ok)
    }

    fn wait(&mut self) -> io::Result<i32> {
        Ok(self.exit_code)
    }
}

impl ProcessLauncher for FedLauncher {
    type Process = FedProcess;

    fn launch(&self, command: &CommandSpec) -> Result<FedProcess, ProcessError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let lines = self.feeds.lock().unwrap().pop().ok_or_else(|| ProcessError::Spawn {
            program: command.program().to_string(),
            source: io::Error::other("no feed left"),
        })?;
        Ok(FedProcess {
            lines,
            exit_code: self.exit_code,
        })
    }
}

/// Launches processes whose output reader panics on first use.
pub struct PanickingLauncher;

pub struct PanickingProcess;

impl InstallerProcess for PanickingProcess {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        panic!("output reader failed");
    }

    fn wait(&mut self) -> io::Result<i32> {
        Ok(0)
    }
}

impl ProcessLauncher for PanickingLauncher {
    type Process = PanickingProcess;

    fn launch(&self, _command: &CommandSpec) -> Result<PanickingProcess, ProcessError> {
        Ok(PanickingProcess)
    }
}

pub fn drain_until_terminal<L: ProcessLauncher>(
    controller: &mut SessionController<L>,
) -> Vec<OutputEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        events.extend(controller.drain());
        if controller.session().state().is_terminal() {
            return events;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("session did not terminate; saw {events:?}");
}

pub fn drain_until<L: ProcessLauncher>(
    controller: &mut SessionController<L>,
    mut done: impl FnMut(&SessionController<L>) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        controller.drain();
        if done(controller) {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not reached");
}
