#![cfg(unix)]

use std::sync::Arc;

use installer_pipeline::{
    update_queue, CommandSpec, InstallWorker, OutputEvent, SessionState, SystemLauncher,
};
use uuid::Uuid;

fn run_shell(script: &str) -> (SessionState, Vec<OutputEvent>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let (tx, mut rx) = update_queue();
    let worker = InstallWorker::new(Arc::new(SystemLauncher::new()));
    let command = CommandSpec::shell(script).unwrap();

    let handle = std::thread::spawn(move || worker.run(&command, &tx.for_session(Uuid::new_v4())));
    let state = handle.join().expect("worker thread");
    (state, rx.drain().into_iter().map(|u| u.event).collect())
}

#[test]
fn real_installer_output_is_classified() {
    let (state, events) = run_shell(
        "echo 'INFO:Partitioning /dev/sda'; \
         printf 'RSYNC_PROGRESS: 5%% 1.0MB/s 0:00:01\\rRSYNC_PROGRESS: 90%% 9.9MB/s 0:00:09\\n'; \
         echo 'PROGRESS:95:Installing GRUB'; \
         echo 'SUCCESS:'",
    );

    assert_eq!(state, SessionState::Succeeded);
    assert_eq!(
        &events[2..7],
        &[
            OutputEvent::status("Partitioning /dev/sda"),
            OutputEvent::replace_log("Copying files: 90% 9.9MB/s 0:00:09"),
            OutputEvent::status("Copying system files... 90% 9.9MB/s"),
            OutputEvent::progress(95, "Installing GRUB"),
            OutputEvent::progress(100, "Installation complete!"),
        ]
    );
    assert_eq!(events.last(), Some(&OutputEvent::InstallSucceeded { exit_code: 0 }));
}

#[test]
fn rsync_partial_transfer_code_is_success() {
    let (state, events) = run_shell("echo 'ERROR:some files vanished'; exit 24");
    assert_eq!(state, SessionState::Succeeded);
    assert!(events.contains(&OutputEvent::error("some files vanished")));
    assert_eq!(events.last(), Some(&OutputEvent::InstallSucceeded { exit_code: 24 }));
}

#[test]
fn stderr_failure_is_reported() {
    let (state, events) = run_shell("echo 'mkfs: device busy' 1>&2; exit 2");
    assert_eq!(state, SessionState::Failed);
    assert!(events.contains(&OutputEvent::log("mkfs: device busy")));
    assert_eq!(
        events.last(),
        Some(&OutputEvent::InstallFailed { exit_code: Some(2) })
    );
}
