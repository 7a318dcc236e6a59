mod support;

use installer_app_core::{CommandSpec, OutputEvent, SessionController, SessionState};
use support::{drain_until_terminal, FedLauncher};

#[test]
fn updates_from_an_abandoned_attempt_never_reach_the_next_one() {
    let (launcher, mut feeds) = FedLauncher::new(0, 2);
    let mut controller =
        SessionController::new(launcher, CommandSpec::shell("first").unwrap());

    controller.start().unwrap();
    let first = feeds.pop().unwrap();
    first.send("INFO:first attempt".into()).unwrap();
    drop(first);
    // The first worker exits while its updates are still queued; the attempt
    // is abandoned without ever being drained.
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while controller.prepare(CommandSpec::shell("second").unwrap()).is_err() {
        assert!(std::time::Instant::now() < deadline, "worker never went idle");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    controller.start().unwrap();
    let second = feeds.pop().unwrap();
    second.send("INFO:second attempt".into()).unwrap();
    drop(second);
    let events = drain_until_terminal(&mut controller);

    assert_eq!(controller.session().state(), SessionState::Succeeded);
    assert_eq!(controller.session().exit_code(), Some(0));
    assert!(!events.contains(&OutputEvent::status("first attempt")));
    assert_eq!(controller.progress().status, "second attempt");
    assert!(!controller.progress().log.lines().any(|l| l.contains("first")));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}
