//! Worker to UI hand-off.
//!
//! The queue is unbounded so the worker never waits on the UI; a stalled
//! worker would stop draining the installer's pipe and could deadlock it.

use installer_core::OutputEvent;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type SessionId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub session_id: SessionId,
    pub event: OutputEvent,
}

pub fn update_queue() -> (UpdateSender, UpdateReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UpdateSender { tx }, UpdateReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::UnboundedSender<SessionUpdate>,
}

impl UpdateSender {
    pub fn for_session(&self, session_id: SessionId) -> SessionSender {
        SessionSender {
            session_id,
            tx: self.tx.clone(),
        }
    }
}

/// Posts events on behalf of a single session.
#[derive(Debug, Clone)]
pub struct SessionSender {
    session_id: SessionId,
    tx: mpsc::UnboundedSender<SessionUpdate>,
}

impl SessionSender {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns `false` once the receiving side is gone.
    pub fn post(&self, event: OutputEvent) -> bool {
        self.tx
            .send(SessionUpdate {
                session_id: self.session_id,
                event,
            })
            .is_ok()
    }
}

#[derive(Debug)]
pub struct UpdateReceiver {
    rx: mpsc::UnboundedReceiver<SessionUpdate>,
}

impl UpdateReceiver {
    pub fn try_next(&mut self) -> Option<SessionUpdate> {
        self.rx.try_recv().ok()
    }

    /// Removes everything queued right now, oldest first. Never blocks.
    pub fn drain(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// Blocks the current thread until an update arrives. Must not be called
    /// from inside an async runtime.
    pub fn blocking_next(&mut self) -> Option<SessionUpdate> {
        self.rx.blocking_recv()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_post_order() {
        let (tx, mut rx) = update_queue();
        let session = tx.for_session(Uuid::new_v4());
        for i in 0..1000 {
            assert!(session.post(OutputEvent::log(i.to_string())));
        }

        let drained = rx.drain();
        assert_eq!(drained.len(), 1000);
        for (i, update) in drained.iter().enumerate() {
            assert_eq!(update.event, OutputEvent::log(i.to_string()));
            assert_eq!(update.session_id, session.session_id());
        }
        assert!(rx.is_empty());
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn posting_after_receiver_drop_reports_failure() {
        let (tx, rx) = update_queue();
        let session = tx.for_session(Uuid::new_v4());
        drop(rx);
        assert!(!session.post(OutputEvent::InstallSucceeded { exit_code: 0 }));
    }

    #[test]
    fn blocking_next_waits_for_worker_and_ends_when_senders_drop() {
        let (tx, mut rx) = update_queue();
        let session = tx.for_session(Uuid::new_v4());
        drop(tx);
        let worker = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            session.post(OutputEvent::status("Formatting"));
        });

        let update = rx.blocking_next().expect("update from worker");
        assert_eq!(update.event, OutputEvent::status("Formatting"));
        worker.join().unwrap();
        assert_eq!(rx.blocking_next(), None);
    }

    #[test]
    fn producer_thread_is_never_blocked() {
        let (tx, mut rx) = update_queue();
        let session = tx.for_session(Uuid::new_v4());
        let producer = std::thread::spawn(move || {
            for i in 0..50_000 {
                session.post(OutputEvent::log(i.to_string()));
            }
        });
        producer.join().expect("producer finished without a consumer");
        assert_eq!(rx.drain().len(), 50_000);
    }
}
