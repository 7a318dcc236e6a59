pub mod queue;
pub mod worker;

pub use queue::{
    update_queue, SessionId, SessionSender, SessionUpdate, UpdateReceiver, UpdateSender,
};
pub use worker::{clean_line, InstallWorker, INITIAL_PROGRESS, PREPARING_STATUS};

// Re-export the types callers need to drive a worker
pub use installer_core::{ExitPolicy, OutputEvent, SessionState};
pub use installer_infra::{CommandSpec, ProcessLauncher, SystemLauncher};
