pub mod controller;
pub mod progress;
pub mod session;
pub mod transcript;
pub mod viewmodel;

pub use controller::SessionController;
pub use progress::{apply_event, LogBuffer, ProgressState};
pub use session::{InstallSession, SessionError, StartOutcome};
pub use transcript::Transcript;
pub use viewmodel::{dialog_for, navigation_vm, progress_vm, DialogVm, NavigationVm, ProgressVm};

pub use installer_core::{OutputEvent, SessionState};
pub use installer_infra::{CommandSpec, ProcessLauncher, SystemLauncher};
pub use installer_pipeline::SessionId;
