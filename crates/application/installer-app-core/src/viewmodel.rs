use installer_core::{OutputEvent, SessionState};

use crate::progress::ProgressState;
use crate::session::InstallSession;

/// Read-only view for whoever owns the wizard buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationVm {
    pub back_enabled: bool,
    pub install_enabled: bool,
    pub finish_visible: bool,
    pub copy_log_enabled: bool,
}

pub fn navigation_vm(session: &InstallSession, progress: &ProgressState) -> NavigationVm {
    let idle = session.state() == SessionState::Idle;
    NavigationVm {
        back_enabled: idle,
        install_enabled: idle,
        finish_visible: progress.complete,
        copy_log_enabled: !progress.log.is_empty(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressVm {
    pub fraction: f32,
    pub bar_text: String,
    pub status: String,
    pub headline: &'static str,
    pub show_spinner: bool,
}

pub fn progress_vm(session: &InstallSession, progress: &ProgressState) -> ProgressVm {
    let bar_text = if progress.progress_message.is_empty() {
        format!("{}%", progress.percent)
    } else {
        format!("{}% {}", progress.percent, progress.progress_message)
    };
    let headline = match session.state() {
        SessionState::Idle => "Ready to install",
        SessionState::Running if progress.complete => "Finishing installation...",
        SessionState::Running => "Installation in progress...",
        SessionState::Succeeded => "Installation complete!",
        SessionState::Failed => "Installation failed",
    };
    ProgressVm {
        fraction: f32::from(progress.percent.min(100)) / 100.0,
        bar_text,
        status: progress.status.clone(),
        headline,
        show_spinner: session.state() == SessionState::Running,
    }
}

/// A modal the UI raises in response to an applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogVm {
    Error(String),
    Finished,
}

/// Every failure path posts an [`OutputEvent::ErrorNotice`] before its
/// terminal event, so the notice alone carries the message to show.
pub fn dialog_for(ev: &OutputEvent) -> Option<DialogVm> {
    match ev {
        OutputEvent::ErrorNotice { message } => Some(DialogVm::Error(message.clone())),
        OutputEvent::MarkComplete => Some(DialogVm::Finished),
        _ => None,
    }
}
