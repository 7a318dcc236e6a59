use std::time::Duration;

use crate::components::{actions, header, log_view, progress};
use crate::theme::*;
use eframe::egui;
use egui_taffy::taffy::prelude::{length, percent};
use egui_taffy::{taffy, tui, TuiBuilderLogic};
use installer_app_core::{
    dialog_for, DialogVm, SessionController, SessionState, StartOutcome, SystemLauncher,
};
use installer_config::DRAIN_INTERVAL_MS;

pub struct InstallerUiApp {
    controller: SessionController<SystemLauncher>,
    dialog: Option<DialogVm>,
}

impl InstallerUiApp {
    pub fn new(controller: SessionController<SystemLauncher>) -> Self {
        Self {
            controller,
            dialog: None,
        }
    }

    fn handle_updates(&mut self) -> bool {
        let events = self.controller.drain();
        if let Some(dialog) = events.iter().filter_map(dialog_for).last() {
            self.dialog = Some(dialog);
        }
        !events.is_empty()
    }

    fn start(&mut self) {
        match self.controller.start() {
            Ok(StartOutcome::Started) => {}
            Ok(outcome) => tracing::debug!(?outcome, "install already started"),
            Err(e) => {
                tracing::error!("Failed to start installation: {e:#}");
                self.dialog = Some(DialogVm::Error(format!("{e:#}")));
            }
        }
    }

    fn save_log(&self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("loc-installer.log")
            .save_file()
        else {
            return;
        };
        if let Err(e) = std::fs::write(&path, self.controller.progress().log.to_text()) {
            tracing::error!("Failed to save log to {}: {e}", path.display());
        }
    }

    fn draw_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        let (title, message, color) = match dialog {
            DialogVm::Error(message) => ("Installation Error", message.as_str(), COL_DANGER),
            DialogVm::Finished => (
                "Installation Complete",
                "Installation completed successfully!",
                COL_SUCCESS,
            ),
        };
        let finished = matches!(dialog, DialogVm::Finished);

        let mut close_dialog = false;
        let mut close_app = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(message).color(color));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if finished {
                        close_app = ui.button("Close installer").clicked();
                        close_dialog = ui.button("Back").clicked();
                    } else {
                        close_dialog = ui.button("OK").clicked();
                    }
                });
            });

        if close_app {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if close_dialog {
            self.dialog = None;
        }
    }
}

impl eframe::App for InstallerUiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.handle_updates() {
            ctx.request_repaint();
        }

        ctx.options_mut(|options| {
            options.max_passes = std::num::NonZeroUsize::MIN.saturating_add(2);
        });
        ctx.style_mut(|style| {
            style.wrap_mode = Some(egui::TextWrapMode::Extend);
        });

        let state = self.controller.session().state();
        let nav = self.controller.navigation();
        let vm = self.controller.progress_vm();
        let mut resp = actions::ActionsResponse::default();

        egui::CentralPanel::default().show(ctx, |ui| {
            tui(ui, ui.id().with("root"))
                .reserve_available_space()
                .style(taffy::Style {
                    flex_direction: taffy::FlexDirection::Column,
                    size: percent(1.),
                    min_size: taffy::Size {
                        width: percent(1.),
                        height: length(0.0),
                    },
                    ..Default::default()
                })
                .show(|tui| {
                    tui.style(taffy::Style {
                        size: taffy::Size {
                            width: percent(1.),
                            height: length(28.0),
                        },
                        flex_shrink: 0.0,
                        ..Default::default()
                    })
                    .add(|tui| header::draw(tui, state));

                    tui.style(taffy::Style {
                        flex_direction: taffy::FlexDirection::Column,
                        flex_grow: 1.0,
                        flex_basis: length(0.0),
                        min_size: taffy::Size {
                            width: percent(1.),
                            height: length(0.0),
                        },
                        padding: length(12.0),
                        ..Default::default()
                    })
                    .ui(|ui| {
                        progress::draw(ui, &vm);
                        ui.add_space(8.0);
                        ui.label(
                            egui::RichText::new(self.controller.display_command())
                                .monospace()
                                .color(COL_TEXT_DIM),
                        );
                        ui.add_space(4.0);
                        resp = actions::draw(ui, &nav);
                        ui.add_space(8.0);
                        log_view::draw(ui, &self.controller.progress().log);
                    });
                });
        });

        if resp.install {
            self.start();
        }
        if resp.copy_log {
            ctx.copy_text(self.controller.progress().log.to_text());
        }
        if resp.save_log {
            self.save_log();
        }
        if resp.finish {
            if state == SessionState::Failed {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            } else {
                self.dialog = Some(DialogVm::Finished);
            }
        }

        self.draw_dialog(ctx);

        if state == SessionState::Running {
            ctx.request_repaint_after(Duration::from_millis(DRAIN_INTERVAL_MS));
        }
    }
}
