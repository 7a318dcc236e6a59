use crate::utils::{cmd_button, ButtonKind};
use eframe::egui;
use installer_app_core::NavigationVm;

#[derive(Default)]
pub struct ActionsResponse {
    pub install: bool,
    pub copy_log: bool,
    pub save_log: bool,
    pub finish: bool,
}

pub fn draw(ui: &mut egui::Ui, nav: &NavigationVm) -> ActionsResponse {
    let mut resp = ActionsResponse::default();
    ui.horizontal(|ui| {
        resp.copy_log =
            cmd_button(ui, "COPY LOG", ButtonKind::Outline, nav.copy_log_enabled).clicked();
        resp.save_log =
            cmd_button(ui, "SAVE LOG", ButtonKind::Outline, nav.copy_log_enabled).clicked();

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if nav.finish_visible {
                resp.finish = cmd_button(ui, "FINISH", ButtonKind::Primary, true).clicked();
            } else {
                resp.install =
                    cmd_button(ui, "INSTALL", ButtonKind::Primary, nav.install_enabled).clicked();
            }
        });
    });
    resp
}
