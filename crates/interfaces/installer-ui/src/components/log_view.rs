use crate::theme::*;
use crate::utils::section_label;
use eframe::egui;
use installer_app_core::LogBuffer;

pub fn draw(ui: &mut egui::Ui, log: &LogBuffer) {
    section_label(ui, "INSTALLER OUTPUT");

    egui::Frame::new()
        .fill(COL_BG_DARK)
        .stroke(egui::Stroke::new(1.0, COL_BORDER))
        .inner_margin(egui::Margin::same(6))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in log.lines() {
                        let color = if line.starts_with("ERROR: ") {
                            COL_DANGER
                        } else {
                            COL_TEXT
                        };
                        ui.label(egui::RichText::new(line).monospace().color(color));
                    }
                });
        });
}
