use crate::theme::*;
use crate::utils::section_label;
use eframe::egui;
use installer_app_core::ProgressVm;

pub fn draw(ui: &mut egui::Ui, vm: &ProgressVm) {
    section_label(ui, "PROGRESS");
    ui.label(egui::RichText::new(vm.headline).heading().color(COL_TEXT));
    ui.add(
        egui::ProgressBar::new(vm.fraction)
            .text(vm.bar_text.as_str())
            .animate(vm.show_spinner),
    );
    ui.label(egui::RichText::new(&vm.status).color(COL_TEXT_DIM));
}
