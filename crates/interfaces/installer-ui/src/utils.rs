use crate::theme::*;
use eframe::egui;
use eframe::egui::Color32;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Primary,
    Outline,
}

pub fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .size(10.0)
            .color(COL_TEXT_DIM)
            .family(egui::FontFamily::Monospace)
            .strong(),
    );
}

pub fn cmd_button(
    ui: &mut egui::Ui,
    label: &str,
    kind: ButtonKind,
    enabled: bool,
) -> egui::Response {
    let text_col = match (enabled, kind) {
        (false, _) => COL_TEXT_DIM,
        (true, ButtonKind::Primary) => COL_BG_DARK,
        (true, ButtonKind::Outline) => COL_ACCENT,
    };
    let fill = if enabled && kind == ButtonKind::Primary {
        COL_ACCENT
    } else {
        Color32::TRANSPARENT
    };
    let stroke = if enabled { COL_ACCENT } else { COL_BORDER };

    let btn = egui::Button::new(egui::RichText::new(label).size(11.0).color(text_col))
        .min_size(egui::vec2(96.0, 26.0))
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, stroke));

    ui.add_enabled(enabled, btn)
}
