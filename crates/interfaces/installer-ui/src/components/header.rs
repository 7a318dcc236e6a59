use crate::theme::*;
use eframe::egui;
use egui_taffy::bg::simple::{TuiBackground, TuiBuilderLogicWithBackground};
use egui_taffy::taffy::prelude::{length, percent};
use egui_taffy::{taffy, TuiBuilderLogic};
use installer_app_core::SessionState;

pub fn draw<'a>(tui: impl TuiBuilderLogic<'a>, state: SessionState) {
    let (status, color) = match state {
        SessionState::Idle => ("STATUS: READY", COL_ACCENT),
        SessionState::Running => ("STATUS: INSTALLING", COL_WARN),
        SessionState::Succeeded => ("STATUS: DONE", COL_SUCCESS),
        SessionState::Failed => ("STATUS: FAILED", COL_DANGER),
    };

    tui.style(taffy::Style {
        flex_direction: taffy::FlexDirection::Row,
        justify_content: Some(taffy::JustifyContent::SpaceBetween),
        align_items: Some(taffy::AlignItems::Center),
        padding: length(6.0),
        size: taffy::Size {
            width: percent(1.),
            height: percent(1.),
        },
        ..Default::default()
    })
    .bg_add(
        TuiBackground::new()
            .with_background_color(COL_BG)
            .with_border_color(COL_BORDER)
            .with_border_width(1.0),
        |tui| {
            tui.label(
                egui::RichText::new("LOC INSTALLER")
                    .family(egui::FontFamily::Monospace)
                    .size(12.0)
                    .extra_letter_spacing(2.0)
                    .strong()
                    .color(COL_TEXT),
            );

            tui.style(taffy::Style {
                flex_direction: taffy::FlexDirection::Row,
                align_items: Some(taffy::AlignItems::Center),
                gap: length(6.0),
                ..Default::default()
            })
            .add(|tui| {
                if state == SessionState::Running {
                    tui.ui_add(egui::Spinner::new());
                }
                tui.label(egui::RichText::new(status).color(color).size(10.0));
            });
        },
    );
}
