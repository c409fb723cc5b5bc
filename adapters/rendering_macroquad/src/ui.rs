//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use anime_defence_rendering::Hud;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Outcome of rendering the status panel during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct HudUiResult {
    /// Roster slot whose button was pressed.
    pub(crate) select_slot: Option<usize>,
    /// Whether the pause button was pressed.
    pub(crate) toggle_pause: bool,
}

/// Snapshot of the status panel's layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HudUiContext<'a> {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin.
    pub(crate) background: Color,
    /// Status exposed by the simulation.
    pub(crate) hud: &'a Hud,
}

fn status_label(hud: &Hud) -> &'static str {
    match (hud.running, hud.paused) {
        (false, _) => "Session over",
        (true, true) => "Paused",
        (true, false) => "Running",
    }
}

fn roster_label(index: usize, name: &str, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    if index < 9 {
        format!("{marker} {} {name}", index + 1)
    } else {
        format!("{marker}   {name}")
    }
}

/// Renders the status panel and reports the buttons pressed this frame.
pub(crate) fn draw_hud_ui(ui: &mut Ui, context: HudUiContext<'_>) -> HudUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 3.0, 3.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(52, 73, 94, 255))
        .color_hovered(Color::from_rgba(72, 99, 126, 255))
        .color_clicked(Color::from_rgba(44, 62, 80, 255))
        .margin(RectOffset::new(4.0, 4.0, 4.0, 4.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let hud = context.hud;
    let mut result = HudUiResult::default();
    let _ = ui.window(hash!("status_panel"), context.origin, context.size, |ui| {
        ui.label(None, &format!("Wave: {}", hud.wave));
        ui.label(None, &format!("Lives: {}", hud.lives));
        ui.label(None, &format!("Currency: {}", hud.currency));
        ui.label(None, &format!("Yen: {}", hud.yen));
        ui.label(None, status_label(hud));

        if hud.running {
            let pause_label = if hud.paused { "Resume" } else { "Pause" };
            result.toggle_pause = ui.button(None, pause_label);
        }

        ui.separator();
        ui.label(None, "Units");
        for (index, name) in hud.roster.iter().enumerate() {
            let selected = hud.selected_slot == Some(index);
            if ui.button(None, roster_label(index, name, selected).as_str()) {
                result.select_slot = Some(index);
            }
        }

        if let Some(message) = &hud.message {
            ui.separator();
            ui.label(None, message);
        }
    });

    ui.pop_skin();
    result
}
