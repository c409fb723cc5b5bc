#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Anime Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the adapter depends on macroquad without its default `audio`
//! feature.
//!
//! The play field is drawn through [`draw_frame`] onto a surface that scales
//! the logical 800×600 field into the window. The status panel to its right
//! uses Macroquad's immediate-mode UI, which lives in the local `ui` module.

mod ui;

use std::time::Duration;

use anime_defence_core::{SURFACE_HEIGHT, SURFACE_WIDTH};
use anime_defence_rendering::{
    draw_frame, Color, DrawSurface, FrameInput, Presentation, RenderingBackend, Scene,
};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};

use self::ui::{draw_hud_ui, HudUiContext, HudUiResult};

/// Logical width of the status panel placed right of the play field.
const PANEL_WIDTH: f32 = 240.0;
const SLOT_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

/// Latches panel interactions so they are merged with physical input on the
/// next frame.
#[derive(Clone, Copy, Debug, Default)]
struct PanelInputState {
    select_slot: Option<usize>,
    toggle_pause: bool,
}

impl PanelInputState {
    fn register(&mut self, result: HudUiResult) {
        if result.select_slot.is_some() {
            self.select_slot = result.select_slot;
        }
        self.toggle_pause |= result.toggle_pause;
    }

    fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    quit_requested: bool,
    toggle_pause: bool,
    select_slot: Option<usize>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let toggle_pause = is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Space);
        let select_slot = SLOT_KEYS.iter().position(|key| is_key_pressed(*key));

        Self {
            quit_requested,
            toggle_pause,
            select_slot,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Creates a backend that keeps the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the swap interval requested from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Enables or disables vertical sync.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self { swap_interval } = self;
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (SURFACE_WIDTH + PANEL_WIDTH) as i32,
            window_height: SURFACE_HEIGHT as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let panel_background = to_macroquad_color(Color::from_hex(0x2c3e50));
            let mut panel_input = PanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();

                macroquad::window::clear_background(background);

                let metrics = FieldMetrics::from_screen(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let (cursor_x, cursor_y) = mouse_position();
                let click = is_mouse_button_pressed(MouseButton::Left)
                    .then_some(Vec2::new(cursor_x, cursor_y));
                let frame_input =
                    gather_frame_input(&metrics, click, keyboard, panel_input.take());

                update_scene(frame_dt, frame_input, &mut scene);
                if frame_input.quit {
                    break;
                }

                let mut surface = MacroquadSurface { metrics: &metrics };
                draw_frame(&mut surface, &scene);

                let mut root_ui = macroquad::ui::root_ui();
                let result = draw_hud_ui(
                    &mut root_ui,
                    HudUiContext {
                        origin: to_macroquad_vec2(metrics.panel_origin()),
                        size: to_macroquad_vec2(metrics.panel_size()),
                        background: panel_background,
                        hud: &scene.hud,
                    },
                );
                drop(root_ui);
                panel_input.register(result);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Placement of the logical field inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FieldMetrics {
    scale: f32,
    offset: Vec2,
}

impl FieldMetrics {
    fn from_screen(screen_width: f32, screen_height: f32) -> Self {
        let logical_width = SURFACE_WIDTH + PANEL_WIDTH;
        let scale = (screen_width / logical_width)
            .min(screen_height / SURFACE_HEIGHT)
            .max(0.0);
        let offset = Vec2::new(
            (screen_width - logical_width * scale) / 2.0,
            (screen_height - SURFACE_HEIGHT * scale) / 2.0,
        );
        Self { scale, offset }
    }

    fn to_screen(&self, logical: Vec2) -> Vec2 {
        self.offset + logical * self.scale
    }

    /// Maps a cursor position into field units, or `None` outside the field.
    fn to_logical(&self, cursor: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let logical = (cursor - self.offset) / self.scale;
        let inside = logical.x >= 0.0
            && logical.x < SURFACE_WIDTH
            && logical.y >= 0.0
            && logical.y < SURFACE_HEIGHT;
        inside.then_some(logical)
    }

    fn panel_origin(&self) -> Vec2 {
        self.to_screen(Vec2::new(SURFACE_WIDTH, 0.0))
    }

    fn panel_size(&self) -> Vec2 {
        Vec2::new(PANEL_WIDTH, SURFACE_HEIGHT) * self.scale
    }
}

fn gather_frame_input(
    metrics: &FieldMetrics,
    click: Option<Vec2>,
    keyboard: KeyboardShortcuts,
    panel: PanelInputState,
) -> FrameInput {
    FrameInput {
        click: click.and_then(|cursor| metrics.to_logical(cursor)),
        select_slot: panel.select_slot.or(keyboard.select_slot),
        toggle_pause: keyboard.toggle_pause || panel.toggle_pause,
        quit: keyboard.quit_requested,
    }
}

struct MacroquadSurface<'a> {
    metrics: &'a FieldMetrics,
}

impl DrawSurface for MacroquadSurface<'_> {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = self.metrics.to_screen(center);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius * self.metrics.scale,
            to_macroquad_color(color),
        );
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        let center = self.metrics.to_screen(center);
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius * self.metrics.scale,
            thickness * self.metrics.scale,
            to_macroquad_color(color),
        );
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let from = self.metrics.to_screen(from);
        let to = self.metrics.to_screen(to);
        macroquad::shapes::draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            thickness * self.metrics.scale,
            to_macroquad_color(color),
        );
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let origin = self.metrics.to_screen(origin);
        let size = size * self.metrics.scale;
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }
}

fn to_macroquad_vec2(value: Vec2) -> macroquad::math::Vec2 {
    macroquad::math::Vec2::new(value.x, value.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_fill_a_window_of_native_size() {
        let metrics = FieldMetrics::from_screen(1040.0, 600.0);
        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset, Vec2::ZERO);
        assert_eq!(metrics.panel_origin(), Vec2::new(800.0, 0.0));
    }

    #[test]
    fn metrics_letterbox_tall_windows() {
        let metrics = FieldMetrics::from_screen(520.0, 600.0);
        assert_eq!(metrics.scale, 0.5);
        assert_eq!(metrics.offset, Vec2::new(0.0, 150.0));
        assert_eq!(metrics.panel_size(), Vec2::new(120.0, 300.0));
    }

    #[test]
    fn clicks_map_into_field_units() {
        let metrics = FieldMetrics::from_screen(2080.0, 1200.0);
        assert_eq!(
            metrics.to_logical(Vec2::new(200.0, 1000.0)),
            Some(Vec2::new(100.0, 500.0))
        );
        assert_eq!(metrics.to_logical(Vec2::new(1700.0, 100.0)), None);
    }

    #[test]
    fn clicks_outside_the_field_are_dropped() {
        let metrics = FieldMetrics::from_screen(1040.0, 600.0);
        let input = gather_frame_input(
            &metrics,
            Some(Vec2::new(900.0, 300.0)),
            KeyboardShortcuts::default(),
            PanelInputState::default(),
        );
        assert_eq!(input.click, None);
    }

    #[test]
    fn panel_buttons_merge_with_keyboard() {
        let metrics = FieldMetrics::from_screen(1040.0, 600.0);
        let mut panel = PanelInputState::default();
        panel.register(HudUiResult {
            select_slot: Some(4),
            toggle_pause: true,
        });

        let keyboard = KeyboardShortcuts {
            select_slot: Some(1),
            ..KeyboardShortcuts::default()
        };
        let input = gather_frame_input(&metrics, None, keyboard, panel.take());
        assert_eq!(input.select_slot, Some(4));
        assert!(input.toggle_pause);

        let input = gather_frame_input(&metrics, None, keyboard, panel.take());
        assert_eq!(input.select_slot, Some(1));
        assert!(!input.toggle_pause);
    }

    #[test]
    fn degenerate_window_ignores_clicks() {
        let metrics = FieldMetrics::from_screen(0.0, 0.0);
        assert_eq!(metrics.to_logical(Vec2::new(0.0, 0.0)), None);
    }
}
