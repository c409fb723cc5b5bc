//! Windowed play: translates frame input into simulation calls and mirrors
//! the simulation into the rendered scene.

use std::time::Duration;

use anime_defence_core::{Event, Position};
use anime_defence_rendering::{FrameInput, Hud, Scene};
use anime_defence_simulation::Simulation;
use anime_defence_world::query;
use glam::Vec2;

use crate::autoplace::AutoPlacer;

/// Player-facing state wrapped around a running simulation.
#[derive(Debug)]
pub(crate) struct App {
    simulation: Simulation,
    placer: Option<AutoPlacer>,
    message: Option<String>,
}

impl App {
    /// Wraps a simulation whose session has already started.
    pub(crate) fn new(mut simulation: Simulation, placer: Option<AutoPlacer>) -> Self {
        if let Some(placer) = &placer {
            let _ = placer.place(&mut simulation);
        }
        Self {
            simulation,
            placer,
            message: None,
        }
    }

    /// Scene describing the current simulation state.
    pub(crate) fn scene(&self) -> Scene {
        let mut scene = Scene::new(query::map_id(self.simulation.world()));
        self.populate(&mut scene);
        scene
    }

    /// Applies one frame of input, advances the simulation and refreshes
    /// the scene.
    pub(crate) fn update(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        if input.quit {
            if self.simulation.end_session().is_none() {
                self.simulation.save();
            }
            self.observe_events();
            self.populate(scene);
            return;
        }
        if input.toggle_pause {
            self.simulation.toggle_pause();
        }
        if let Some(slot) = input.select_slot {
            self.select_slot(slot);
        }
        if let Some(click) = input.click {
            self.place_at(click);
        }

        self.simulation.frame(dt);
        self.observe_events();
        self.populate(scene);
    }

    fn select_slot(&mut self, slot: usize) {
        let Some(id) = self
            .simulation
            .profile()
            .inventory()
            .get(slot)
            .map(|unit| unit.id)
        else {
            return;
        };
        self.message = self
            .simulation
            .select_unit(id)
            .err()
            .map(|error| error.to_string());
    }

    fn place_at(&mut self, click: Vec2) {
        let position = Position::new(click.x, click.y);
        self.message = match self.simulation.place_selected(position) {
            Ok(_) => None,
            Err(reason) => Some(format!("Cannot place: {reason}")),
        };
    }

    fn observe_events(&mut self) {
        let mut wave_started = false;
        for event in self.simulation.events() {
            match event {
                Event::WaveAdvanced { .. } => wave_started = true,
                Event::SessionEnded { summary } => {
                    self.message = Some(format!(
                        "Session over on wave {}: +{} yen, +{} xp",
                        summary.wave, summary.yen_earned, summary.xp_gained
                    ));
                }
                _ => {}
            }
        }
        if let (true, Some(placer)) = (wave_started, &self.placer) {
            let _ = placer.place(&mut self.simulation);
        }
    }

    fn populate(&self, scene: &mut Scene) {
        let world = self.simulation.world();
        let profile = self.simulation.profile();

        scene.map_id.clear();
        scene.map_id.push_str(query::map_id(world));
        scene.clock = query::clock(world);
        scene.units = query::unit_view(world).into_vec();
        scene.enemies = query::enemy_view(world).into_vec();

        let selected = profile.selected_unit().map(|unit| unit.id);
        scene.hud = Hud {
            wave: query::wave(world),
            lives: query::lives(world),
            currency: query::currency(world),
            yen: profile.yen(),
            paused: query::is_paused(world),
            running: query::is_running(world),
            roster: profile
                .inventory()
                .iter()
                .map(|unit| format!("{} ({}, {})", unit.name, unit.rarity, unit.cost))
                .collect(),
            selected_slot: profile
                .inventory()
                .iter()
                .position(|unit| Some(unit.id) == selected),
            message: self.message.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_defence_core::Difficulty;
    use anime_defence_profile::ProfileStore;
    use anime_defence_simulation::SimulationConfig;

    const FRAME: Duration = Duration::from_millis(16);

    fn app() -> (App, Scene) {
        let mut simulation = Simulation::new(SimulationConfig::default(), None);
        simulation.start("dragonball", Difficulty::Easy);
        let app = App::new(simulation, None);
        let scene = app.scene();
        (app, scene)
    }

    #[test]
    fn scene_mirrors_a_fresh_session() {
        let (_, scene) = app();
        assert_eq!(scene.map_id, "dragonball");
        assert_eq!(scene.hud.wave, 1);
        assert_eq!(scene.hud.lives, 20);
        assert_eq!(scene.hud.currency, 100);
        assert_eq!(scene.hud.roster.len(), 1);
        assert!(scene.hud.roster[0].contains("common"));
        assert_eq!(scene.hud.selected_slot, None);
    }

    #[test]
    fn clicking_without_selection_reports_a_message() {
        let (mut app, mut scene) = app();
        let input = FrameInput {
            click: Some(Vec2::new(100.0, 500.0)),
            ..FrameInput::default()
        };
        app.update(FRAME, input, &mut scene);
        assert_eq!(
            scene.hud.message.as_deref(),
            Some("Cannot place: no unit selected")
        );
    }

    #[test]
    fn selected_slot_is_placed_on_click() {
        let (mut app, mut scene) = app();
        let select = FrameInput {
            select_slot: Some(0),
            ..FrameInput::default()
        };
        app.update(FRAME, select, &mut scene);
        assert_eq!(scene.hud.selected_slot, Some(0));

        let click = FrameInput {
            click: Some(Vec2::new(100.0, 500.0)),
            ..FrameInput::default()
        };
        app.update(FRAME, click, &mut scene);
        assert_eq!(scene.units.len(), 1);
        assert_eq!(scene.hud.currency, 50);
        assert_eq!(scene.hud.message, None);
    }

    #[test]
    fn pause_toggle_is_reflected_in_the_hud() {
        let (mut app, mut scene) = app();
        let input = FrameInput {
            toggle_pause: true,
            ..FrameInput::default()
        };
        app.update(FRAME, input, &mut scene);
        assert!(scene.hud.paused);
        assert_eq!(scene.clock, Duration::ZERO);
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let (mut app, mut scene) = app();
        let input = FrameInput {
            select_slot: Some(7),
            ..FrameInput::default()
        };
        app.update(FRAME, input, &mut scene);
        assert_eq!(scene.hud.selected_slot, None);
        assert_eq!(scene.hud.message, None);
    }

    #[test]
    fn quitting_ends_the_session_and_persists_the_payout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(dir.path());
        let mut simulation = Simulation::new(SimulationConfig::default(), Some(store.clone()));
        simulation.start("dragonball", Difficulty::Easy);
        let yen_before = simulation.profile().yen();
        let mut app = App::new(simulation, None);
        let mut scene = app.scene();

        let quit = FrameInput {
            quit: true,
            ..FrameInput::default()
        };
        app.update(FRAME, quit, &mut scene);

        assert!(!scene.hud.running);
        let summary = *app.simulation.last_summary().expect("payout on quit");
        assert_eq!(summary.wave, 1);
        assert_eq!(app.simulation.profile().yen(), yen_before + summary.yen_earned);
        assert_eq!(
            scene.hud.message.as_deref(),
            Some("Session over on wave 1: +0 yen, +0 xp")
        );

        let saved = store.load().expect("readable").expect("saved on quit");
        assert_eq!(saved.player.yen(), yen_before + summary.yen_earned);
    }

    #[test]
    fn quitting_after_the_session_ended_only_saves() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(dir.path());
        let mut simulation = Simulation::new(SimulationConfig::default(), Some(store.clone()));
        simulation.start("dragonball", Difficulty::Easy);
        let _ = simulation.end_session();
        let mut app = App::new(simulation, None);
        let mut scene = app.scene();

        let quit = FrameInput {
            quit: true,
            ..FrameInput::default()
        };
        app.update(FRAME, quit, &mut scene);

        assert!(!scene.hud.running);
        assert!(store.load().expect("readable").is_some());
    }
}
