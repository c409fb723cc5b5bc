#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that owns a session world, its systems and the player profile.
//!
//! Every frame applies a tick to the world, lets the targeting, combat and
//! wave systems respond with commands, and routes the resulting events into
//! the profile. Adapters only talk to [`Simulation`].

mod config;

use std::time::Duration;

use anime_defence_core::{
    Command, Difficulty, Event, PlacementError, PlacementId, Position, SessionSummary, UnitId,
    UnitTrait,
};
use anime_defence_profile::{Profile, ProfileError, ProfileStore};
use anime_defence_system_unit_combat::UnitCombat;
use anime_defence_system_unit_targeting::UnitTargeting;
use anime_defence_system_wave_director::WaveDirector;
use anime_defence_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use config::SimulationConfig;

/// Owns a world together with the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    targeting: UnitTargeting,
    combat: UnitCombat,
    director: WaveDirector,
    profile: Profile,
    store: Option<ProfileStore>,
    rng: ChaCha8Rng,
    since_save: Duration,
    last_summary: Option<SessionSummary>,
    commands: Vec<Command>,
    director_inbox: Vec<Event>,
    outbox: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation, loading the profile from `store` when present.
    ///
    /// Without a store the simulation starts from a fresh profile and never
    /// persists it.
    #[must_use]
    pub fn new(config: SimulationConfig, store: Option<ProfileStore>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let profile = match &store {
            Some(store) => store.load_or_new(&mut rng),
            None => Profile::new(&mut rng),
        };

        Self {
            config,
            world: World::new(),
            targeting: UnitTargeting::new(),
            combat: UnitCombat::new(),
            director: WaveDirector::new(config.director()),
            profile,
            store,
            rng,
            since_save: Duration::ZERO,
            last_summary: None,
            commands: Vec::new(),
            director_inbox: Vec::new(),
            outbox: Vec::new(),
        }
    }

    /// Read-only access to the session world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the player profile.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Configuration the simulation was created with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Summary of the most recently ended session.
    #[must_use]
    pub const fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// Events produced since the start of the current frame.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.outbox
    }

    /// Starts a new session on the provided map, replacing any running one.
    pub fn start(&mut self, map: &str, difficulty: Difficulty) {
        if query::is_running(&self.world) {
            let _ = self.dispatch(Command::EndSession);
        }
        let _ = self.dispatch(Command::StartSession {
            map: map.to_owned(),
            difficulty,
            starting_currency: self.config.starting_currency,
        });
    }

    /// Advances the simulation by one frame.
    pub fn frame(&mut self, dt: Duration) {
        self.outbox.clear();
        self.autosave(dt);

        let _ = self.dispatch(Command::Tick { dt });
        if query::is_running(&self.world) && !query::is_paused(&self.world) {
            let units = query::unit_view(&self.world);
            let enemies = query::enemy_view(&self.world);
            self.targeting.handle(&units, &enemies, &mut self.commands);
            self.flush_commands();

            let units = query::unit_view(&self.world);
            let enemies = query::enemy_view(&self.world);
            self.combat.handle(
                query::clock(&self.world),
                &units,
                &enemies,
                &mut self.commands,
            );
            self.flush_commands();
        }

        let enemy_count = query::enemy_count(&self.world);
        self.director
            .handle(&self.director_inbox, enemy_count, &mut self.commands);
        self.director_inbox.clear();
        self.flush_commands();
    }

    /// Pauses a running session or resumes a paused one.
    pub fn toggle_pause(&mut self) {
        let paused = !query::is_paused(&self.world);
        let _ = self.dispatch(Command::SetPaused { paused });
    }

    /// Ends the running session and applies its payout.
    pub fn end_session(&mut self) -> Option<SessionSummary> {
        let start = self.dispatch(Command::EndSession);
        self.outbox[start..].iter().find_map(|event| match event {
            Event::SessionEnded { summary } => Some(*summary),
            _ => None,
        })
    }

    /// Selects an inventory unit for placement.
    pub fn select_unit(&mut self, id: UnitId) -> Result<(), ProfileError> {
        self.profile.select_unit(id)
    }

    /// Places the selected inventory unit at `position`.
    pub fn place_selected(&mut self, position: Position) -> Result<PlacementId, PlacementError> {
        let unit = self
            .profile
            .selected_unit()
            .cloned()
            .ok_or(PlacementError::NothingSelected)?;
        let start = self.dispatch(Command::PlaceUnit { unit, position });
        self.outbox[start..]
            .iter()
            .find_map(|event| match event {
                Event::UnitPlaced { placement, .. } => Some(Ok(*placement)),
                Event::UnitPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::SessionInactive))
    }

    /// Removes a placed unit without refunding its cost.
    pub fn remove_unit(&mut self, placement: PlacementId) -> bool {
        let start = self.dispatch(Command::RemoveUnit { placement });
        self.outbox[start..]
            .iter()
            .any(|event| matches!(event, Event::UnitRemoved { .. }))
    }

    /// Buys a gacha pull with profile yen.
    pub fn roll_unit(&mut self) -> Result<UnitId, ProfileError> {
        let id = self.profile.roll_unit(&mut self.rng)?.id;
        self.save();
        Ok(id)
    }

    /// Spends a trait chip on an inventory unit.
    pub fn apply_random_trait(&mut self, id: UnitId) -> Result<UnitTrait, ProfileError> {
        let applied = self.profile.apply_random_trait(id, &mut self.rng)?;
        self.save();
        Ok(applied)
    }

    /// Spends a stat reroll on an inventory unit.
    pub fn reroll_stats(&mut self, id: UnitId) -> Result<(), ProfileError> {
        self.profile.reroll_stats(id, &mut self.rng)?;
        self.save();
        Ok(())
    }

    /// Writes the profile to the store; failures are logged and ignored.
    pub fn save(&mut self) {
        self.since_save = Duration::ZERO;
        let Some(store) = &self.store else {
            return;
        };
        match store.save(&self.profile) {
            Ok(()) => log::debug!("profile saved to {}", store.path().display()),
            Err(error) => log::warn!("failed to save profile: {error}"),
        }
    }

    fn autosave(&mut self, dt: Duration) {
        self.since_save = self.since_save.saturating_add(dt);
        if self.since_save >= self.config.autosave_interval() {
            log::trace!("autosave");
            self.save();
        }
    }

    fn flush_commands(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        for command in commands {
            let _ = self.dispatch(command);
        }
    }

    /// Applies a command and routes its events; returns the index of the
    /// first produced event in the outbox.
    fn dispatch(&mut self, command: Command) -> usize {
        let mut produced = Vec::new();
        world::apply(&mut self.world, command, &mut produced);

        let mut ended = false;
        for event in &produced {
            match event {
                Event::EnemyDefeated { reward, .. } => {
                    self.profile.gain_yen(*reward);
                    let _ = self.profile.gain_xp(*reward);
                }
                Event::IncomeGenerated { amount, .. } => self.profile.gain_yen(*amount),
                Event::SessionEnded { summary } => {
                    self.profile.apply_payout(summary);
                    self.last_summary = Some(*summary);
                    ended = true;
                }
                _ => {}
            }
        }

        let start = self.outbox.len();
        self.director_inbox.extend(produced.iter().cloned());
        self.outbox.append(&mut produced);
        if ended {
            self.save();
        }
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn simulation() -> Simulation {
        Simulation::new(SimulationConfig::default(), None)
    }

    #[test]
    fn placing_requires_selection() {
        let mut sim = simulation();
        sim.start("dragonball", Difficulty::Easy);
        assert_eq!(
            sim.place_selected(Position::new(100.0, 500.0)),
            Err(PlacementError::NothingSelected)
        );
    }

    #[test]
    fn selected_starter_can_be_placed() {
        let mut sim = simulation();
        sim.start("dragonball", Difficulty::Easy);
        let starter = sim.profile().inventory()[0].id;
        sim.select_unit(starter).expect("owned");

        let placement = sim.place_selected(Position::new(100.0, 500.0));
        assert!(placement.is_ok());
        assert_eq!(query::currency(sim.world()), 50);
        assert_eq!(
            sim.place_selected(Position::new(100.0, 300.0)),
            Err(PlacementError::InvalidPosition)
        );
    }

    #[test]
    fn placement_outside_a_session_is_rejected() {
        let mut sim = simulation();
        let starter = sim.profile().inventory()[0].id;
        sim.select_unit(starter).expect("owned");
        assert_eq!(
            sim.place_selected(Position::new(100.0, 500.0)),
            Err(PlacementError::SessionInactive)
        );
    }

    #[test]
    fn first_wave_waits_for_its_delay() {
        let mut sim = simulation();
        sim.start("dragonball", Difficulty::Easy);
        for _ in 0..60 {
            sim.frame(FRAME);
        }
        assert_eq!(query::enemy_count(sim.world()), 0);
        for _ in 0..5 {
            sim.frame(FRAME);
        }
        assert_eq!(query::enemy_count(sim.world()), 1);
    }

    #[test]
    fn pause_freezes_the_wave_schedule() {
        let mut sim = simulation();
        sim.start("dragonball", Difficulty::Easy);
        sim.toggle_pause();
        for _ in 0..200 {
            sim.frame(FRAME);
        }
        assert_eq!(query::enemy_count(sim.world()), 0);
        assert_eq!(query::clock(sim.world()), Duration::ZERO);

        sim.toggle_pause();
        for _ in 0..65 {
            sim.frame(FRAME);
        }
        assert_eq!(query::enemy_count(sim.world()), 1);
    }

    #[test]
    fn ending_a_session_pays_out_once() {
        let mut sim = simulation();
        sim.start("dragonball", Difficulty::Hard);
        let yen = sim.profile().yen();

        let summary = sim.end_session().expect("summary");
        assert_eq!(summary.wave, 1);
        assert_eq!(sim.last_summary(), Some(&summary));
        assert!(sim.end_session().is_none());
        assert_eq!(sim.profile().yen(), yen + summary.yen_earned);
    }
}
