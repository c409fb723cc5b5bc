#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Anime Defence.
//!
//! The world owns the clock, the active enemies and the placed units of a
//! single session. It is mutated exclusively through [`apply`]; systems observe
//! it through the read-only [`query`] module.

mod enemies;
mod units;

use std::time::Duration;

use anime_defence_catalog::{instantiate_enemy, is_valid_placement, path};
use anime_defence_core::{
    Command, Difficulty, EnemyId, EnemyTier, Event, InflictedEffect, PlacementError, PlacementId,
    Position, SessionSummary, Unit, WELCOME_BANNER,
};

use enemies::EnemyState;
use units::UnitRegistry;

/// Represents the authoritative Anime Defence session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    running: bool,
    paused: bool,
    map: String,
    difficulty: Difficulty,
    wave: u32,
    lives: u32,
    currency: u32,
    enemies_defeated: u32,
    clock: Duration,
    enemies: Vec<EnemyState>,
    next_enemy_id: EnemyId,
    units: UnitRegistry,
}

impl World {
    /// Creates an idle world; no session runs until `StartSession` is applied.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            running: false,
            paused: false,
            map: String::new(),
            difficulty: Difficulty::Easy,
            wave: 1,
            lives: 0,
            currency: 0,
            enemies_defeated: 0,
            clock: Duration::ZERO,
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            units: UnitRegistry::new(),
        }
    }

    fn start_session(
        &mut self,
        map: String,
        difficulty: Difficulty,
        starting_currency: u32,
        out_events: &mut Vec<Event>,
    ) {
        if path(&map).is_empty() {
            log::warn!("starting session on unknown map `{map}`; enemies will not move");
        }

        self.running = true;
        self.paused = false;
        self.difficulty = difficulty;
        self.wave = 1;
        self.lives = difficulty.starting_lives();
        self.currency = starting_currency;
        self.enemies_defeated = 0;
        self.clock = Duration::ZERO;
        self.enemies.clear();
        self.next_enemy_id = EnemyId::new(0);
        self.units = UnitRegistry::new();
        self.map = map;

        log::info!(
            "session started on {} ({}, {} lives)",
            self.map,
            difficulty,
            self.lives
        );
        out_events.push(Event::SessionStarted {
            map: self.map.clone(),
            difficulty,
            lives: self.lives,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.running || self.paused {
            return;
        }

        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let waypoints = path(&self.map);
        for enemy in self.enemies.iter_mut() {
            let dealt = enemy.advance(waypoints, self.clock);
            if dealt > 0 {
                out_events.push(Event::EnemyDamaged {
                    enemy: enemy.id,
                    amount: dealt,
                    remaining: enemy.health,
                });
            }
        }

        self.reap_enemies(out_events);
        if !self.running {
            return;
        }

        for placed in self.units.iter_mut() {
            placed.advance();
        }
    }

    fn reap_enemies(&mut self, out_events: &mut Vec<Event>) {
        let (defeated, remaining): (Vec<EnemyState>, Vec<EnemyState>) =
            std::mem::take(&mut self.enemies)
                .into_iter()
                .partition(|enemy| !enemy.is_alive());
        let (escaped, active): (Vec<EnemyState>, Vec<EnemyState>) =
            remaining.into_iter().partition(|enemy| enemy.reached_end);
        self.enemies = active;

        for enemy in &defeated {
            self.currency = self.currency.saturating_add(enemy.reward);
            self.enemies_defeated = self.enemies_defeated.saturating_add(1);
            out_events.push(Event::EnemyDefeated {
                enemy: enemy.id,
                reward: enemy.reward,
            });
        }

        for enemy in &escaped {
            self.lives = self.lives.saturating_sub(1);
            out_events.push(Event::EnemyEscaped {
                enemy: enemy.id,
                lives_remaining: self.lives,
            });
        }

        if defeated.is_empty() && escaped.is_empty() {
            return;
        }

        for placed in self.units.iter_mut() {
            let stale = placed.target.map_or(false, |target| {
                defeated.iter().chain(escaped.iter()).any(|enemy| enemy.id == target)
            });
            if stale {
                placed.target = None;
            }
        }

        if !escaped.is_empty() && self.lives == 0 {
            log::info!("last life lost on wave {}", self.wave);
            self.end_session(out_events);
        }
    }

    fn end_session(&mut self, out_events: &mut Vec<Event>) {
        if !self.running {
            return;
        }

        self.running = false;
        self.paused = false;
        let summary = SessionSummary::compute(self.wave, self.enemies_defeated, self.difficulty);
        log::info!(
            "session ended on wave {} with {} enemies defeated",
            summary.wave,
            summary.enemies_defeated
        );
        out_events.push(Event::SessionEnded { summary });
    }

    fn place_unit(&mut self, unit: Unit, position: Position, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.validate_placement(&unit, position) {
            log::debug!("placement of {} rejected: {reason}", unit.name);
            out_events.push(Event::UnitPlacementRejected {
                unit: unit.id,
                position,
                reason,
            });
            return;
        }

        self.currency -= unit.cost;
        let unit_id = unit.id;
        let cost = unit.cost;
        let placement = self.units.insert(unit, position);
        out_events.push(Event::UnitPlaced {
            placement,
            unit: unit_id,
            position,
            cost,
        });
    }

    fn validate_placement(&self, unit: &Unit, position: Position) -> Result<(), PlacementError> {
        if !self.running {
            return Err(PlacementError::SessionInactive);
        }
        if !is_valid_placement(position, &self.map) {
            return Err(PlacementError::InvalidPosition);
        }
        if self.units.crowds(position) {
            return Err(PlacementError::TooCloseToUnit);
        }
        if self.units.placed_count(&unit.template) >= unit.max_placement {
            return Err(PlacementError::PlacementLimitReached);
        }
        if unit.is_godly() && self.units.has_godly() {
            return Err(PlacementError::GodlyLimitReached);
        }
        if self.currency < unit.cost {
            return Err(PlacementError::InsufficientFunds);
        }
        Ok(())
    }

    fn spawn_enemy(&mut self, tier: EnemyTier, out_events: &mut Vec<Event>) {
        if !self.running {
            return;
        }

        let Some(instance) = instantiate_enemy(&self.map, tier, self.wave, self.difficulty) else {
            log::warn!("no {} enemy defined for map `{}`", tier.as_str(), self.map);
            return;
        };

        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        self.enemies.push(EnemyState::spawn(id, instance));
        out_events.push(Event::EnemySpawned { enemy: id, tier });
    }

    fn resolve_attack(
        &mut self,
        placement: PlacementId,
        enemy: EnemyId,
        damage: u32,
        effects: Vec<InflictedEffect>,
        out_events: &mut Vec<Event>,
    ) {
        let now = self.clock;
        let Some(attacker) = self.units.get_mut(placement) else {
            return;
        };
        let Ok(index) = self.enemies.binary_search_by_key(&enemy, |state| state.id) else {
            return;
        };
        let target = &mut self.enemies[index];
        if !target.is_alive() {
            return;
        }

        attacker.last_action = Some(now);
        let dealt = target.take_damage(damage);
        for effect in effects {
            target.apply_effect(effect.kind, effect.duration, now);
        }

        out_events.push(Event::UnitAttacked {
            placement,
            enemy,
            damage,
        });
        out_events.push(Event::EnemyDamaged {
            enemy,
            amount: dealt,
            remaining: target.health,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession {
            map,
            difficulty,
            starting_currency,
        } => world.start_session(map, difficulty, starting_currency, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetPaused { paused } => {
            if world.running && world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::PlaceUnit { unit, position } => world.place_unit(unit, position, out_events),
        Command::RemoveUnit { placement } => {
            if world.units.remove(placement).is_some() {
                out_events.push(Event::UnitRemoved { placement });
            }
        }
        Command::AssignTarget { placement, target } => {
            if let Some(placed) = world.units.get_mut(placement) {
                placed.target = target;
            }
        }
        Command::ResolveAttack {
            placement,
            enemy,
            damage,
            effects,
        } => world.resolve_attack(placement, enemy, damage, effects, out_events),
        Command::GrantIncome { placement, amount } => {
            if !world.running {
                return;
            }
            let now = world.clock;
            if let Some(placed) = world.units.get_mut(placement) {
                placed.last_action = Some(now);
                world.currency = world.currency.saturating_add(amount);
                out_events.push(Event::IncomeGenerated { placement, amount });
            }
        }
        Command::SpawnEnemy { tier } => world.spawn_enemy(tier, out_events),
        Command::AdvanceWave => {
            if world.running {
                world.wave = world.wave.saturating_add(1);
                log::info!("wave {} incoming", world.wave);
                out_events.push(Event::WaveAdvanced { wave: world.wave });
            }
        }
        Command::EndSession => world.end_session(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use anime_defence_core::{Difficulty, EnemyView, UnitView};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports whether a session is running.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.running
    }

    /// Reports whether the running session is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Identifier of the map of the current or last session.
    #[must_use]
    pub fn map_id(world: &World) -> &str {
        &world.map
    }

    /// Difficulty of the current or last session.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Current wave number, starting at one.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Lives left before the session ends.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Spendable session currency.
    #[must_use]
    pub fn currency(world: &World) -> u32 {
        world.currency
    }

    /// Enemies defeated during the session.
    #[must_use]
    pub fn enemies_defeated(world: &World) -> u32 {
        world.enemies_defeated
    }

    /// Simulated time elapsed while the session was running and unpaused.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of enemies currently on the map, including ones awaiting removal.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Number of placed units created from the provided template.
    #[must_use]
    pub fn placed_count(world: &World, template: &str) -> u32 {
        world.units.placed_count(template)
    }

    /// Captures a read-only view of the enemies on the map.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed units.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.units.iter().map(|placed| placed.snapshot()).collect())
    }
}
