//! Enemy state, path following and damage-over-time bookkeeping.

use std::{collections::BTreeMap, time::Duration};

use anime_defence_catalog::EnemyInstance;
use anime_defence_core::{
    EffectKind, EnemyId, EnemySnapshot, EnemyTier, Position, ANIMATION_CYCLE, EFFECT_TICK_PERIOD,
    EFFECT_TICK_WINDOW,
};

/// Distance below which an enemy counts as having reached its waypoint.
const ARRIVAL_THRESHOLD: f32 = 10.0;

/// Path units travelled per frame for every point of enemy speed.
const STEP_FACTOR: f32 = 2.0;

/// Frames a damaged enemy keeps flashing.
const DAMAGE_FLASH_FRAMES: u8 = 10;

/// Timed effect attached to an enemy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ActiveEffect {
    started: Duration,
    expires: Duration,
    fired_period: Option<u128>,
}

impl ActiveEffect {
    fn new(now: Duration, duration: Duration) -> Self {
        Self {
            started: now,
            expires: now.saturating_add(duration),
            fired_period: None,
        }
    }
}

/// Authoritative state of a single enemy.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) name: &'static str,
    pub(crate) tier: EnemyTier,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) speed: f32,
    pub(crate) reward: u32,
    pub(crate) position: Position,
    pub(crate) path_index: usize,
    pub(crate) reached_end: bool,
    pub(crate) effects: BTreeMap<EffectKind, ActiveEffect>,
    pub(crate) phase: u32,
    pub(crate) flash: u8,
}

impl EnemyState {
    pub(crate) fn spawn(id: EnemyId, instance: EnemyInstance) -> Self {
        Self {
            id,
            name: instance.name,
            tier: instance.tier,
            health: instance.max_health,
            max_health: instance.max_health,
            speed: instance.speed,
            reward: instance.reward,
            position: instance.position,
            path_index: 0,
            reached_end: false,
            effects: BTreeMap::new(),
            phase: 0,
            flash: 0,
        }
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Removes health, saturating at zero, and returns the amount removed.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        self.flash = DAMAGE_FLASH_FRAMES;
        dealt
    }

    /// Starts an effect, or pushes back the expiry of one already running.
    pub(crate) fn apply_effect(&mut self, kind: EffectKind, duration: Duration, now: Duration) {
        match self.effects.get_mut(&kind) {
            Some(active) => active.expires = active.expires.max(now.saturating_add(duration)),
            None => {
                let _ = self.effects.insert(kind, ActiveEffect::new(now, duration));
            }
        }
    }

    /// Advances the enemy by one frame and returns effect damage dealt.
    pub(crate) fn advance(&mut self, path: &[Position], now: Duration) -> u32 {
        if !self.is_alive() {
            return 0;
        }

        let dealt = self.tick_effects(now);
        self.flash = self.flash.saturating_sub(1);
        if !self.is_alive() {
            return dealt;
        }

        if let Some(waypoint) = path.get(self.path_index).copied() {
            let dx = waypoint.x() - self.position.x();
            let dy = waypoint.y() - self.position.y();
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < ARRIVAL_THRESHOLD {
                self.path_index += 1;
                if self.path_index >= path.len() {
                    self.reached_end = true;
                }
            } else {
                let step = self.speed * STEP_FACTOR;
                self.position = Position::new(
                    self.position.x() + dx / distance * step,
                    self.position.y() + dy / distance * step,
                );
            }
        }

        self.phase = (self.phase + 1) % ANIMATION_CYCLE;
        dealt
    }

    fn tick_effects(&mut self, now: Duration) -> u32 {
        let period_nanos = EFFECT_TICK_PERIOD.as_nanos();
        let window_nanos = EFFECT_TICK_WINDOW.as_nanos();
        let mut damage = 0_u32;

        self.effects.retain(|kind, effect| {
            if now >= effect.expires {
                return false;
            }
            let elapsed = now.saturating_sub(effect.started).as_nanos();
            let period = elapsed / period_nanos;
            if elapsed % period_nanos < window_nanos && effect.fired_period != Some(period) {
                effect.fired_period = Some(period);
                damage = damage.saturating_add(kind.damage_per_tick(self.max_health));
            }
            true
        });

        let dealt = damage.min(self.health);
        self.health -= dealt;
        dealt
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            name: self.name,
            tier: self.tier,
            health: self.health,
            max_health: self.max_health,
            position: self.position,
            path_index: self.path_index,
            effects: self.effects.keys().copied().collect(),
            flash: self.flash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_defence_catalog::{instantiate_enemy, path};
    use anime_defence_core::Difficulty;

    const FRAME: Duration = Duration::from_nanos(16_666_667);

    fn boss() -> EnemyState {
        let instance = instantiate_enemy("dragonball", EnemyTier::Boss, 1, Difficulty::Easy)
            .expect("boss template");
        EnemyState::spawn(EnemyId::new(0), instance)
    }

    #[test]
    fn poison_ticks_once_per_second_until_expiry() {
        let mut enemy = boss();
        enemy.speed = 0.0;
        let mut now = Duration::ZERO;
        enemy.apply_effect(EffectKind::Poison, Duration::from_secs(5), now);

        let mut ticks = 0;
        for _ in 0..400 {
            now += FRAME;
            if enemy.advance(&[], now) > 0 {
                ticks += 1;
            }
        }

        assert!((4..=5).contains(&ticks), "ticks {ticks}");
        assert_eq!(enemy.health, 300 - ticks * 15);
        assert!(enemy.effects.is_empty());
    }

    #[test]
    fn effect_damage_never_drops_health_below_zero() {
        let mut enemy = boss();
        enemy.health = 4;
        enemy.apply_effect(EffectKind::Bleed, Duration::from_secs(3), Duration::ZERO);

        assert_eq!(enemy.advance(&[], FRAME), 4);
        assert_eq!(enemy.health, 0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn reapplying_effect_extends_without_restarting() {
        let mut enemy = boss();
        enemy.apply_effect(EffectKind::Poison, Duration::from_secs(5), Duration::ZERO);
        enemy.apply_effect(EffectKind::Poison, Duration::from_secs(5), Duration::from_secs(2));

        let effect = enemy.effects[&EffectKind::Poison];
        assert_eq!(effect.started, Duration::ZERO);
        assert_eq!(effect.expires, Duration::from_secs(7));
    }

    #[test]
    fn enemy_walks_path_and_reaches_end() {
        let waypoints = path("dragonball");
        let instance = instantiate_enemy("dragonball", EnemyTier::Elite, 1, Difficulty::Easy)
            .expect("elite template");
        let mut enemy = EnemyState::spawn(EnemyId::new(1), instance);

        let mut frames = 0;
        while !enemy.reached_end && frames < 10_000 {
            let _ = enemy.advance(waypoints, FRAME * frames);
            frames += 1;
        }

        assert!(enemy.reached_end);
        assert_eq!(enemy.path_index, waypoints.len());
        assert!(enemy.position.distance_to(waypoints[waypoints.len() - 1]) < ARRIVAL_THRESHOLD);
    }

    #[test]
    fn damage_saturates_and_flashes() {
        let mut enemy = boss();
        assert_eq!(enemy.take_damage(1_000), 300);
        assert_eq!(enemy.health, 0);
        assert_eq!(enemy.flash, DAMAGE_FLASH_FRAMES);
    }

    #[test]
    fn dead_enemies_are_inert() {
        let mut enemy = boss();
        let _ = enemy.take_damage(300);
        let before = enemy.position;
        assert_eq!(enemy.advance(path("dragonball"), FRAME), 0);
        assert_eq!(enemy.position, before);
        assert_eq!(enemy.phase, 0);
    }
}
