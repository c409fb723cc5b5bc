//! Per-map enemy rosters and instance scaling.

use anime_defence_core::{Difficulty, EnemyTier, Position};

/// Coordinate every enemy enters the map from, just left of the surface.
pub const ENEMY_SPAWN: Position = Position::new(-30.0, 300.0);

/// Health growth applied per wave after the first.
const WAVE_HEALTH_GROWTH: f64 = 0.1;

/// Base statistics of an enemy tier on a specific map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTemplate {
    /// Display name of the enemy.
    pub name: &'static str,
    /// Health before difficulty and wave scaling.
    pub base_health: u32,
    /// Movement speed in path units per frame before the global step factor.
    pub base_speed: f32,
    /// Reward before difficulty and wave scaling.
    pub base_reward: u32,
}

/// Concrete enemy statistics produced for a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyInstance {
    /// Display name of the enemy.
    pub name: &'static str,
    /// Tier of the enemy.
    pub tier: EnemyTier,
    /// Scaled maximum health, never zero.
    pub max_health: u32,
    /// Movement speed, unaffected by scaling.
    pub speed: f32,
    /// Scaled reward credited when the enemy is defeated.
    pub reward: u32,
    /// Spawn coordinate.
    pub position: Position,
}

const fn t(
    name: &'static str,
    base_health: u32,
    base_speed: f32,
    base_reward: u32,
) -> EnemyTemplate {
    EnemyTemplate {
        name,
        base_health,
        base_speed,
        base_reward,
    }
}

/// Rosters ordered basic, strong, elite, boss.
static ROSTERS: [(&str, [EnemyTemplate; 4]); 6] = [
    (
        "dragonball",
        [
            t("Saibaman", 20, 2.0, 1),
            t("Frieza Soldier", 50, 1.5, 3),
            t("Ginyu Force", 100, 2.5, 5),
            t("Cell Jr", 300, 1.0, 15),
        ],
    ),
    (
        "naruto",
        [
            t("Rogue Ninja", 25, 2.2, 1),
            t("Sound Four", 60, 1.8, 3),
            t("Akatsuki Member", 120, 2.3, 5),
            t("Tailed Beast", 350, 0.8, 15),
        ],
    ),
    (
        "bleach",
        [
            t("Hollow", 22, 2.1, 1),
            t("Arrancar", 55, 1.7, 3),
            t("Espada", 110, 2.4, 5),
            t("Menos Grande", 320, 0.9, 15),
        ],
    ),
    (
        "onepiece",
        [
            t("Marine Grunt", 18, 2.3, 1),
            t("Pirate Captain", 45, 2.0, 3),
            t("Shichibukai", 95, 2.6, 5),
            t("Yonko Commander", 280, 1.2, 15),
        ],
    ),
    (
        "jojo",
        [
            t("Stand User", 28, 1.9, 1),
            t("Pillar Man", 65, 1.6, 3),
            t("DIO Follower", 115, 2.2, 5),
            t("Ultimate Being", 400, 1.1, 15),
        ],
    ),
    (
        "aot",
        [
            t("Pure Titan", 35, 1.5, 1),
            t("Abnormal Titan", 70, 1.9, 3),
            t("Shifter Titan", 130, 2.1, 5),
            t("Colossal Titan", 450, 0.7, 15),
        ],
    ),
];

/// Looks up the template for an enemy tier on the provided map.
#[must_use]
pub fn enemy_template(map_id: &str, tier: EnemyTier) -> Option<&'static EnemyTemplate> {
    let (_, roster) = ROSTERS.iter().find(|(id, _)| *id == map_id)?;
    let index = match tier {
        EnemyTier::Basic => 0,
        EnemyTier::Strong => 1,
        EnemyTier::Elite => 2,
        EnemyTier::Boss => 3,
    };
    roster.get(index)
}

/// Builds the statistics of an enemy released during `wave`.
///
/// Health and reward are multiplied by the difficulty multiplier and by
/// `1 + 0.1 × (wave − 1)`, then floored. Speed is never scaled.
#[must_use]
pub fn instantiate_enemy(
    map_id: &str,
    tier: EnemyTier,
    wave: u32,
    difficulty: Difficulty,
) -> Option<EnemyInstance> {
    let template = enemy_template(map_id, tier)?;
    let factor = scaling_factor(wave, difficulty);
    Some(EnemyInstance {
        name: template.name,
        tier,
        max_health: scale(template.base_health, factor).max(1),
        speed: template.base_speed,
        reward: scale(template.base_reward, factor),
        position: ENEMY_SPAWN,
    })
}

fn scaling_factor(wave: u32, difficulty: Difficulty) -> f64 {
    let wave_factor = 1.0 + WAVE_HEALTH_GROWTH * f64::from(wave.saturating_sub(1));
    difficulty.health_multiplier() * wave_factor
}

fn scale(base: u32, factor: f64) -> u32 {
    let scaled = (f64::from(base) * factor).floor();
    if scaled <= 0.0 {
        0
    } else {
        scaled.min(f64::from(u32::MAX)) as u32
    }
}
