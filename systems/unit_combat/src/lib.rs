#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits attack and income commands for ready units.

use std::time::Duration;

use anime_defence_core::{
    ability_damage_factor, income_with_traits, Command, EnemyView, InflictedEffect, UnitSnapshot,
    UnitView, INCOME_INTERVAL,
};

/// Frames each ability stays active within the animation cycle.
const FRAMES_PER_ABILITY: u32 = 15;

/// Unit combat system that queues attack and income commands for ready units.
#[derive(Debug, Default)]
pub struct UnitCombat {
    scratch: Vec<Command>,
}

impl UnitCombat {
    /// Creates a new unit combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::ResolveAttack` and `Command::GrantIncome` entries.
    ///
    /// `now` is the session clock the unit cooldowns are measured against.
    pub fn handle(
        &mut self,
        now: Duration,
        units: &UnitView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        for unit in units.iter() {
            if unit.support {
                if unit.income > 0 && income_due(unit.last_action, now) {
                    self.scratch.push(Command::GrantIncome {
                        placement: unit.id,
                        amount: income_with_traits(unit.income, &unit.traits),
                    });
                }
                continue;
            }

            let Some(target) = unit.target.and_then(|id| enemies.get(id)) else {
                continue;
            };
            if !target.is_alive() {
                continue;
            }
            if unit.position.distance_to(target.position) > unit.stats.range_radius() {
                continue;
            }
            if !is_ready(unit.last_action, now, unit.stats.attack_interval()) {
                continue;
            }

            self.scratch.push(Command::ResolveAttack {
                placement: unit.id,
                enemy: target.id,
                damage: attack_damage(unit),
                effects: inflicted_effects(unit),
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

/// Computes the damage of a single attack.
///
/// Trait multipliers apply in the order the traits were gained, followed by
/// the bonus of the ability selected by the unit's animation phase.
#[must_use]
pub fn attack_damage(unit: &UnitSnapshot) -> u32 {
    let with_traits = unit
        .traits
        .iter()
        .fold(f64::from(unit.stats.power), |damage, held| {
            damage * held.damage_multiplier()
        });

    let ability_index = (unit.phase / FRAMES_PER_ABILITY).min(3) as usize;
    let factor = unit
        .ability_levels
        .get(ability_index)
        .map_or(1.0, |level| ability_damage_factor(*level));

    let damage = (with_traits * factor).floor();
    if damage <= 0.0 {
        0
    } else {
        damage.min(f64::from(u32::MAX)) as u32
    }
}

fn inflicted_effects(unit: &UnitSnapshot) -> Vec<InflictedEffect> {
    unit.traits
        .iter()
        .filter_map(|held| held.inflicted_effect())
        .collect()
}

fn is_ready(last_action: Option<Duration>, now: Duration, interval: Duration) -> bool {
    last_action.map_or(true, |last| now.saturating_sub(last) >= interval)
}

/// Income is paid once strictly more than [`INCOME_INTERVAL`] has passed.
fn income_due(last_payout: Option<Duration>, now: Duration) -> bool {
    last_payout.map_or(true, |last| now.saturating_sub(last) > INCOME_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_defence_core::{
        EffectKind, EnemyId, EnemySnapshot, EnemyTier, PlacementId, Position, Rarity, UnitId,
        UnitStats, UnitTrait,
    };

    fn attacker(power: u32, speed: u32) -> UnitSnapshot {
        UnitSnapshot {
            id: PlacementId::new(1),
            unit: UnitId::new(1),
            template: "zoro".to_owned(),
            name: "Three Sword Style".to_owned(),
            rarity: Rarity::Rare,
            position: Position::new(100.0, 100.0),
            stats: UnitStats::new(power, 5, speed),
            traits: Vec::new(),
            ability_levels: vec![1, 2, 3, 10],
            phase: 0,
            last_action: None,
            target: Some(EnemyId::new(3)),
            support: false,
            income: 0,
        }
    }

    fn enemies_at(x: f32) -> EnemyView {
        EnemyView::from_snapshots(vec![EnemySnapshot {
            id: EnemyId::new(3),
            name: "Hollow",
            tier: EnemyTier::Basic,
            health: 22,
            max_health: 22,
            position: Position::new(x, 100.0),
            path_index: 2,
            effects: Vec::new(),
            flash: 0,
        }])
    }

    fn run(now: Duration, unit: UnitSnapshot, enemies: &EnemyView) -> Vec<Command> {
        let mut system = UnitCombat::new();
        let mut out = Vec::new();
        system.handle(now, &UnitView::from_snapshots(vec![unit]), enemies, &mut out);
        out
    }

    #[test]
    fn ready_unit_attacks_target_in_range() {
        let out = run(Duration::ZERO, attacker(10, 10), &enemies_at(200.0));
        assert_eq!(
            out,
            vec![Command::ResolveAttack {
                placement: PlacementId::new(1),
                enemy: EnemyId::new(3),
                damage: 12,
                effects: Vec::new(),
            }]
        );
    }

    #[test]
    fn attack_waits_for_cooldown() {
        let mut unit = attacker(10, 10);
        unit.last_action = Some(Duration::from_millis(1_000));

        assert!(run(Duration::from_millis(1_099), unit.clone(), &enemies_at(200.0)).is_empty());
        assert_eq!(run(Duration::from_millis(1_100), unit, &enemies_at(200.0)).len(), 1);
    }

    #[test]
    fn target_out_of_range_is_not_attacked() {
        assert!(run(Duration::ZERO, attacker(10, 10), &enemies_at(251.0)).is_empty());
    }

    #[test]
    fn traits_multiply_in_order_then_ability_bonus() {
        let mut unit = attacker(10, 10);
        unit.traits = vec![UnitTrait::Powerful2, UnitTrait::Bloodthirsty];
        unit.phase = 59;
        assert_eq!(attack_damage(&unit), 61);
    }

    #[test]
    fn phase_selects_ability() {
        let mut unit = attacker(10, 10);
        unit.phase = 15;
        assert_eq!(attack_damage(&unit), 14);
        unit.phase = 30;
        assert_eq!(attack_damage(&unit), 16);
        unit.ability_levels.clear();
        assert_eq!(attack_damage(&unit), 10);
    }

    #[test]
    fn godly_quintuples_damage() {
        let mut unit = attacker(10, 10);
        unit.traits = vec![UnitTrait::Godly];
        assert_eq!(attack_damage(&unit), 60);
    }

    #[test]
    fn effect_traits_inflict_bleed_and_poison() {
        let mut unit = attacker(10, 10);
        unit.traits = vec![UnitTrait::Bloodthirsty, UnitTrait::Poisoned];
        let out = run(Duration::ZERO, unit, &enemies_at(150.0));
        let Some(Command::ResolveAttack { effects, .. }) = out.first() else {
            panic!("expected an attack, got {out:?}");
        };
        let kinds: Vec<EffectKind> = effects.iter().map(|effect| effect.kind).collect();
        assert_eq!(kinds, vec![EffectKind::Bleed, EffectKind::Poison]);
        assert_eq!(effects[0].duration, Duration::from_secs(3));
        assert_eq!(effects[1].duration, Duration::from_secs(5));
    }

    #[test]
    fn support_units_pay_income_once_per_second() {
        let mut unit = attacker(1, 1);
        unit.support = true;
        unit.income = 2;
        unit.target = None;
        unit.traits = vec![UnitTrait::Greed];

        let out = run(Duration::ZERO, unit.clone(), &EnemyView::default());
        assert_eq!(
            out,
            vec![Command::GrantIncome {
                placement: PlacementId::new(1),
                amount: 4,
            }]
        );

        unit.last_action = Some(Duration::from_millis(500));
        assert!(run(Duration::from_millis(1_400), unit.clone(), &EnemyView::default()).is_empty());
        assert!(run(Duration::from_millis(1_500), unit.clone(), &EnemyView::default()).is_empty());
        assert_eq!(run(Duration::from_millis(1_501), unit, &EnemyView::default()).len(), 1);
    }
}
