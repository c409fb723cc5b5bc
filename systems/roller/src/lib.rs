#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted random draws backing the gacha, trait chips and stat rerolls.
//!
//! Every function takes the random source explicitly so callers decide how
//! draws are seeded; sessions and tests use `rand_chacha` for replayable
//! sequences.

use anime_defence_catalog::{template_pool, unit_template, UnitTemplate, STARTER_TEMPLATE};
use anime_defence_core::{Rarity, Unit, UnitId, UnitStats, UnitTrait};
use rand::{seq::SliceRandom, Rng};

/// Cumulative upper bounds of a `[0, 100)` draw, rarest tier first.
const RARITY_THRESHOLDS: [(f64, Rarity); 5] = [
    (0.01, Rarity::Mythical),
    (1.0, Rarity::Legendary),
    (5.0, Rarity::Epic),
    (15.0, Rarity::Rare),
    (25.0, Rarity::Uncommon),
];

const GODLY_THRESHOLD: f64 = 0.1;

/// Cumulative trait bands below the godly threshold, with their candidates.
const TRAIT_BANDS: [(f64, [UnitTrait; 3]); 4] = [
    (
        1.0,
        [
            UnitTrait::Bloodthirsty,
            UnitTrait::Poisoned,
            UnitTrait::WreckingBall,
        ],
    ),
    (5.0, [UnitTrait::Rage, UnitTrait::Greed, UnitTrait::Sniper]),
    (
        15.0,
        [
            UnitTrait::Speedy3,
            UnitTrait::Powerful3,
            UnitTrait::Distance3,
        ],
    ),
    (
        18.0,
        [
            UnitTrait::Speedy2,
            UnitTrait::Powerful2,
            UnitTrait::Distance2,
        ],
    ),
];

const COMMON_TRAITS: [UnitTrait; 3] = [
    UnitTrait::Speedy1,
    UnitTrait::Powerful1,
    UnitTrait::Distance1,
];

/// Draws a rarity tier from the gacha distribution.
pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
    let roll: f64 = rng.gen_range(0.0..100.0);
    RARITY_THRESHOLDS
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map_or(Rarity::Common, |(_, rarity)| *rarity)
}

/// Draws the trait granted by spending a trait chip.
pub fn roll_trait<R: Rng + ?Sized>(rng: &mut R) -> UnitTrait {
    let roll: f64 = rng.gen_range(0.0..100.0);
    if roll < GODLY_THRESHOLD {
        return UnitTrait::Godly;
    }

    let candidates = TRAIT_BANDS
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map_or(&COMMON_TRAITS, |(_, candidates)| candidates);
    candidates
        .choose(rng)
        .copied()
        .unwrap_or(UnitTrait::Powerful1)
}

/// Scales every base stat by an independent draw from the rarity's range.
pub fn generate_unit_stats<R: Rng + ?Sized>(
    base: UnitStats,
    rarity: Rarity,
    rng: &mut R,
) -> UnitStats {
    let (min, max) = rarity.stat_multiplier_range();
    let mut scale = |value: u32| -> u32 {
        let multiplier: f64 = rng.gen_range(min..max);
        let scaled = (f64::from(value) * multiplier).floor();
        if scaled <= 0.0 {
            0
        } else {
            scaled.min(f64::from(u32::MAX)) as u32
        }
    };

    let power = scale(base.power);
    let range = scale(base.range);
    let speed = scale(base.speed);
    UnitStats::new(power, range, speed)
}

/// Creates a unit instance from a template.
///
/// The template's own rarity is used when `rarity` is `None`.
pub fn create_unit<R: Rng + ?Sized>(
    template_id: &str,
    rarity: Option<Rarity>,
    id: UnitId,
    rng: &mut R,
) -> Option<Unit> {
    let template = unit_template(template_id)?;
    Some(instantiate(template, rarity.unwrap_or(template.rarity), id, rng))
}

/// Performs a full gacha pull: rarity, then a template from that rarity's pool.
///
/// Falls back to a common starter unit if the pool cannot be resolved.
pub fn roll_unit<R: Rng + ?Sized>(id: UnitId, rng: &mut R) -> Option<Unit> {
    let rarity = roll_rarity(rng);
    let picked = template_pool(rarity)
        .choose(rng)
        .and_then(|template_id| unit_template(template_id));

    match picked {
        Some(template) => Some(instantiate(template, rarity, id, rng)),
        None => create_unit(STARTER_TEMPLATE, Some(Rarity::Common), id, rng),
    }
}

/// Regenerates the stats of a unit from its template and current rarity.
///
/// Returns `false` when the unit's template is unknown.
pub fn reroll_stats<R: Rng + ?Sized>(unit: &mut Unit, rng: &mut R) -> bool {
    let Some(template) = unit_template(&unit.template) else {
        return false;
    };
    unit.stats = generate_unit_stats(template.base_stats, unit.rarity, rng);
    true
}

fn instantiate<R: Rng + ?Sized>(
    template: &UnitTemplate,
    rarity: Rarity,
    id: UnitId,
    rng: &mut R,
) -> Unit {
    Unit {
        id,
        template: template.id.to_owned(),
        name: template.name.to_owned(),
        rarity,
        max_placement: template.max_placement,
        cost: template.cost,
        stats: generate_unit_stats(template.base_stats, rarity, rng),
        abilities: template
            .abilities
            .iter()
            .map(|ability| ability.instantiate())
            .collect(),
        traits: Vec::new(),
        support: template.income.is_some(),
        income: template.income.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rarity_frequencies_follow_gacha_rates() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let draws = 100_000;
        let mut counts = [0_u32; 6];
        for _ in 0..draws {
            let rarity = roll_rarity(&mut rng);
            let index = Rarity::ALL
                .iter()
                .position(|candidate| *candidate == rarity)
                .expect("known rarity");
            counts[index] += 1;
        }

        let expected = [0.75, 0.10, 0.10, 0.04, 0.0099, 0.0001];
        for (index, share) in expected.iter().enumerate() {
            let observed = f64::from(counts[index]) / f64::from(draws);
            assert!(
                (observed - share).abs() < 0.006,
                "{:?}: observed {observed}, expected {share}",
                Rarity::ALL[index]
            );
        }
    }

    #[test]
    fn stats_stay_within_rarity_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let base = UnitStats::new(25, 8, 15);
        for _ in 0..1_000 {
            let stats = generate_unit_stats(base, Rarity::Mythical, &mut rng);
            assert!((45..=62).contains(&stats.power), "power {}", stats.power);
            assert!((14..=20).contains(&stats.range), "range {}", stats.range);
            assert!((27..=37).contains(&stats.speed), "speed {}", stats.speed);
        }
    }

    #[test]
    fn zero_base_stays_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let stats = generate_unit_stats(UnitStats::new(0, 0, 0), Rarity::Epic, &mut rng);
        assert_eq!(stats, UnitStats::new(0, 0, 0));
    }

    #[test]
    fn rolled_units_come_from_the_rarity_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(97);
        for index in 0..500 {
            let unit = roll_unit(UnitId::new(index), &mut rng).expect("unit");
            assert!(template_pool(unit.rarity).contains(&unit.template.as_str()));
            assert_eq!(unit.abilities.len(), 4);
            assert!(unit.traits.is_empty());
        }
    }

    #[test]
    fn create_unit_defaults_to_template_rarity() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let unit = create_unit("speedwagon", None, UnitId::new(1), &mut rng).expect("speedwagon");
        assert_eq!(unit.rarity, Rarity::Uncommon);
        assert!(unit.support);
        assert_eq!(unit.income, 2);
        assert!(create_unit("saitama", None, UnitId::new(2), &mut rng).is_none());
    }

    #[test]
    fn reroll_replaces_stats_from_template() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut unit = create_unit("zoro", None, UnitId::new(1), &mut rng).expect("zoro");
        unit.stats = UnitStats::new(999, 999, 999);
        assert!(reroll_stats(&mut unit, &mut rng));
        assert!(unit.stats.power < 999);

        unit.template = "unknown".to_owned();
        assert!(!reroll_stats(&mut unit, &mut rng));
    }

    #[test]
    fn trait_rolls_favour_tier_one_traits() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let draws = 20_000;
        let tier_one = (0..draws)
            .map(|_| roll_trait(&mut rng))
            .filter(|rolled| COMMON_TRAITS.contains(rolled))
            .count();
        let share = tier_one as f64 / f64::from(draws);
        assert!((share - 0.82).abs() < 0.02, "tier one share {share}");
    }
}
