#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistent player progression for Anime Defence.
//!
//! The profile outlives sessions: it owns the unit inventory, the yen balance,
//! experience and levels, and the trait chip and stat reroll credits spent on
//! inventory units. [`ProfileStore`] persists it as JSON.

mod store;

use anime_defence_catalog::STARTER_TEMPLATE;
use anime_defence_core::{Rarity, SessionSummary, TraitError, Unit, UnitId, UnitTrait};
use anime_defence_system_roller::{create_unit, reroll_stats, roll_trait, roll_unit};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use store::{ProfileStore, SaveRecord, StoreError, SAVE_FILE};

/// Yen charged for a single gacha pull.
pub const ROLL_COST: u32 = 500;

/// Yen balance of a freshly created profile.
pub const STARTING_YEN: u32 = 500;

/// Experience required to advance past the provided level.
#[must_use]
pub fn xp_requirement(level: u32) -> u32 {
    match level {
        0..=1 => 1_000,
        2 => 5_000,
        3 => 10_000,
        4 => 15_000,
        5 => 20_000,
        6..=10 => 20_000 + (level - 5) * 5_000,
        _ => 45_000u32.saturating_add((level - 10).saturating_mul(10_000)),
    }
}

/// Reasons a profile operation may be refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The yen balance does not cover the requested amount.
    #[error("not enough yen: {needed} needed, {available} available")]
    InsufficientYen {
        /// Amount requested.
        needed: u32,
        /// Balance at the time of the request.
        available: u32,
    },
    /// No trait chip is left.
    #[error("not enough trait chips")]
    NoTraitChips,
    /// No stat reroll is left.
    #[error("not enough stat rerolls")]
    NoStatRerolls,
    /// The inventory holds no unit with the identifier.
    #[error("unit {0:?} is not in the inventory")]
    UnknownUnit(UnitId),
    /// The unit's template is missing from the catalog.
    #[error("unknown unit template `{0}`")]
    UnknownTemplate(String),
    /// The rolled trait could not be applied.
    #[error(transparent)]
    Trait(#[from] TraitError),
}

/// Player progression carried across sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    level: u32,
    xp: u32,
    yen: u32,
    trait_chips: u32,
    stat_rerolls: u32,
    inventory: Vec<Unit>,
    selected: Option<UnitId>,
    next_unit_id: u32,
}

impl Default for Profile {
    /// Profile with starting balances and an empty inventory.
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            yen: STARTING_YEN,
            trait_chips: 0,
            stat_rerolls: 0,
            inventory: Vec::new(),
            selected: None,
            next_unit_id: 0,
        }
    }
}

impl Profile {
    /// Creates a fresh profile holding the common starter unit.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut profile = Self::default();
        profile.ensure_starter_unit(rng);
        profile
    }

    /// Adds the common starter unit when the inventory is empty.
    pub fn ensure_starter_unit<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.inventory.is_empty() {
            return;
        }
        let id = self.allocate_unit_id();
        if let Some(unit) = create_unit(STARTER_TEMPLATE, Some(Rarity::Common), id, rng) {
            self.inventory.push(unit);
        }
    }

    /// Current level, starting at one.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated towards the next level.
    #[must_use]
    pub const fn xp(&self) -> u32 {
        self.xp
    }

    /// Yen balance.
    #[must_use]
    pub const fn yen(&self) -> u32 {
        self.yen
    }

    /// Trait chips available.
    #[must_use]
    pub const fn trait_chips(&self) -> u32 {
        self.trait_chips
    }

    /// Stat rerolls available.
    #[must_use]
    pub const fn stat_rerolls(&self) -> u32 {
        self.stat_rerolls
    }

    /// Owned units.
    #[must_use]
    pub fn inventory(&self) -> &[Unit] {
        &self.inventory
    }

    /// Looks up an owned unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.inventory.iter().find(|unit| unit.id == id)
    }

    /// Unit selected for placement, if it is still owned.
    #[must_use]
    pub fn selected_unit(&self) -> Option<&Unit> {
        self.selected.and_then(|id| self.unit(id))
    }

    /// Grants experience, levelling up as many times as the total allows.
    ///
    /// Every level gained adds one trait chip and one stat reroll. Returns the
    /// number of levels gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        loop {
            let required = xp_requirement(self.level);
            if self.xp < required {
                break;
            }
            self.xp -= required;
            self.level = self.level.saturating_add(1);
            self.trait_chips = self.trait_chips.saturating_add(1);
            self.stat_rerolls = self.stat_rerolls.saturating_add(1);
            gained += 1;
            log::info!("level up: now level {}", self.level);
        }
        gained
    }

    /// Adds yen to the balance.
    pub fn gain_yen(&mut self, amount: u32) {
        self.yen = self.yen.saturating_add(amount);
    }

    /// Removes yen from the balance if it covers the amount.
    pub fn spend_yen(&mut self, amount: u32) -> Result<(), ProfileError> {
        if self.yen < amount {
            return Err(ProfileError::InsufficientYen {
                needed: amount,
                available: self.yen,
            });
        }
        self.yen -= amount;
        Ok(())
    }

    /// Buys a gacha pull and adds the unit to the inventory.
    pub fn roll_unit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Unit, ProfileError> {
        self.spend_yen(ROLL_COST)?;
        let id = self.allocate_unit_id();
        let Some(unit) = roll_unit(id, rng) else {
            self.gain_yen(ROLL_COST);
            return Err(ProfileError::UnknownTemplate(STARTER_TEMPLATE.to_owned()));
        };

        log::info!("rolled {} {} ({})", unit.rarity, unit.name, unit.template);
        self.inventory.push(unit);
        let index = self.inventory.len() - 1;
        Ok(&self.inventory[index])
    }

    /// Spends a trait chip to apply a random trait to an owned unit.
    ///
    /// A rolled duplicate is refused without consuming the chip.
    pub fn apply_random_trait<R: Rng + ?Sized>(
        &mut self,
        id: UnitId,
        rng: &mut R,
    ) -> Result<UnitTrait, ProfileError> {
        let chips = self.trait_chips;
        let unit = self
            .inventory
            .iter_mut()
            .find(|unit| unit.id == id)
            .ok_or(ProfileError::UnknownUnit(id))?;
        if chips == 0 {
            return Err(ProfileError::NoTraitChips);
        }
        if unit.is_godly() {
            return Err(ProfileError::Trait(TraitError::GodlyLocked));
        }

        let rolled = roll_trait(rng);
        unit.apply_trait(rolled)?;
        self.trait_chips -= 1;
        log::debug!("applied {} to {}", rolled.display_name(), unit.name);
        Ok(rolled)
    }

    /// Spends a stat reroll to regenerate an owned unit's stats.
    pub fn reroll_stats<R: Rng + ?Sized>(
        &mut self,
        id: UnitId,
        rng: &mut R,
    ) -> Result<(), ProfileError> {
        let rerolls = self.stat_rerolls;
        let unit = self
            .inventory
            .iter_mut()
            .find(|unit| unit.id == id)
            .ok_or(ProfileError::UnknownUnit(id))?;
        if rerolls == 0 {
            return Err(ProfileError::NoStatRerolls);
        }
        if !reroll_stats(unit, rng) {
            return Err(ProfileError::UnknownTemplate(unit.template.clone()));
        }
        self.stat_rerolls -= 1;
        Ok(())
    }

    /// Applies the rewards of a finished session.
    pub fn apply_payout(&mut self, summary: &SessionSummary) {
        self.gain_yen(summary.yen_earned);
        let _ = self.gain_xp(summary.xp_gained);
        self.trait_chips = self.trait_chips.saturating_add(summary.chips_gained);
        self.stat_rerolls = self.stat_rerolls.saturating_add(summary.rerolls_gained);
    }

    /// Selects an owned unit for placement.
    pub fn select_unit(&mut self, id: UnitId) -> Result<(), ProfileError> {
        if self.unit(id).is_none() {
            return Err(ProfileError::UnknownUnit(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Removes a unit from the inventory, clearing the selection if needed.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.inventory.iter().position(|unit| unit.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.inventory.remove(index))
    }

    /// Owned units whose template still has free placement slots.
    ///
    /// `placed_count` reports how many units of a template are on the map.
    pub fn available_units<F>(&self, placed_count: F) -> Vec<&Unit>
    where
        F: Fn(&str) -> u32,
    {
        self.inventory
            .iter()
            .filter(|unit| placed_count(&unit.template) < unit.max_placement)
            .collect()
    }

    fn allocate_unit_id(&mut self) -> UnitId {
        let floor = self
            .inventory
            .iter()
            .map(|unit| unit.id.get().saturating_add(1))
            .max()
            .unwrap_or(0);
        let id = self.next_unit_id.max(floor);
        self.next_unit_id = id.saturating_add(1);
        UnitId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::mock::StepRng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn xp_curve_matches_level_bands() {
        assert_eq!(xp_requirement(1), 1_000);
        assert_eq!(xp_requirement(2), 5_000);
        assert_eq!(xp_requirement(5), 20_000);
        assert_eq!(xp_requirement(6), 25_000);
        assert_eq!(xp_requirement(10), 45_000);
        assert_eq!(xp_requirement(11), 55_000);
    }

    #[test]
    fn fresh_profile_holds_common_starter() {
        let profile = Profile::new(&mut rng());
        assert_eq!(profile.level(), 1);
        assert_eq!(profile.yen(), STARTING_YEN);
        assert_eq!(profile.inventory().len(), 1);
        assert_eq!(profile.inventory()[0].template, STARTER_TEMPLATE);
        assert_eq!(profile.inventory()[0].rarity, Rarity::Common);
    }

    #[test]
    fn xp_grants_cascade_across_levels() {
        let mut profile = Profile::new(&mut rng());
        let gained = profile.gain_xp(1_000 + 5_000 + 10_000 + 7);
        assert_eq!(gained, 3);
        assert_eq!(profile.level(), 4);
        assert_eq!(profile.xp(), 7);
        assert_eq!(profile.trait_chips(), 3);
        assert_eq!(profile.stat_rerolls(), 3);
        assert!(profile.xp() < xp_requirement(profile.level()));
    }

    #[test]
    fn rolling_costs_yen_and_adds_unit() {
        let mut rng = rng();
        let mut profile = Profile::new(&mut rng);
        let rolled = profile.roll_unit(&mut rng).expect("first roll").id;
        assert_eq!(profile.yen(), 0);
        assert_eq!(profile.inventory().len(), 2);
        assert_ne!(rolled, profile.inventory()[0].id);

        assert_eq!(
            profile.roll_unit(&mut rng).map(|unit| unit.id),
            Err(ProfileError::InsufficientYen {
                needed: ROLL_COST,
                available: 0,
            })
        );
        assert_eq!(profile.inventory().len(), 2);
    }

    #[test]
    fn trait_application_consumes_one_chip() {
        let mut rng = rng();
        let mut profile = Profile::new(&mut rng);
        let id = profile.inventory()[0].id;
        assert_eq!(
            profile.apply_random_trait(id, &mut rng),
            Err(ProfileError::NoTraitChips)
        );

        let _ = profile.gain_xp(1_000);
        let rolled = profile.apply_random_trait(id, &mut rng).expect("applied");
        assert_eq!(profile.trait_chips(), 0);
        assert!(profile.unit(id).expect("owned").has_trait(rolled));
    }

    #[test]
    fn duplicate_trait_keeps_the_chip() {
        let mut rng = rng();
        let mut profile = Profile::new(&mut rng);
        let id = profile.inventory()[0].id;
        let _ = profile.gain_xp(1_000 + 5_000 + 10_000 + 15_000 + 20_000);
        let chips = profile.trait_chips();

        let mut outcomes = Vec::new();
        for _ in 0..chips {
            outcomes.push(profile.apply_random_trait(id, &mut rng));
        }
        let spent = outcomes.iter().filter(|outcome| outcome.is_ok()).count() as u32;
        assert_eq!(profile.trait_chips(), chips - spent);
        for outcome in outcomes.iter().filter(|outcome| outcome.is_err()) {
            assert!(matches!(outcome, Err(ProfileError::Trait(_))));
        }
    }

    #[test]
    fn godly_units_refuse_further_traits() {
        let mut rng = rng();
        let mut profile = Profile::new(&mut rng);
        let id = profile.inventory()[0].id;
        profile.inventory[0]
            .apply_trait(UnitTrait::Godly)
            .expect("godly");
        let _ = profile.gain_xp(1_000);
        assert_eq!(
            profile.apply_random_trait(id, &mut rng),
            Err(ProfileError::Trait(TraitError::GodlyLocked))
        );
        assert_eq!(profile.trait_chips(), 1);
    }

    #[test]
    fn godly_roll_replaces_traits_and_triples_cost() {
        let mut profile = Profile::new(&mut rng());
        let id = profile.inventory()[0].id;
        profile.inventory[0]
            .apply_trait(UnitTrait::Powerful1)
            .expect("first trait");
        let cost = profile.inventory()[0].cost;
        let _ = profile.gain_xp(1_000);

        let mut lowest_roll = StepRng::new(0, 0);
        assert_eq!(
            profile.apply_random_trait(id, &mut lowest_roll),
            Ok(UnitTrait::Godly)
        );
        let unit = profile.unit(id).expect("owned");
        assert_eq!(unit.traits, vec![UnitTrait::Godly]);
        assert_eq!(unit.cost, cost * 3);
        assert_eq!(profile.trait_chips(), 0);
    }

    #[test]
    fn reroll_requires_credit() {
        let mut rng = rng();
        let mut profile = Profile::new(&mut rng);
        let id = profile.inventory()[0].id;
        assert_eq!(
            profile.reroll_stats(id, &mut rng),
            Err(ProfileError::NoStatRerolls)
        );
        let _ = profile.gain_xp(1_000);
        profile.reroll_stats(id, &mut rng).expect("rerolled");
        assert_eq!(profile.stat_rerolls(), 0);
        assert_eq!(
            profile.reroll_stats(UnitId::new(99), &mut rng),
            Err(ProfileError::UnknownUnit(UnitId::new(99)))
        );
    }

    #[test]
    fn payout_adds_every_reward() {
        let mut profile = Profile::new(&mut rng());
        profile.apply_payout(&SessionSummary {
            wave: 12,
            enemies_defeated: 20,
            yen_earned: 30,
            xp_gained: 1_030,
            chips_gained: 1,
            rerolls_gained: 2,
        });
        assert_eq!(profile.yen(), STARTING_YEN + 30);
        assert_eq!(profile.level(), 2);
        assert_eq!(profile.xp(), 30);
        assert_eq!(profile.trait_chips(), 2);
        assert_eq!(profile.stat_rerolls(), 3);
    }

    #[test]
    fn removing_selected_unit_clears_selection() {
        let mut profile = Profile::new(&mut rng());
        let id = profile.inventory()[0].id;
        profile.select_unit(id).expect("owned");
        assert_eq!(profile.selected_unit().map(|unit| unit.id), Some(id));
        assert!(profile.remove_unit(id).is_some());
        assert!(profile.selected_unit().is_none());
        assert_eq!(
            profile.select_unit(id),
            Err(ProfileError::UnknownUnit(id))
        );
    }

    #[test]
    fn available_units_respect_placement_caps() {
        let profile = Profile::new(&mut rng());
        let cap = profile.inventory()[0].max_placement;
        assert_eq!(profile.available_units(|_| 0).len(), 1);
        assert!(profile.available_units(|_| cap).is_empty());
    }
}
