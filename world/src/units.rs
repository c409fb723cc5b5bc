//! Placed unit state and placement identifier allocation.

use std::{collections::BTreeMap, time::Duration};

use anime_defence_core::{EnemyId, PlacementId, Position, Unit, UnitSnapshot, ANIMATION_CYCLE};

/// Minimum distance between two placed units.
pub(crate) const MIN_UNIT_SPACING: f32 = 40.0;

/// Unit cloned onto the map together with its combat bookkeeping.
#[derive(Clone, Debug)]
pub(crate) struct PlacedUnit {
    pub(crate) id: PlacementId,
    pub(crate) unit: Unit,
    pub(crate) position: Position,
    pub(crate) phase: u32,
    pub(crate) last_action: Option<Duration>,
    pub(crate) target: Option<EnemyId>,
}

impl PlacedUnit {
    /// Advances the animation phase of attacking units.
    pub(crate) fn advance(&mut self) {
        if !self.unit.support {
            self.phase = (self.phase + 1) % ANIMATION_CYCLE;
        }
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            unit: self.unit.id,
            template: self.unit.template.clone(),
            name: self.unit.name.clone(),
            rarity: self.unit.rarity,
            position: self.position,
            stats: self.unit.stats,
            traits: self.unit.traits.clone(),
            ability_levels: self.unit.abilities.iter().map(|ability| ability.level).collect(),
            phase: self.phase,
            last_action: self.last_action,
            target: self.target,
            support: self.unit.support,
            income: self.unit.income,
        }
    }
}

/// Registry that stores placed units and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct UnitRegistry {
    entries: BTreeMap<PlacementId, PlacedUnit>,
    next_placement_id: PlacementId,
}

impl UnitRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_placement_id: PlacementId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, unit: Unit, position: Position) -> PlacementId {
        let id = self.next_placement_id;
        self.next_placement_id = PlacementId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            PlacedUnit {
                id,
                unit,
                position,
                phase: 0,
                last_action: None,
                target: None,
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, id: PlacementId) -> Option<PlacedUnit> {
        self.entries.remove(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PlacementId) -> Option<&mut PlacedUnit> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PlacedUnit> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlacedUnit> {
        self.entries.values_mut()
    }

    /// Number of placed units created from the provided template.
    pub(crate) fn placed_count(&self, template: &str) -> u32 {
        let count = self
            .iter()
            .filter(|placed| placed.unit.template == template)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub(crate) fn has_godly(&self) -> bool {
        self.iter().any(|placed| placed.unit.is_godly())
    }

    pub(crate) fn crowds(&self, position: Position) -> bool {
        self.iter()
            .any(|placed| placed.position.distance_to(position) < MIN_UNIT_SPACING)
    }
}
