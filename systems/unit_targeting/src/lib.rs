#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that keeps every attacking unit locked onto an enemy.
//!
//! Targets are sticky: a unit keeps its enemy for as long as that enemy is
//! alive and on the map. Only then does the system search for the nearest live
//! enemy within range, breaking distance ties in favour of the lowest id.

use anime_defence_core::{Command, EnemyId, EnemyView, Position, UnitSnapshot, UnitView};

/// Unit targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct UnitTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl UnitTargeting {
    /// Creates a new unit targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::AssignTarget` for every unit whose target changes.
    pub fn handle(&mut self, units: &UnitView, enemies: &EnemyView, out: &mut Vec<Command>) {
        if units.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for unit in units.iter() {
            if unit.support {
                continue;
            }

            let held = unit
                .target
                .filter(|target| enemies.get(*target).map_or(false, |enemy| enemy.is_alive()));
            if held.is_some() {
                continue;
            }

            let selected = self.nearest_in_range(unit);
            if selected != unit.target {
                out.push(Command::AssignTarget {
                    placement: unit.id,
                    target: selected,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| EnemyCandidate {
                    id: enemy.id,
                    position: enemy.position,
                }),
        );
    }

    fn nearest_in_range(&self, unit: &UnitSnapshot) -> Option<EnemyId> {
        let radius = unit.stats.range_radius();
        let mut best: Option<BestCandidate> = None;

        for candidate in &self.enemy_workspace {
            let distance = unit.position.distance_to(candidate.position);
            if distance > radius {
                continue;
            }

            let current = BestCandidate {
                distance,
                enemy: candidate.id,
            };
            match &mut best {
                Some(existing) => {
                    if current.precedes(existing) {
                        *existing = current;
                    }
                }
                None => best = Some(current),
            }
        }

        best.map(|candidate| candidate.enemy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    enemy: EnemyId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        self.enemy < other.enemy
    }
}
