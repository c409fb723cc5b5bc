//! Unattended placement of inventory units next to the enemy path.

use anime_defence_catalog::{
    distance_to_path, is_valid_placement, path, PATH_BUFFER, PLACEMENT_BOUNDS,
};
use anime_defence_core::{PlacementError, Position, UnitId, RANGE_SCALE};
use anime_defence_simulation::Simulation;
use anime_defence_world::query;

const GRID_STEP: f32 = 20.0;
/// Candidates further than this from the path are never used.
const REACH: f32 = PATH_BUFFER + 40.0;
/// Reach of a starter unit with a low range roll.
const COVER_RADIUS: f32 = 2.0 * RANGE_SCALE;
const SAMPLE_STEP: f32 = 10.0;

/// Precomputed placement spots for a map, closest to the path first.
#[derive(Clone, Debug)]
pub(crate) struct AutoPlacer {
    candidates: Vec<Position>,
}

impl AutoPlacer {
    /// Scans the placement bounds of `map_id` for valid spots.
    ///
    /// Spots that see the most of the path come first, nearer ones break ties.
    pub(crate) fn new(map_id: &str) -> Self {
        let samples = path_samples(map_id);
        let (min_x, min_y, max_x, max_y) = PLACEMENT_BOUNDS;
        let mut scored = Vec::new();
        let mut y = min_y;
        while y <= max_y {
            let mut x = min_x;
            while x <= max_x {
                let position = Position::new(x, y);
                if is_valid_placement(position, map_id) {
                    let distance = distance_to_path(position, map_id).unwrap_or(0.0);
                    if distance <= REACH {
                        let covered = samples
                            .iter()
                            .filter(|sample| position.distance_to(**sample) <= COVER_RADIUS)
                            .count();
                        scored.push((covered, distance, position));
                    }
                }
                x += GRID_STEP;
            }
            y += GRID_STEP;
        }
        scored.sort_by(|left, right| right.0.cmp(&left.0).then(left.1.total_cmp(&right.1)));

        Self {
            candidates: scored.into_iter().map(|(_, _, position)| position).collect(),
        }
    }

    /// Places every affordable unit the profile can still field.
    ///
    /// Returns how many units were placed.
    pub(crate) fn place(&self, simulation: &mut Simulation) -> usize {
        if !query::is_running(simulation.world()) {
            return 0;
        }

        let world = simulation.world();
        let units: Vec<UnitId> = simulation
            .profile()
            .available_units(|template| query::placed_count(world, template))
            .iter()
            .map(|unit| unit.id)
            .collect();

        let mut placed = 0;
        for id in units {
            if simulation.select_unit(id).is_err() {
                continue;
            }
            for position in &self.candidates {
                match simulation.place_selected(*position) {
                    Ok(_) => placed += 1,
                    Err(PlacementError::TooCloseToUnit | PlacementError::InvalidPosition) => {}
                    Err(reason) => {
                        log::debug!("auto-placement of unit {} stopped: {reason}", id.get());
                        break;
                    }
                }
            }
        }
        placed
    }
}

/// Points every [`SAMPLE_STEP`] units along the path, end point included.
fn path_samples(map_id: &str) -> Vec<Position> {
    let waypoints = path(map_id);
    let mut samples = Vec::new();
    for segment in waypoints.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let steps = (start.distance_to(end) / SAMPLE_STEP).floor() as u32;
        for step in 0..steps {
            let t = step as f32 / steps as f32;
            samples.push(Position::new(
                start.x() + (end.x() - start.x()) * t,
                start.y() + (end.y() - start.y()) * t,
            ));
        }
    }
    samples.extend(waypoints.last().copied());
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_defence_core::Difficulty;
    use anime_defence_simulation::SimulationConfig;

    #[test]
    fn candidates_are_valid_and_near_the_path() {
        let placer = AutoPlacer::new("naruto");
        assert!(!placer.candidates.is_empty());

        for position in &placer.candidates {
            assert!(is_valid_placement(*position, "naruto"));
            let distance = distance_to_path(*position, "naruto").expect("known map");
            assert!(distance <= REACH);
        }
    }

    #[test]
    fn inner_corners_are_preferred_over_outer_ones() {
        let placer = AutoPlacer::new("dragonball");
        assert_eq!(placer.candidates[0], Position::new(150.0, 250.0));
        assert_eq!(placer.candidates[1], Position::new(650.0, 250.0));
    }

    #[test]
    fn path_samples_cover_every_segment() {
        let samples = path_samples("dragonball");
        assert_eq!(samples.first(), Some(&Position::new(0.0, 300.0)));
        assert_eq!(samples.last(), Some(&Position::new(800.0, 200.0)));
        assert_eq!(samples.len(), 151);
        assert!(path_samples("hogwarts").is_empty());
    }

    #[test]
    fn placement_spends_the_starting_currency() {
        let mut simulation = Simulation::new(SimulationConfig::default(), None);
        simulation.start("dragonball", Difficulty::Easy);

        let placed = AutoPlacer::new("dragonball").place(&mut simulation);
        assert_eq!(placed, 2);
        assert_eq!(query::currency(simulation.world()), 0);
        assert_eq!(query::unit_view(simulation.world()).len(), 2);
    }

    #[test]
    fn nothing_is_placed_outside_a_session() {
        let mut simulation = Simulation::new(SimulationConfig::default(), None);
        assert_eq!(AutoPlacer::new("dragonball").place(&mut simulation), 0);
    }
}
