//! Map registry: waypoint paths, placement validity and render metadata.

use anime_defence_core::Position;

use crate::Rgb;

/// Minimum distance a placed unit must keep from every path segment.
pub const PATH_BUFFER: f32 = 50.0;

/// Playable rectangle as `(min_x, min_y, max_x, max_y)`, inclusive.
pub const PLACEMENT_BOUNDS: (f32, f32, f32, f32) = (30.0, 30.0, 770.0, 570.0);

/// Visual theme of a map, consumed only by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Sand and rock.
    Desert,
    /// Trees and grass.
    Forest,
    /// Pale spirit lights.
    Spirit,
    /// Open water.
    Ocean,
    /// City blocks.
    Urban,
    /// Walls and towers.
    Fortress,
}

/// Static definition of a playable map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapDefinition {
    /// Identifier used to select the map.
    pub id: &'static str,
    /// Display name of the map.
    pub name: &'static str,
    /// Visual theme of the map.
    pub theme: Theme,
    /// Fill colour of the playfield.
    pub background: Rgb,
    /// Colour of the enemy path.
    pub path_color: Rgb,
    /// Ordered waypoints enemies walk along.
    pub path: &'static [Position],
}

const fn p(x: f32, y: f32) -> Position {
    Position::new(x, y)
}

static MAPS: [MapDefinition; 6] = [
    MapDefinition {
        id: "dragonball",
        name: "Dragon Ball Arena",
        theme: Theme::Desert,
        background: Rgb::from_hex(0xf4d03f),
        path_color: Rgb::from_hex(0xe67e22),
        path: &[
            p(0.0, 300.0),
            p(200.0, 300.0),
            p(200.0, 150.0),
            p(400.0, 150.0),
            p(400.0, 450.0),
            p(600.0, 450.0),
            p(600.0, 200.0),
            p(800.0, 200.0),
        ],
    },
    MapDefinition {
        id: "naruto",
        name: "Hidden Leaf Village",
        theme: Theme::Forest,
        background: Rgb::from_hex(0x27ae60),
        path_color: Rgb::from_hex(0x8b4513),
        path: &[
            p(0.0, 400.0),
            p(150.0, 400.0),
            p(150.0, 200.0),
            p(350.0, 200.0),
            p(350.0, 500.0),
            p(550.0, 500.0),
            p(550.0, 100.0),
            p(800.0, 100.0),
        ],
    },
    MapDefinition {
        id: "bleach",
        name: "Soul Society",
        theme: Theme::Spirit,
        background: Rgb::from_hex(0x8e44ad),
        path_color: Rgb::from_hex(0xecf0f1),
        path: &[
            p(0.0, 250.0),
            p(150.0, 250.0),
            p(150.0, 400.0),
            p(300.0, 400.0),
            p(300.0, 150.0),
            p(500.0, 150.0),
            p(500.0, 350.0),
            p(650.0, 350.0),
            p(650.0, 200.0),
            p(800.0, 200.0),
        ],
    },
    MapDefinition {
        id: "onepiece",
        name: "Grand Line",
        theme: Theme::Ocean,
        background: Rgb::from_hex(0x3498db),
        path_color: Rgb::from_hex(0xf39c12),
        path: &[
            p(0.0, 350.0),
            p(100.0, 350.0),
            p(100.0, 200.0),
            p(250.0, 200.0),
            p(250.0, 450.0),
            p(400.0, 450.0),
            p(400.0, 150.0),
            p(550.0, 150.0),
            p(550.0, 400.0),
            p(700.0, 400.0),
            p(700.0, 250.0),
            p(800.0, 250.0),
        ],
    },
    MapDefinition {
        id: "jojo",
        name: "Bizarre Town",
        theme: Theme::Urban,
        background: Rgb::from_hex(0xe74c3c),
        path_color: Rgb::from_hex(0xf1c40f),
        path: &[
            p(0.0, 300.0),
            p(200.0, 300.0),
            p(200.0, 100.0),
            p(400.0, 100.0),
            p(400.0, 500.0),
            p(600.0, 500.0),
            p(600.0, 300.0),
            p(800.0, 300.0),
        ],
    },
    MapDefinition {
        id: "aot",
        name: "Wall Maria",
        theme: Theme::Fortress,
        background: Rgb::from_hex(0x95a5a6),
        path_color: Rgb::from_hex(0x34495e),
        path: &[
            p(0.0, 300.0),
            p(100.0, 300.0),
            p(100.0, 450.0),
            p(300.0, 450.0),
            p(300.0, 150.0),
            p(500.0, 150.0),
            p(500.0, 400.0),
            p(700.0, 400.0),
            p(700.0, 250.0),
            p(800.0, 250.0),
        ],
    },
];

/// Looks up the definition of a map.
#[must_use]
pub fn map(map_id: &str) -> Option<&'static MapDefinition> {
    MAPS.iter().find(|definition| definition.id == map_id)
}

/// Identifiers of every registered map in registry order.
pub fn map_ids() -> impl Iterator<Item = &'static str> {
    MAPS.iter().map(|definition| definition.id)
}

/// Ordered waypoints of a map, empty for unknown maps.
#[must_use]
pub fn path(map_id: &str) -> &'static [Position] {
    map(map_id).map_or(&[], |definition| definition.path)
}

/// Reports whether a unit may stand at the provided position.
///
/// Points closer than [`PATH_BUFFER`] to any path segment or outside
/// [`PLACEMENT_BOUNDS`] are rejected. Unknown maps only apply the bounds.
#[must_use]
pub fn is_valid_placement(position: Position, map_id: &str) -> bool {
    let (min_x, min_y, max_x, max_y) = PLACEMENT_BOUNDS;
    if position.x() < min_x || position.x() > max_x || position.y() < min_y || position.y() > max_y
    {
        return false;
    }

    path(map_id)
        .windows(2)
        .all(|segment| distance_to_segment(position, segment[0], segment[1]) >= PATH_BUFFER)
}

/// Distance from `position` to the closest point of a map's path.
///
/// Returns `None` for unknown maps and paths without segments.
#[must_use]
pub fn distance_to_path(position: Position, map_id: &str) -> Option<f32> {
    path(map_id)
        .windows(2)
        .map(|segment| distance_to_segment(position, segment[0], segment[1]))
        .reduce(f32::min)
}

fn distance_to_segment(point: Position, start: Position, end: Position) -> f32 {
    let dx = end.x() - start.x();
    let dy = end.y() - start.y();
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return point.distance_to(start);
    }

    let projection = ((point.x() - start.x()) * dx + (point.y() - start.y()) * dy) / length_sq;
    let clamped = projection.clamp(0.0, 1.0);
    let closest = Position::new(start.x() + clamped * dx, start.y() + clamped * dy);
    point.distance_to(closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_map_has_a_traversable_path() {
        for id in map_ids() {
            let waypoints = path(id);
            assert!(waypoints.len() >= 2, "{id} path too short");
            assert!(waypoints[0].x() <= 0.0);
            assert!(waypoints[waypoints.len() - 1].x() >= 800.0);
        }
    }

    #[test]
    fn unknown_map_has_empty_path() {
        assert!(path("hogwarts").is_empty());
        assert!(map("hogwarts").is_none());
    }

    #[test]
    fn placement_on_path_is_rejected() {
        assert!(!is_valid_placement(Position::new(100.0, 300.0), "dragonball"));
        assert!(!is_valid_placement(Position::new(100.0, 340.0), "dragonball"));
    }

    #[test]
    fn placement_clear_of_path_is_accepted() {
        assert!(is_valid_placement(Position::new(100.0, 500.0), "dragonball"));
        assert!(is_valid_placement(Position::new(100.0, 351.0), "dragonball"));
    }

    #[test]
    fn placement_outside_bounds_is_rejected() {
        assert!(!is_valid_placement(Position::new(20.0, 500.0), "dragonball"));
        assert!(!is_valid_placement(Position::new(100.0, 580.0), "dragonball"));
    }

    #[test]
    fn path_distance_uses_the_nearest_segment() {
        let distance = distance_to_path(Position::new(100.0, 355.0), "dragonball");
        assert_eq!(distance, Some(55.0));
        assert_eq!(distance_to_path(Position::new(100.0, 355.0), "hogwarts"), None);
    }

    #[test]
    fn projection_clamps_to_segment_ends() {
        let distance = distance_to_segment(
            Position::new(-30.0, 40.0),
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
        );
        assert!((distance - 50.0).abs() < 1e-4);
    }
}
