#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Anime Defence adapters.
//!
//! Frames are drawn onto an abstract [`DrawSurface`] measured in logical
//! units of an 800×600 play field. Backends only provide the primitives and
//! scale them onto their window.

use std::time::Duration;

use anime_defence_catalog::{map, Rgb};
use anime_defence_core::{
    EffectKind, EnemyId, EnemySnapshot, EnemyTier, Position, UnitSnapshot, UnitTrait,
    SURFACE_HEIGHT, SURFACE_WIDTH,
};
use anyhow::Result as AnyResult;
use glam::Vec2;

/// How long an attack line stays visible after the attack.
pub const ATTACK_LINE_DURATION: Duration = Duration::from_millis(200);

const PATH_WIDTH: f32 = 40.0;
const PATH_SHADOW_WIDTH: f32 = 42.0;
const PATH_MARKER_RADIUS: f32 = 20.0;
const UNIT_RADIUS: f32 = 15.0;
const ENEMY_RADIUS: f32 = 12.0;
const BOSS_RADIUS: f32 = 25.0;
const HEALTH_BAR_WIDTH: f32 = 30.0;
const HEALTH_BAR_HEIGHT: f32 = 4.0;
const HEALTH_BAR_OFFSET: f32 = 25.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_hex(value: u32) -> Self {
        Self::from_rgb_u8((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Returns a lighter variant of the color by blending towards white.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let blend = |channel: f32| channel + (1.0 - channel) * amount;
        Self {
            red: blend(self.red),
            green: blend(self.green),
            blue: blend(self.blue),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

/// Palette shared by every backend.
pub mod palette {
    use super::Color;
    use anime_defence_core::{EnemyTier, Rarity};

    /// Background used for maps missing from the registry.
    pub const UNKNOWN_MAP: Color = Color::from_hex(0x2c3e50);
    /// Drop shadow under the path.
    pub const PATH_SHADOW: Color = Color::new(0.0, 0.0, 0.0, 0.3);
    /// Start-of-path marker.
    pub const PATH_START: Color = Color::from_hex(0x27ae60);
    /// End-of-path marker.
    pub const PATH_END: Color = Color::from_hex(0xe74c3c);
    /// Outline drawn around every unit.
    pub const UNIT_OUTLINE: Color = Color::from_hex(0xffffff);
    /// Range ring drawn while a unit holds a target.
    pub const RANGE_RING: Color = Color::new(1.0, 1.0, 1.0, 0.3);
    /// Line drawn between a unit and the enemy it just attacked.
    pub const ATTACK_LINE: Color = Color::new(1.0, 100.0 / 255.0, 100.0 / 255.0, 0.8);
    /// Marker above income-generating units.
    pub const SUPPORT_MARKER: Color = Color::from_hex(0xf1c40f);
    /// Halo around godly units.
    pub const GODLY_HALO: Color = Color::from_hex(0xffd700);
    /// Tint of poisoned enemies.
    pub const POISONED: Color = Color::from_hex(0x27ae60);
    /// Tint of bleeding enemies.
    pub const BLEEDING: Color = Color::from_hex(0x8b0000);
    /// Body color of an enemy while its damage flash is active.
    pub const DAMAGE_FLASH: Color = Color::from_hex(0xffffff);
    /// Background of enemy health bars.
    pub const HEALTH_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 0.5);
    /// Health bar above half health.
    pub const HEALTH_HIGH: Color = Color::from_hex(0x27ae60);
    /// Health bar above a quarter of health.
    pub const HEALTH_MEDIUM: Color = Color::from_hex(0xf39c12);
    /// Health bar at a quarter of health or below.
    pub const HEALTH_LOW: Color = Color::from_hex(0xe74c3c);

    /// Display color of a rarity tier.
    #[must_use]
    pub const fn rarity(rarity: Rarity) -> Color {
        match rarity {
            Rarity::Common => Color::from_hex(0xbdc3c7),
            Rarity::Uncommon => Color::from_hex(0x27ae60),
            Rarity::Rare => Color::from_hex(0x3498db),
            Rarity::Epic => Color::from_hex(0x9b59b6),
            Rarity::Legendary => Color::from_hex(0xf39c12),
            Rarity::Mythical => Color::from_hex(0xe74c3c),
        }
    }

    /// Body color of an enemy tier.
    #[must_use]
    pub const fn enemy_tier(tier: EnemyTier) -> Color {
        match tier {
            EnemyTier::Basic => Color::from_hex(0xe74c3c),
            EnemyTier::Strong => Color::from_hex(0xf39c12),
            EnemyTier::Elite => Color::from_hex(0x9b59b6),
            EnemyTier::Boss => Color::from_hex(0x2c3e50),
        }
    }
}

/// Primitive drawing operations in logical surface units.
pub trait DrawSurface {
    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Strokes the outline of a circle.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color);

    /// Strokes a straight line segment.
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);

    /// Fills an axis-aligned rectangle anchored at its top-left corner.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
}

/// Status shown next to the play field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Current wave.
    pub wave: u32,
    /// Lives left.
    pub lives: u32,
    /// Spendable session currency.
    pub currency: u32,
    /// Profile yen balance.
    pub yen: u32,
    /// Whether the session is paused.
    pub paused: bool,
    /// Whether a session is running.
    pub running: bool,
    /// Labels of the inventory slots selectable by number keys.
    pub roster: Vec<String>,
    /// Index of the selected roster slot.
    pub selected_slot: Option<usize>,
    /// Transient message such as a placement rejection.
    pub message: Option<String>,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Identifier of the map being played.
    pub map_id: String,
    /// Session clock at the time of the snapshot.
    pub clock: Duration,
    /// Placed units in placement order.
    pub units: Vec<UnitSnapshot>,
    /// Enemies on the map sorted by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Status panel contents.
    pub hud: Hud,
}

impl Scene {
    /// Creates an empty scene for the provided map.
    #[must_use]
    pub fn new(map_id: impl Into<String>) -> Self {
        Self {
            map_id: map_id.into(),
            ..Self::default()
        }
    }

    fn enemy(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
            .map(|index| &self.enemies[index])
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Click position in logical surface units, if the play field was clicked.
    pub click: Option<Vec2>,
    /// Roster slot chosen on this frame.
    pub select_slot: Option<usize>,
    /// Whether pause was toggled on this frame.
    pub toggle_pause: bool,
    /// Whether the player asked to quit.
    pub quit: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame outside the play field.
    pub clear_color: Color,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Anime Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Draws a complete frame of the play field.
pub fn draw_frame<S: DrawSurface + ?Sized>(surface: &mut S, scene: &Scene) {
    let definition = map(&scene.map_id);
    let background = definition.map_or(palette::UNKNOWN_MAP, |map| map.background.into());
    surface.fill_rect(
        Vec2::ZERO,
        Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT),
        background,
    );

    if let Some(definition) = definition {
        draw_path(surface, definition.path, definition.path_color.into());
    }
    for unit in &scene.units {
        draw_unit(surface, scene, unit);
    }
    for enemy in scene.enemies.iter().filter(|enemy| enemy.is_alive()) {
        draw_enemy(surface, enemy);
    }
    for enemy in scene.enemies.iter().filter(|enemy| enemy.is_alive()) {
        draw_health_bar(surface, enemy);
    }
}

fn to_vec2(position: Position) -> Vec2 {
    Vec2::new(position.x(), position.y())
}

fn draw_path<S: DrawSurface + ?Sized>(
    surface: &mut S,
    path: &[Position],
    color: Color,
) {
    let points: Vec<Vec2> = path.iter().copied().map(to_vec2).collect();
    let (Some(start), Some(end)) = (points.first(), points.last()) else {
        return;
    };

    for segment in points.windows(2) {
        surface.line(segment[0], segment[1], PATH_SHADOW_WIDTH, palette::PATH_SHADOW);
    }
    for segment in points.windows(2) {
        surface.line(segment[0], segment[1], PATH_WIDTH, color);
    }
    for joint in &points {
        surface.fill_circle(*joint, PATH_WIDTH / 2.0, color);
    }
    surface.fill_circle(*start, PATH_MARKER_RADIUS, palette::PATH_START);
    surface.fill_circle(*end, PATH_MARKER_RADIUS, palette::PATH_END);
}

fn draw_unit<S: DrawSurface + ?Sized>(surface: &mut S, scene: &Scene, unit: &UnitSnapshot) {
    let center = to_vec2(unit.position);
    let target = unit.target.and_then(|id| scene.enemy(id));

    if target.is_some() {
        surface.stroke_circle(center, unit.stats.range_radius(), 1.0, palette::RANGE_RING);
    }

    surface.fill_circle(center, UNIT_RADIUS, palette::rarity(unit.rarity));
    surface.stroke_circle(center, UNIT_RADIUS, 2.0, palette::UNIT_OUTLINE);
    if unit.traits.contains(&UnitTrait::Godly) {
        surface.stroke_circle(center, UNIT_RADIUS + 4.0, 2.0, palette::GODLY_HALO);
    }

    if unit.support {
        surface.fill_circle(center - Vec2::new(0.0, 22.0), 4.0, palette::SUPPORT_MARKER);
        return;
    }

    let recently_attacked = unit
        .last_action
        .map_or(false, |last| scene.clock.saturating_sub(last) < ATTACK_LINE_DURATION);
    if let (true, Some(enemy)) = (recently_attacked, target) {
        surface.line(center, to_vec2(enemy.position), 2.0, palette::ATTACK_LINE);
    }
}

fn enemy_color(enemy: &EnemySnapshot) -> Color {
    if enemy.flash > 0 {
        return palette::DAMAGE_FLASH;
    }
    if enemy.effects.contains(&EffectKind::Bleed) {
        return palette::BLEEDING;
    }
    if enemy.effects.contains(&EffectKind::Poison) {
        return palette::POISONED;
    }
    palette::enemy_tier(enemy.tier)
}

fn enemy_radius(tier: EnemyTier) -> f32 {
    if tier == EnemyTier::Boss {
        BOSS_RADIUS
    } else {
        ENEMY_RADIUS
    }
}

fn draw_enemy<S: DrawSurface + ?Sized>(surface: &mut S, enemy: &EnemySnapshot) {
    surface.fill_circle(
        to_vec2(enemy.position),
        enemy_radius(enemy.tier),
        enemy_color(enemy),
    );
}

/// Color of a health bar filled to the provided fraction.
#[must_use]
pub fn health_color(fraction: f32) -> Color {
    if fraction > 0.5 {
        palette::HEALTH_HIGH
    } else if fraction > 0.25 {
        palette::HEALTH_MEDIUM
    } else {
        palette::HEALTH_LOW
    }
}

fn draw_health_bar<S: DrawSurface + ?Sized>(surface: &mut S, enemy: &EnemySnapshot) {
    let fraction = if enemy.max_health == 0 {
        0.0
    } else {
        enemy.health as f32 / enemy.max_health as f32
    };
    let origin = to_vec2(enemy.position) - Vec2::new(HEALTH_BAR_WIDTH / 2.0, HEALTH_BAR_OFFSET);

    surface.fill_rect(
        origin,
        Vec2::new(HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT),
        palette::HEALTH_BACKGROUND,
    );
    surface.fill_rect(
        origin,
        Vec2::new(HEALTH_BAR_WIDTH * fraction.clamp(0.0, 1.0), HEALTH_BAR_HEIGHT),
        health_color(fraction),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_defence_core::{PlacementId, Rarity, UnitId, UnitStats};

    #[derive(Debug, PartialEq)]
    enum Primitive {
        FillCircle(Vec2, f32, Color),
        StrokeCircle(Vec2, f32, Color),
        Line(Vec2, Vec2, Color),
        FillRect(Vec2, Vec2, Color),
    }

    #[derive(Default)]
    struct RecordingSurface {
        primitives: Vec<Primitive>,
    }

    impl DrawSurface for RecordingSurface {
        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.primitives
                .push(Primitive::FillCircle(center, radius, color));
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, _thickness: f32, color: Color) {
            self.primitives
                .push(Primitive::StrokeCircle(center, radius, color));
        }

        fn line(&mut self, from: Vec2, to: Vec2, _thickness: f32, color: Color) {
            self.primitives.push(Primitive::Line(from, to, color));
        }

        fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
            self.primitives.push(Primitive::FillRect(origin, size, color));
        }
    }

    fn enemy(id: u32, tier: EnemyTier, health: u32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            name: "Titan",
            tier,
            health,
            max_health: 100,
            position: Position::new(300.0, 200.0),
            path_index: 1,
            effects: Vec::new(),
            flash: 0,
        }
    }

    fn unit(target: Option<u32>, last_action: Option<Duration>) -> UnitSnapshot {
        UnitSnapshot {
            id: PlacementId::new(0),
            unit: UnitId::new(0),
            template: "eren".to_owned(),
            name: "Attack Titan".to_owned(),
            rarity: Rarity::Epic,
            position: Position::new(250.0, 250.0),
            stats: UnitStats::new(20, 4, 8),
            traits: Vec::new(),
            ability_levels: vec![1; 4],
            phase: 0,
            last_action,
            target: target.map(EnemyId::new),
            support: false,
            income: 0,
        }
    }

    fn draw(scene: &Scene) -> Vec<Primitive> {
        let mut surface = RecordingSurface::default();
        draw_frame(&mut surface, scene);
        surface.primitives
    }

    #[test]
    fn frame_starts_with_map_background() {
        let primitives = draw(&Scene::new("aot"));
        let background: Color = map("aot").expect("registered").background.into();
        assert_eq!(
            primitives.first(),
            Some(&Primitive::FillRect(
                Vec2::ZERO,
                Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT),
                background
            ))
        );
    }

    #[test]
    fn unknown_map_draws_background_only() {
        let primitives = draw(&Scene::new("atlantis"));
        assert_eq!(primitives.len(), 1);
    }

    #[test]
    fn path_ends_with_start_and_end_markers() {
        let primitives = draw(&Scene::new("dragonball"));
        let markers: Vec<&Primitive> = primitives
            .iter()
            .filter(|primitive| {
                matches!(primitive, Primitive::FillCircle(_, radius, color)
                    if *radius == PATH_MARKER_RADIUS
                        && (*color == palette::PATH_START || *color == palette::PATH_END))
            })
            .collect();
        assert_eq!(
            markers,
            vec![
                &Primitive::FillCircle(
                    Vec2::new(0.0, 300.0),
                    PATH_MARKER_RADIUS,
                    palette::PATH_START
                ),
                &Primitive::FillCircle(
                    Vec2::new(800.0, 200.0),
                    PATH_MARKER_RADIUS,
                    palette::PATH_END
                ),
            ]
        );
    }

    #[test]
    fn attack_line_fades_after_two_hundred_milliseconds() {
        let mut scene = Scene::new("aot");
        scene.enemies = vec![enemy(3, EnemyTier::Basic, 100)];
        scene.units = vec![unit(Some(3), Some(Duration::from_millis(1_000)))];

        scene.clock = Duration::from_millis(1_150);
        let lines = |primitives: Vec<Primitive>| {
            primitives
                .into_iter()
                .filter(|primitive| {
                    matches!(primitive, Primitive::Line(_, _, color) if *color == palette::ATTACK_LINE)
                })
                .count()
        };
        assert_eq!(lines(draw(&scene)), 1);

        scene.clock = Duration::from_millis(1_200);
        assert_eq!(lines(draw(&scene)), 0);
    }

    #[test]
    fn range_ring_only_while_targeting() {
        let mut scene = Scene::new("aot");
        scene.enemies = vec![enemy(3, EnemyTier::Basic, 100)];
        scene.units = vec![unit(None, None)];
        let ring = Primitive::StrokeCircle(Vec2::new(250.0, 250.0), 120.0, palette::RANGE_RING);
        assert!(!draw(&scene).contains(&ring));

        scene.units = vec![unit(Some(3), None)];
        assert!(draw(&scene).contains(&ring));
    }

    #[test]
    fn bosses_are_larger_and_effects_tint_enemies() {
        let mut poisoned = enemy(1, EnemyTier::Basic, 100);
        poisoned.effects = vec![EffectKind::Poison];
        let mut scene = Scene::new("atlantis");
        scene.enemies = vec![poisoned, enemy(2, EnemyTier::Boss, 100)];

        let primitives = draw(&scene);
        assert!(primitives.contains(&Primitive::FillCircle(
            Vec2::new(300.0, 200.0),
            ENEMY_RADIUS,
            palette::POISONED
        )));
        assert!(primitives.contains(&Primitive::FillCircle(
            Vec2::new(300.0, 200.0),
            BOSS_RADIUS,
            palette::enemy_tier(EnemyTier::Boss)
        )));
    }

    #[test]
    fn dead_enemies_are_not_drawn() {
        let mut scene = Scene::new("atlantis");
        scene.enemies = vec![enemy(1, EnemyTier::Basic, 0)];
        assert_eq!(draw(&scene).len(), 1);
    }

    #[test]
    fn health_bar_color_follows_thresholds() {
        assert_eq!(health_color(0.8), palette::HEALTH_HIGH);
        assert_eq!(health_color(0.5), palette::HEALTH_MEDIUM);
        assert_eq!(health_color(0.3), palette::HEALTH_MEDIUM);
        assert_eq!(health_color(0.25), palette::HEALTH_LOW);
    }

    #[test]
    fn health_bar_width_tracks_remaining_health() {
        let mut scene = Scene::new("atlantis");
        scene.enemies = vec![enemy(1, EnemyTier::Basic, 50)];
        let bar = draw(&scene)
            .into_iter()
            .rev()
            .find_map(|primitive| match primitive {
                Primitive::FillRect(_, size, color) if color != palette::HEALTH_BACKGROUND => {
                    Some((size, color))
                }
                _ => None,
            });
        assert_eq!(
            bar,
            Some((Vec2::new(15.0, HEALTH_BAR_HEIGHT), palette::HEALTH_MEDIUM))
        );
    }
}
