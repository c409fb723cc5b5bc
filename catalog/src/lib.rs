#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static data tables backing Anime Defence sessions.
//!
//! The catalog exposes the map registry (paths, placement validity and render
//! metadata), the per-map enemy rosters, and the unit templates the gacha
//! draws from. Every lookup returns `Option` or an empty slice for unknown
//! identifiers; nothing in this crate fails with an error.

mod enemies;
mod maps;
mod units;

pub use enemies::{enemy_template, instantiate_enemy, EnemyInstance, EnemyTemplate, ENEMY_SPAWN};
pub use maps::{
    distance_to_path, is_valid_placement, map, map_ids, path, MapDefinition, Theme, PATH_BUFFER,
    PLACEMENT_BOUNDS,
};
pub use units::{
    template_pool, unit_template, unit_templates, AbilityTemplate, UnitTemplate, STARTER_TEMPLATE,
};

/// Colour stored as packed `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
    /// Creates a colour from a packed hexadecimal literal.
    #[must_use]
    pub const fn from_hex(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        (self.0 & 0xff) as u8
    }
}
