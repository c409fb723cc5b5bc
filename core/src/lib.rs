#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Anime Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Anime Defence.";

/// Width of the logical drawing surface measured in map units.
pub const SURFACE_WIDTH: f32 = 800.0;

/// Height of the logical drawing surface measured in map units.
pub const SURFACE_HEIGHT: f32 = 600.0;

/// Number of map units covered by a single point of unit range.
pub const RANGE_SCALE: f32 = 30.0;

/// Length of the period between two damage ticks of an active effect.
pub const EFFECT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Width of the window at the start of each period in which an effect deals damage.
pub const EFFECT_TICK_WINDOW: Duration = Duration::from_millis(50);

/// Minimum simulated time a support unit waits between two income payouts.
pub const INCOME_INTERVAL: Duration = Duration::from_secs(1);

/// Number of animation frames in a full enemy or unit animation cycle.
pub const ANIMATION_CYCLE: u32 = 60;

/// Location on the map expressed in logical surface units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from raw coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Computes the Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Unique identifier assigned to an enemy by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier of a unit owned by the player profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier allocated by the world to a unit placed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacementId(u32);

impl PlacementId {
    /// Creates a new placement identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Gacha rarity tier of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Most frequent tier.
    Common,
    /// Second tier.
    Uncommon,
    /// Third tier.
    Rare,
    /// Fourth tier.
    Epic,
    /// Fifth tier.
    Legendary,
    /// Rarest tier.
    Mythical,
}

impl Rarity {
    /// Every rarity ordered from most to least common.
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythical,
    ];

    /// Inclusive-exclusive range of the multiplier applied to base stats.
    ///
    /// The ranges widen monotonically from `common` to `mythical`.
    #[must_use]
    pub const fn stat_multiplier_range(self) -> (f64, f64) {
        match self {
            Self::Common => (0.8, 1.2),
            Self::Uncommon => (1.0, 1.4),
            Self::Rare => (1.2, 1.6),
            Self::Epic => (1.4, 1.8),
            Self::Legendary => (1.6, 2.0),
            Self::Mythical => (1.8, 2.5),
        }
    }

    /// Lower-case identifier used in save files and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Mythical => "mythical",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength tier of an enemy within a map's roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyTier {
    /// Weakest and most common enemy.
    Basic,
    /// Tougher enemy introduced from wave 5.
    Strong,
    /// Elite enemy introduced from wave 15 and on boss waves.
    Elite,
    /// Boss enemy spawned once on every tenth wave.
    Boss,
}

impl EnemyTier {
    /// Every tier ordered from weakest to strongest.
    pub const ALL: [EnemyTier; 4] = [
        EnemyTier::Basic,
        EnemyTier::Strong,
        EnemyTier::Elite,
        EnemyTier::Boss,
    ];

    /// Lower-case identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Strong => "strong",
            Self::Elite => "elite",
            Self::Boss => "boss",
        }
    }
}

/// Difficulty tier selected when starting a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Baseline difficulty.
    Easy,
    /// One and a half times tougher enemies.
    Medium,
    /// Twice as tough enemies.
    Hard,
    /// Three times tougher enemies.
    Expert,
    /// Four times tougher enemies.
    Godly,
    /// Five times tougher enemies and a single life.
    Impossible,
}

impl Difficulty {
    /// Every difficulty ordered from easiest to hardest.
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Godly,
        Difficulty::Impossible,
    ];

    /// Multiplier applied to enemy health and kill rewards.
    #[must_use]
    pub const fn health_multiplier(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.5,
            Self::Hard => 2.0,
            Self::Expert => 3.0,
            Self::Godly => 4.0,
            Self::Impossible => 5.0,
        }
    }

    /// Lives granted when a session starts.
    #[must_use]
    pub const fn starting_lives(self) -> u32 {
        match self {
            Self::Easy => 20,
            Self::Medium => 15,
            Self::Hard => 10,
            Self::Expert => 8,
            Self::Godly => 5,
            Self::Impossible => 1,
        }
    }

    /// Multiplier applied to the end-of-session payout.
    #[must_use]
    pub const fn reward_multiplier(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.2,
            Self::Hard => 1.5,
            Self::Expert => 2.0,
            Self::Godly => 2.5,
            Self::Impossible => 3.0,
        }
    }

    /// Lower-case identifier accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
            Self::Godly => "godly",
            Self::Impossible => "impossible",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown difficulty name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownDifficulty(value.to_owned()))
    }
}

/// Timed damage-over-time effect that attacks may inflict on enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    /// Deals five percent of maximum health per second.
    Poison,
    /// Deals three percent of maximum health per second.
    Bleed,
}

impl EffectKind {
    /// Damage dealt by a single tick of the effect, never less than one.
    #[must_use]
    pub fn damage_per_tick(self, max_health: u32) -> u32 {
        let percent = match self {
            Self::Poison => 5,
            Self::Bleed => 3,
        };
        let scaled = u64::from(max_health) * percent / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    }
}

/// Effect an attack inflicts together with its duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InflictedEffect {
    /// Kind of effect applied to the target.
    pub kind: EffectKind,
    /// Time the effect stays active once applied.
    pub duration: Duration,
}

/// Modifier a unit may carry after spending a trait chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitTrait {
    /// +10% attack speed.
    #[serde(rename = "speedy_1")]
    Speedy1,
    /// +20% attack speed.
    #[serde(rename = "speedy_2")]
    Speedy2,
    /// +30% attack speed.
    #[serde(rename = "speedy_3")]
    Speedy3,
    /// +10% damage.
    #[serde(rename = "powerful_1")]
    Powerful1,
    /// +20% damage.
    #[serde(rename = "powerful_2")]
    Powerful2,
    /// +30% damage.
    #[serde(rename = "powerful_3")]
    Powerful3,
    /// +10% range.
    #[serde(rename = "distance_1")]
    Distance1,
    /// +20% range.
    #[serde(rename = "distance_2")]
    Distance2,
    /// +30% range.
    #[serde(rename = "distance_3")]
    Distance3,
    /// +30% damage.
    #[serde(rename = "rage")]
    Rage,
    /// Doubles support income.
    #[serde(rename = "greed")]
    Greed,
    /// +50% range.
    #[serde(rename = "sniper")]
    Sniper,
    /// +70% damage and inflicts bleed.
    #[serde(rename = "bloodthirsty")]
    Bloodthirsty,
    /// Inflicts poison.
    #[serde(rename = "poisoned")]
    Poisoned,
    /// +150% damage.
    #[serde(rename = "wrecking_ball")]
    WreckingBall,
    /// +400% damage, triples cost, exclusive and unique per session.
    #[serde(rename = "godly")]
    Godly,
}

impl UnitTrait {
    /// Multiplier applied to attack damage while the trait is held.
    #[must_use]
    pub const fn damage_multiplier(self) -> f64 {
        match self {
            Self::Powerful1 => 1.1,
            Self::Powerful2 => 1.2,
            Self::Powerful3 | Self::Rage => 1.3,
            Self::Bloodthirsty => 1.7,
            Self::WreckingBall => 2.5,
            Self::Godly => 5.0,
            _ => 1.0,
        }
    }

    /// Effect inflicted on the target of every attack, if any.
    #[must_use]
    pub const fn inflicted_effect(self) -> Option<InflictedEffect> {
        match self {
            Self::Bloodthirsty => Some(InflictedEffect {
                kind: EffectKind::Bleed,
                duration: Duration::from_secs(3),
            }),
            Self::Poisoned => Some(InflictedEffect {
                kind: EffectKind::Poison,
                duration: Duration::from_secs(5),
            }),
            _ => None,
        }
    }

    /// Multiplier applied to support income while the trait is held.
    #[must_use]
    pub const fn income_multiplier(self) -> u32 {
        match self {
            Self::Greed => 2,
            _ => 1,
        }
    }

    /// Human-readable trait name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Speedy1 => "Speedy I",
            Self::Speedy2 => "Speedy II",
            Self::Speedy3 => "Speedy III",
            Self::Powerful1 => "Powerful I",
            Self::Powerful2 => "Powerful II",
            Self::Powerful3 => "Powerful III",
            Self::Distance1 => "Distance I",
            Self::Distance2 => "Distance II",
            Self::Distance3 => "Distance III",
            Self::Rage => "Rage",
            Self::Greed => "Greed",
            Self::Sniper => "Sniper",
            Self::Bloodthirsty => "Bloodthirsty",
            Self::Poisoned => "Poisoned",
            Self::WreckingBall => "Wrecking Ball",
            Self::Godly => "Godly",
        }
    }
}

/// Reasons a trait application may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum TraitError {
    /// The unit already carries the rolled trait.
    #[error("unit already has this trait")]
    AlreadyApplied,
    /// The unit carries `godly`, which forecloses every other trait.
    #[error("unit already has the godly trait")]
    GodlyLocked,
}

/// Combat statistics of a unit instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Base damage dealt by a single attack.
    pub power: u32,
    /// Targeting range in abstract units, see [`RANGE_SCALE`].
    pub range: u32,
    /// Attacks per second.
    pub speed: u32,
}

impl UnitStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(power: u32, range: u32, speed: u32) -> Self {
        Self {
            power,
            range,
            speed,
        }
    }

    /// Targeting radius expressed in map units.
    #[must_use]
    pub fn range_radius(&self) -> f32 {
        self.range as f32 * RANGE_SCALE
    }

    /// Minimum simulated time between two attacks.
    ///
    /// A speed of zero is treated as one attack per second.
    #[must_use]
    pub fn attack_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.speed.max(1)))
    }
}

/// Damage bonus contributed by every ability level.
pub const ABILITY_LEVEL_BONUS: f64 = 0.2;

/// Upgradeable ability owned by a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ability {
    /// Display name of the ability.
    pub name: String,
    /// Current level, starting at one.
    pub level: u32,
    /// Highest level the ability can reach.
    pub max_level: u32,
}

/// Damage multiplier granted by an ability at the provided level.
#[must_use]
pub fn ability_damage_factor(level: u32) -> f64 {
    1.0 + f64::from(level) * ABILITY_LEVEL_BONUS
}

/// A concrete unit instance owned by the player.
///
/// Inventory units carry no position; the world clones them into placements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Identifier allocated by the profile.
    pub id: UnitId,
    /// Key of the catalog template the unit was created from.
    pub template: String,
    /// Display name copied from the template.
    pub name: String,
    /// Rarity rolled for the unit.
    pub rarity: Rarity,
    /// Maximum number of simultaneously placed instances of the template.
    pub max_placement: u32,
    /// Session currency spent when placing the unit.
    pub cost: u32,
    /// Rolled combat statistics.
    pub stats: UnitStats,
    /// Abilities cycled through while attacking.
    pub abilities: Vec<Ability>,
    /// Traits in the order they were applied.
    #[serde(default)]
    pub traits: Vec<UnitTrait>,
    /// Whether the unit generates income instead of attacking.
    #[serde(default)]
    pub support: bool,
    /// Currency generated per second by support units.
    #[serde(default)]
    pub income: u32,
}

impl Unit {
    /// Reports whether the unit carries the provided trait.
    #[must_use]
    pub fn has_trait(&self, candidate: UnitTrait) -> bool {
        self.traits.contains(&candidate)
    }

    /// Reports whether the unit carries the exclusive `godly` trait.
    #[must_use]
    pub fn is_godly(&self) -> bool {
        self.has_trait(UnitTrait::Godly)
    }

    /// Checks whether the trait could be applied without mutating the unit.
    pub fn can_apply_trait(&self, candidate: UnitTrait) -> Result<(), TraitError> {
        if self.has_trait(candidate) {
            return Err(TraitError::AlreadyApplied);
        }
        if candidate != UnitTrait::Godly && self.is_godly() {
            return Err(TraitError::GodlyLocked);
        }
        Ok(())
    }

    /// Applies a trait following the exclusivity rules.
    ///
    /// `godly` replaces every previously applied trait and triples the cost.
    pub fn apply_trait(&mut self, candidate: UnitTrait) -> Result<(), TraitError> {
        self.can_apply_trait(candidate)?;
        if candidate == UnitTrait::Godly {
            self.traits.clear();
            self.cost = self.cost.saturating_mul(3);
        }
        self.traits.push(candidate);
        Ok(())
    }
}

/// Applies every trait income multiplier to a base income rate.
#[must_use]
pub fn income_with_traits(base: u32, traits: &[UnitTrait]) -> u32 {
    traits
        .iter()
        .fold(base, |amount, held| amount.saturating_mul(held.income_multiplier()))
}

/// Reasons a unit placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// No session is running.
    #[error("no session is running")]
    SessionInactive,
    /// The position overlaps the path buffer or leaves the playable bounds.
    #[error("cannot place unit here")]
    InvalidPosition,
    /// Another placed unit is too close to the requested position.
    #[error("too close to another unit")]
    TooCloseToUnit,
    /// Every placement slot of the unit's template is in use.
    #[error("placement limit reached for this unit")]
    PlacementLimitReached,
    /// Another placed unit already carries the `godly` trait.
    #[error("only one godly unit allowed")]
    GodlyLimitReached,
    /// The session balance does not cover the unit's cost.
    #[error("not enough yen")]
    InsufficientFunds,
    /// No unit is selected for placement.
    #[error("no unit selected")]
    NothingSelected,
}

/// Reward summary computed when a session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Wave reached when the session ended.
    pub wave: u32,
    /// Enemies defeated during the session.
    pub enemies_defeated: u32,
    /// Yen granted to the profile.
    pub yen_earned: u32,
    /// Experience granted to the profile.
    pub xp_gained: u32,
    /// Trait chips granted to the profile.
    pub chips_gained: u32,
    /// Stat rerolls granted to the profile.
    pub rerolls_gained: u32,
}

impl SessionSummary {
    /// Computes the payout for a session.
    ///
    /// Yen and experience scale with defeated enemies and the difficulty's
    /// reward multiplier; one chip is granted every ten waves and one reroll
    /// every five.
    #[must_use]
    pub fn compute(wave: u32, enemies_defeated: u32, difficulty: Difficulty) -> Self {
        let scaled = (f64::from(enemies_defeated) * difficulty.reward_multiplier()).floor();
        let earned = if scaled <= 0.0 {
            0
        } else {
            scaled.min(f64::from(u32::MAX)) as u32
        };
        Self {
            wave,
            enemies_defeated,
            yen_earned: earned,
            xp_gained: earned,
            chips_gained: wave / 10,
            rerolls_gained: wave / 5,
        }
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a new session, discarding any previous session state.
    StartSession {
        /// Identifier of the map to play on.
        map: String,
        /// Difficulty tier of the session.
        difficulty: Difficulty,
        /// Spendable currency available when the session starts.
        starting_currency: u32,
    },
    /// Advances the session by one frame.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Pauses or resumes the running session.
    SetPaused {
        /// Whether the session should be paused.
        paused: bool,
    },
    /// Requests placement of a copy of an inventory unit.
    PlaceUnit {
        /// Unit to clone into the placement.
        unit: Unit,
        /// Requested map position.
        position: Position,
    },
    /// Requests removal of a placed unit.
    RemoveUnit {
        /// Placement to remove.
        placement: PlacementId,
    },
    /// Records the enemy a placed unit is tracking.
    AssignTarget {
        /// Placement whose target changes.
        placement: PlacementId,
        /// New target, or `None` to clear it.
        target: Option<EnemyId>,
    },
    /// Applies the outcome of a unit attack to its target.
    ResolveAttack {
        /// Attacking placement.
        placement: PlacementId,
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Integer damage dealt.
        damage: u32,
        /// Effects inflicted by the attack.
        effects: Vec<InflictedEffect>,
    },
    /// Pays out the income of a support unit.
    GrantIncome {
        /// Paying placement.
        placement: PlacementId,
        /// Currency granted.
        amount: u32,
    },
    /// Releases an enemy of the provided tier at the path start.
    SpawnEnemy {
        /// Tier of the released enemy.
        tier: EnemyTier,
    },
    /// Increments the wave counter.
    AdvanceWave,
    /// Ends the session and computes its payout.
    EndSession,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A session started.
    SessionStarted {
        /// Map being played.
        map: String,
        /// Difficulty of the session.
        difficulty: Difficulty,
        /// Lives available at the start.
        lives: u32,
    },
    /// The session clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The session was paused or resumed.
    PauseChanged {
        /// Whether the session is now paused.
        paused: bool,
    },
    /// An enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Tier of the enemy.
        tier: EnemyTier,
    },
    /// An enemy lost health.
    EnemyDamaged {
        /// Damaged enemy.
        enemy: EnemyId,
        /// Health removed.
        amount: u32,
        /// Health left after the damage.
        remaining: u32,
    },
    /// An enemy was defeated and removed.
    EnemyDefeated {
        /// Defeated enemy.
        enemy: EnemyId,
        /// Currency and experience credited for the kill.
        reward: u32,
    },
    /// An enemy reached the end of the path and cost a life.
    EnemyEscaped {
        /// Escaped enemy.
        enemy: EnemyId,
        /// Lives left after the escape.
        lives_remaining: u32,
    },
    /// A unit was placed on the map.
    UnitPlaced {
        /// Identifier allocated to the placement.
        placement: PlacementId,
        /// Inventory unit that was cloned.
        unit: UnitId,
        /// Position of the placement.
        position: Position,
        /// Currency spent.
        cost: u32,
    },
    /// A placement request was rejected.
    UnitPlacementRejected {
        /// Inventory unit that was requested.
        unit: UnitId,
        /// Requested position.
        position: Position,
        /// Reason the request failed.
        reason: PlacementError,
    },
    /// A placed unit was removed.
    UnitRemoved {
        /// Removed placement.
        placement: PlacementId,
    },
    /// A placed unit attacked an enemy.
    UnitAttacked {
        /// Attacking placement.
        placement: PlacementId,
        /// Target of the attack.
        enemy: EnemyId,
        /// Damage dealt.
        damage: u32,
    },
    /// A support unit generated income.
    IncomeGenerated {
        /// Paying placement.
        placement: PlacementId,
        /// Currency granted.
        amount: u32,
    },
    /// The wave counter advanced.
    WaveAdvanced {
        /// New wave number.
        wave: u32,
    },
    /// The session ended.
    SessionEnded {
        /// Payout computed for the session.
        summary: SessionSummary,
    },
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Display name taken from the map roster.
    pub name: &'static str,
    /// Tier of the enemy.
    pub tier: EnemyTier,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Current map position.
    pub position: Position,
    /// Index of the waypoint the enemy is walking towards.
    pub path_index: usize,
    /// Effects currently active on the enemy.
    pub effects: Vec<EffectKind>,
    /// Frames left on the damage flash.
    pub flash: u8,
}

impl EnemySnapshot {
    /// Reports whether the enemy can still be targeted.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Read-only snapshot describing every active enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a placed unit used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Identifier allocated to the placement.
    pub id: PlacementId,
    /// Inventory unit the placement was cloned from.
    pub unit: UnitId,
    /// Template key of the unit.
    pub template: String,
    /// Display name of the unit.
    pub name: String,
    /// Rarity of the unit.
    pub rarity: Rarity,
    /// Position on the map.
    pub position: Position,
    /// Combat statistics.
    pub stats: UnitStats,
    /// Traits in application order.
    pub traits: Vec<UnitTrait>,
    /// Levels of the unit's abilities in order.
    pub ability_levels: Vec<u32>,
    /// Animation phase in `0..ANIMATION_CYCLE`.
    pub phase: u32,
    /// Session time of the last attack or income payout.
    pub last_action: Option<Duration>,
    /// Enemy currently tracked by the unit.
    pub target: Option<EnemyId>,
    /// Whether the unit generates income instead of attacking.
    pub support: bool,
    /// Base income per payout.
    pub income: u32,
}

/// Read-only snapshot describing every placed unit.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in ascending placement order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no placement was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}
