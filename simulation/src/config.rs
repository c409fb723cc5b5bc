//! Tunable session parameters.

use std::time::Duration;

use anime_defence_system_wave_director::Config as DirectorConfig;
use serde::{Deserialize, Serialize};

/// Parameters of a simulation; every field falls back to its default when
/// omitted from a configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of every random draw made by the simulation.
    pub seed: u64,
    /// Spendable currency at the start of each session.
    pub starting_currency: u32,
    /// Seconds of frame time between autosaves.
    pub autosave_interval_secs: u64,
    /// Milliseconds between two enemy releases of a wave.
    pub release_interval_ms: u64,
    /// Milliseconds between a cleared field and the next wave.
    pub wave_delay_ms: u64,
    /// Milliseconds between session start and the first wave.
    pub first_wave_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_currency: 100,
            autosave_interval_secs: 30,
            release_interval_ms: 300,
            wave_delay_ms: 2_000,
            first_wave_delay_ms: 1_000,
        }
    }
}

impl SimulationConfig {
    /// Frame time between autosaves.
    #[must_use]
    pub const fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub(crate) const fn director(&self) -> DirectorConfig {
        DirectorConfig::new(
            Duration::from_millis(self.first_wave_delay_ms),
            Duration::from_millis(self.wave_delay_ms),
            Duration::from_millis(self.release_interval_ms),
            self.seed,
        )
    }
}
