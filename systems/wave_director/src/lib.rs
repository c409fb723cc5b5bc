#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for emitting enemy spawn commands.
//!
//! The director composes each wave from its number, shuffles the release
//! order, and drains a queue of scheduled releases against its own clock. The
//! clock only advances from `Event::TimeAdvanced`, so a paused session also
//! suspends pending releases and the delay before the next wave.

use std::{collections::VecDeque, time::Duration};

use anime_defence_core::{Command, EnemyTier, Event};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound on the number of enemies in a single wave.
pub const MAX_WAVE_SIZE: u32 = 25;

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    first_wave_delay: Duration,
    wave_delay: Duration,
    release_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration from explicit timings and an RNG seed.
    #[must_use]
    pub const fn new(
        first_wave_delay: Duration,
        wave_delay: Duration,
        release_interval: Duration,
        rng_seed: u64,
    ) -> Self {
        Self {
            first_wave_delay,
            wave_delay,
            release_interval,
            rng_seed,
        }
    }

    /// Default timings: first wave after 1 s, later waves 2 s after the field
    /// clears, one release every 300 ms.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self::new(
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_millis(300),
            rng_seed,
        )
    }
}

/// Number of enemies of every tier released during a wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WaveComposition {
    /// Basic enemies.
    pub basic: u32,
    /// Strong enemies.
    pub strong: u32,
    /// Elite enemies.
    pub elite: u32,
    /// Boss enemies.
    pub boss: u32,
}

impl WaveComposition {
    /// Computes the composition of the provided wave.
    ///
    /// Every tenth wave carries one boss, 30% elites and 40% strong enemies.
    /// Other waves add 30% strong enemies from wave 5 and 20% elites from
    /// wave 15. Basic enemies fill the remainder.
    #[must_use]
    pub fn for_wave(wave: u32) -> Self {
        let total = wave_size(wave);
        let (boss, elite, strong) = if wave > 0 && wave % 10 == 0 {
            (1, total * 3 / 10, total * 4 / 10)
        } else {
            let elite = if wave >= 15 { total * 2 / 10 } else { 0 };
            let strong = if wave >= 5 { total * 3 / 10 } else { 0 };
            (0, elite, strong)
        };

        Self {
            basic: total
                .saturating_sub(boss)
                .saturating_sub(elite)
                .saturating_sub(strong),
            strong,
            elite,
            boss,
        }
    }

    /// Total number of enemies in the wave.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.basic + self.strong + self.elite + self.boss
    }

    fn tiers(&self) -> Vec<EnemyTier> {
        let counts = [
            (EnemyTier::Boss, self.boss),
            (EnemyTier::Elite, self.elite),
            (EnemyTier::Strong, self.strong),
            (EnemyTier::Basic, self.basic),
        ];
        counts
            .into_iter()
            .flat_map(|(tier, count)| std::iter::repeat(tier).take(count as usize))
            .collect()
    }
}

/// Number of enemies in a wave before it is split into tiers.
#[must_use]
pub fn wave_size(wave: u32) -> u32 {
    (5 + wave / 2).min(MAX_WAVE_SIZE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScheduledRelease {
    at: Duration,
    tier: EnemyTier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    Dormant,
    Pending { at: Duration },
    Spawning { queue: VecDeque<ScheduledRelease> },
    Idle,
}

/// Pure system that schedules and releases enemy waves.
#[derive(Debug)]
pub struct WaveDirector {
    config: Config,
    rng: ChaCha8Rng,
    clock: Duration,
    wave: u32,
    phase: Phase,
}

impl WaveDirector {
    /// Creates a new wave director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            clock: Duration::ZERO,
            wave: 1,
            phase: Phase::Dormant,
        }
    }

    /// Wave the director schedules or releases next.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Reports whether a wave is currently being released.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        matches!(self.phase, Phase::Spawning { .. })
    }

    /// Consumes world events and the live enemy count to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], enemy_count: usize, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        let mut advanced = false;
        for event in events {
            match event {
                Event::SessionStarted { .. } => {
                    self.clock = Duration::ZERO;
                    self.wave = 1;
                    self.phase = Phase::Pending {
                        at: self.config.first_wave_delay,
                    };
                    elapsed = Duration::ZERO;
                    advanced = false;
                }
                Event::WaveAdvanced { wave } => self.wave = *wave,
                Event::SessionEnded { .. } => self.phase = Phase::Dormant,
                Event::TimeAdvanced { dt } => {
                    elapsed = elapsed.saturating_add(*dt);
                    advanced = true;
                }
                _ => {}
            }
        }

        if !advanced || self.phase == Phase::Dormant {
            return;
        }

        self.clock = self.clock.saturating_add(elapsed);

        if let Phase::Pending { at } = self.phase {
            if self.clock >= at {
                let _ = self.spawn_wave(self.wave);
            }
        }

        match &mut self.phase {
            Phase::Spawning { queue } => {
                while queue.front().map_or(false, |release| release.at <= self.clock) {
                    if let Some(release) = queue.pop_front() {
                        out.push(Command::SpawnEnemy { tier: release.tier });
                    }
                }
                if queue.is_empty() {
                    self.phase = Phase::Idle;
                }
            }
            Phase::Idle => {
                if enemy_count == 0 {
                    self.wave = self.wave.saturating_add(1);
                    self.phase = Phase::Pending {
                        at: self.clock.saturating_add(self.config.wave_delay),
                    };
                    out.push(Command::AdvanceWave);
                }
            }
            Phase::Dormant | Phase::Pending { .. } => {}
        }
    }

    /// Builds and schedules the release queue of a wave.
    ///
    /// Returns `false` without touching the current queue while another wave
    /// is still being released.
    pub fn spawn_wave(&mut self, wave: u32) -> bool {
        if self.is_spawning() {
            log::debug!("wave {wave} requested while wave {} is still spawning", self.wave);
            return false;
        }

        let composition = WaveComposition::for_wave(wave);
        let mut tiers = composition.tiers();
        tiers.shuffle(&mut self.rng);

        let mut at = self.clock;
        let mut queue = VecDeque::with_capacity(tiers.len());
        for tier in tiers {
            queue.push_back(ScheduledRelease { at, tier });
            at = at.saturating_add(self.config.release_interval);
        }

        log::info!(
            "wave {wave}: {} basic, {} strong, {} elite, {} boss",
            composition.basic,
            composition.strong,
            composition.elite,
            composition.boss
        );
        self.phase = Phase::Spawning { queue };
        true
    }
}
