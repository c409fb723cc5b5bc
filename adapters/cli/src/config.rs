//! Command-line arguments and the optional TOML configuration file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anime_defence_core::Difficulty;
use anime_defence_profile::ProfileStore;
use anime_defence_simulation::SimulationConfig;
use anyhow::{Context, Result};
use clap::Parser;

/// Anime Defence tower defence simulation.
#[derive(Debug, Parser)]
#[command(name = "anime-defence", version, about)]
pub(crate) struct Cli {
    /// Map to play.
    #[arg(long, default_value = "dragonball")]
    pub(crate) map: String,

    /// Difficulty of the session.
    #[arg(long, default_value = "easy")]
    pub(crate) difficulty: Difficulty,

    /// Seed for every random draw; overrides the configuration file.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Directory holding the profile save file.
    #[arg(long, default_value = ".")]
    pub(crate) save_dir: PathBuf,

    /// TOML file with simulation parameters.
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Runs the given number of frames without a window.
    #[arg(long, value_name = "FRAMES")]
    pub(crate) headless: Option<u32>,

    /// Places available units automatically next to the path.
    #[arg(long)]
    pub(crate) auto_place: bool,

    /// Never reads or writes the profile save file.
    #[arg(long)]
    pub(crate) no_save: bool,

    /// Enables vertical sync in windowed mode.
    #[arg(long)]
    pub(crate) vsync: bool,
}

impl Cli {
    /// Resolves the simulation configuration, applying command-line overrides.
    pub(crate) fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }

    /// Store backing the profile, unless persistence is disabled.
    pub(crate) fn profile_store(&self) -> Option<ProfileStore> {
        (!self.no_save).then(|| ProfileStore::new(&self.save_dir))
    }
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse configuration file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("anime-defence").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_start_an_easy_dragonball_session() {
        let cli = parse(&[]);
        assert_eq!(cli.map, "dragonball");
        assert_eq!(cli.difficulty, Difficulty::Easy);
        assert!(cli.headless.is_none());
        assert_eq!(
            cli.simulation_config().expect("defaults"),
            SimulationConfig::default()
        );
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let parsed = Cli::try_parse_from(["anime-defence", "--difficulty", "nightmare"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn seed_flag_overrides_configuration_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sim.toml");
        fs::write(&path, "seed = 3\nstarting_currency = 250\n").expect("write config");

        let cli = parse(&[
            "--config",
            path.to_str().expect("utf-8 path"),
            "--seed",
            "11",
        ]);
        let config = cli.simulation_config().expect("config");
        assert_eq!(config.seed, 11);
        assert_eq!(config.starting_currency, 250);
        assert_eq!(config.wave_delay_ms, 2_000);
    }

    #[test]
    fn unreadable_configuration_reports_the_path() {
        let cli = parse(&["--config", "/nonexistent/anime-defence.toml"]);
        let error = cli.simulation_config().expect_err("missing file");
        assert!(format!("{error:#}").contains("/nonexistent/anime-defence.toml"));
    }

    #[test]
    fn no_save_disables_the_store() {
        assert!(parse(&["--no-save"]).profile_store().is_none());
        let store = parse(&["--save-dir", "saves"]).profile_store().expect("store");
        assert_eq!(store.path(), Path::new("saves").join("animeTD_save.json"));
    }
}
