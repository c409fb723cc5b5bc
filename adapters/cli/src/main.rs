#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Anime Defence experience.

mod app;
mod autoplace;
mod config;
mod headless;

use anime_defence_catalog::map;
use anime_defence_rendering::{Color, Presentation, RenderingBackend};
use anime_defence_rendering_macroquad::MacroquadBackend;
use anime_defence_simulation::Simulation;
use anime_defence_world::query;
use anyhow::{Context, Result};
use clap::Parser;

use crate::{app::App, autoplace::AutoPlacer, config::Cli};

/// Entry point for the Anime Defence command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_default_env().try_init();

    let cli = Cli::parse();
    let config = cli.simulation_config()?;
    if map(&cli.map).is_none() {
        log::warn!(
            "map `{}` is not registered; enemies will not move and placement only checks bounds",
            cli.map
        );
    }

    let mut simulation = Simulation::new(config, cli.profile_store());
    println!("{}", query::welcome_banner(simulation.world()));
    simulation.start(&cli.map, cli.difficulty);

    let placer = cli.auto_place.then(|| AutoPlacer::new(&cli.map));
    match cli.headless {
        Some(frames) => {
            let report = headless::run(&mut simulation, frames, placer.as_ref());
            println!("{report}");
            Ok(())
        }
        None => {
            let mut app = App::new(simulation, placer);
            let presentation = Presentation::new(
                "Anime Defence",
                Color::from_rgb_u8(18, 18, 24),
                app.scene(),
            );
            MacroquadBackend::default()
                .with_vsync(cli.vsync)
                .run(presentation, move |dt, input, scene| {
                    app.update(dt, input, scene);
                })
                .context("failed to run the macroquad rendering backend")
        }
    }
}
