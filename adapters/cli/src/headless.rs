//! Window-less play for scripted runs and smoke tests.

use std::{fmt, time::Duration};

use anime_defence_core::{Event, SessionSummary};
use anime_defence_simulation::Simulation;
use anime_defence_world::query;

use crate::autoplace::AutoPlacer;

/// Fixed frame step used without a window.
pub(crate) const FRAME: Duration = Duration::from_millis(16);

/// Outcome of a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessReport {
    /// Frames simulated before the run stopped.
    pub(crate) frames: u32,
    /// Units placed by the auto-placer.
    pub(crate) placed: usize,
    /// Lives left when the run stopped.
    pub(crate) lives: u32,
    /// Payout of the session.
    pub(crate) summary: Option<SessionSummary>,
}

impl fmt::Display for HeadlessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {} units placed, {} lives left",
            self.frames, self.placed, self.lives
        )?;
        if let Some(summary) = &self.summary {
            write!(
                f,
                "; reached wave {} with {} defeated (+{} yen, +{} xp)",
                summary.wave, summary.enemies_defeated, summary.yen_earned, summary.xp_gained
            )?;
        }
        Ok(())
    }
}

/// Runs the started session for at most `frames` frames, then ends it.
pub(crate) fn run(
    simulation: &mut Simulation,
    frames: u32,
    placer: Option<&AutoPlacer>,
) -> HeadlessReport {
    let mut placed = placer.map_or(0, |placer| placer.place(simulation));
    let mut summary = None;
    let mut simulated = 0;

    while simulated < frames && summary.is_none() {
        simulation.frame(FRAME);
        simulated += 1;

        let mut wave_started = false;
        for event in simulation.events() {
            match event {
                Event::WaveAdvanced { wave } => {
                    log::info!("wave {wave} after {simulated} frames");
                    wave_started = true;
                }
                Event::SessionEnded { summary: ended } => summary = Some(*ended),
                _ => {}
            }
        }
        if let (true, Some(placer)) = (wave_started, placer) {
            placed += placer.place(simulation);
        }
    }

    let lives = query::lives(simulation.world());
    let summary = summary.or_else(|| simulation.end_session());
    HeadlessReport {
        frames: simulated,
        placed,
        lives,
        summary,
    }
}
