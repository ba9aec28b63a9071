//! Scripted players that keep headless runs moving.

use neon_arcade_core::{CellCoord, EmplacementKind, PlacementError, RunState, Structure};
use neon_arcade_engine::{DefenseEngine, Simulation, SurvivorEngine};
use neon_arcade_world::LaneRules;
use tracing::{debug, warn};

const STEER_KEYS: [&str; 4] = ["KeyD", "KeyS", "KeyA", "KeyW"];
const STEER_FRAMES: u64 = 90;

/// Builds a flanked corridor between waves and starts the next one.
#[derive(Debug)]
pub(crate) struct DefensePilot {
    last_wave: Option<u32>,
    plan: Vec<(CellCoord, Structure)>,
    cursor: usize,
}

impl DefensePilot {
    /// Plans emplacements alongside the straight source-to-target row.
    pub(crate) fn new(rules: &LaneRules, last_wave: Option<u32>) -> Self {
        let row = rules.target.row();
        let kinds = [
            EmplacementKind::Turret,
            EmplacementKind::Sniper,
            EmplacementKind::Blaster,
        ];
        let mut plan = Vec::new();
        for (index, column) in (2..rules.columns.saturating_sub(2)).step_by(3).enumerate() {
            let structure = Structure::Emplacement(kinds[index % kinds.len()]);
            for flank in [row.checked_sub(1), Some(row + 1)].into_iter().flatten() {
                if flank < rules.rows {
                    plan.push((CellCoord::new(column, flank), structure));
                }
            }
        }
        Self {
            last_wave,
            plan,
            cursor: 0,
        }
    }

    /// Spends money on the plan and launches the next wave while building.
    pub(crate) fn drive(&mut self, engine: &mut DefenseEngine) {
        let hud = engine.snapshot();
        if hud.state != RunState::Menu || self.last_wave.is_some_and(|last| hud.wave > last) {
            return;
        }
        self.build(engine);
        engine.set_running(true);
    }

    fn build(&mut self, engine: &mut DefenseEngine) {
        while let Some(&(cell, structure)) = self.plan.get(self.cursor) {
            match engine.try_place(cell, structure) {
                Ok(cost) => debug!(?cell, ?structure, cost, "autopilot placed structure"),
                Err(PlacementError::InsufficientFunds { .. }) => return,
                Err(reason) => warn!(?cell, ?structure, %reason, "autopilot skipped cell"),
            }
            self.cursor += 1;
        }
    }
}

/// Steers the avatar in a slow square and takes the first upgrade offered.
#[derive(Debug, Default)]
pub(crate) struct SurvivorPilot {
    heading: Option<usize>,
}

impl SurvivorPilot {
    /// Feeds one frame of input.
    pub(crate) fn drive(&mut self, engine: &mut SurvivorEngine) {
        match engine.state() {
            RunState::Menu => engine.start(),
            RunState::PausedForUpgrade => {
                let choice = engine.snapshot().upgrade_options.first().copied();
                if let Some(upgrade) = choice {
                    if let Err(error) = engine.select_upgrade(upgrade) {
                        warn!(%error, "autopilot upgrade refused");
                    }
                }
            }
            RunState::Running => {
                if engine.arena().frame() % STEER_FRAMES == 0 {
                    self.turn(engine);
                }
            }
            RunState::GameOver => {}
        }
    }

    fn turn(&mut self, engine: &mut SurvivorEngine) {
        if let Some(current) = self.heading {
            engine.handle_key(STEER_KEYS[current], false);
        }
        let next = self.heading.map_or(0, |current| (current + 1) % STEER_KEYS.len());
        engine.handle_key(STEER_KEYS[next], true);
        self.heading = Some(next);
    }
}
