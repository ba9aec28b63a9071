#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-facing orchestration of the Neon Arcade games.
//!
//! Each engine owns its world plus the systems that step it and exposes the
//! same [`Simulation`] surface, so a host only has to feed input, call
//! [`Simulation::tick`] from its frame scheduler and draw the returned
//! [`HudSnapshot`].

pub mod config;
mod defense;
pub mod schedule;
pub mod scores;
mod survivor;

pub use config::{ConfigError, EngineConfig, LaneConfig, SurvivorConfig};
pub use defense::DefenseEngine;
pub use schedule::{run_frames, FixedStep, FrameScheduler, IntervalScheduler, ManualClock};
pub use scores::{record_high_score, HighScoreStore, MemoryScores};
pub use survivor::SurvivorEngine;

use neon_arcade_core::{Event, HudSnapshot};

/// Surface shared by every game engine.
pub trait Simulation {
    /// Name under which high scores are recorded.
    fn game_name(&self) -> &'static str;

    /// Opens or closes the gate that lets ticks advance the game.
    fn set_running(&mut self, running: bool);

    /// Advances one fixed step and returns the resulting HUD.
    fn tick(&mut self) -> HudSnapshot;

    /// Feeds the pointer position in world units and the button state.
    fn handle_pointer(&mut self, x: f32, y: f32, pressed: bool);

    /// Feeds a key transition using DOM-style key codes such as `"KeyW"`.
    fn handle_key(&mut self, code: &str, pressed: bool);

    /// Current HUD without advancing.
    fn snapshot(&self) -> HudSnapshot;

    /// Removes and returns every event published since the last drain.
    fn drain_events(&mut self) -> Vec<Event>;

    /// Discards the run and returns to the initial state.
    fn restart(&mut self);
}
