#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning systems for both arcade games.
//!
//! [`WaveController`] schedules lane waves and detects when they are cleared.
//! [`HordeSpawner`] releases survivor enemies around the avatar.

use std::f32::consts::TAU;

use neon_arcade_core::{Command, Dice, Event, HordeCategory, LaneCategory, Vec2, WavePlan};
use tracing::debug;

/// Derives the schedule of a lane wave from its number.
///
/// Every fifth wave brings tanks, every third an air raid, every second a
/// swarm, and the remaining waves baseline infantry.
#[must_use]
pub fn plan_wave(wave: u32) -> WavePlan {
    let (category, count, interval_frames) = if wave % 5 == 0 {
        (LaneCategory::Tank, 3 + wave / 5, 120)
    } else if wave % 3 == 0 {
        (LaneCategory::Air, 5 + wave, 50)
    } else if wave % 2 == 0 {
        (LaneCategory::Swarm, 10 + 2 * wave, 25)
    } else {
        (LaneCategory::Basic, 5 + wave * 3 / 2, 60)
    };
    WavePlan {
        wave,
        category,
        count,
        interval_frames,
    }
}

/// Lifecycle of the current lane wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// No wave has started yet.
    Idle,
    /// The wave is releasing enemies or waiting for the field to empty.
    Spawning {
        /// Spawns issued so far, including skipped ones.
        spawned: u32,
    },
    /// The previous wave was cleared and the next one is planned.
    Cleared,
}

/// Wave/spawn state machine for the lane game.
#[derive(Clone, Debug)]
pub struct WaveController {
    plan: WavePlan,
    phase: WavePhase,
}

impl Default for WaveController {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveController {
    /// Creates a controller holding the plan of wave one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plan: plan_wave(1),
            phase: WavePhase::Idle,
        }
    }

    /// Plan of the active wave, or of the next one while idle or cleared.
    #[must_use]
    pub const fn plan(&self) -> WavePlan {
        self.plan
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Reports whether the current wave still has enemies to release.
    #[must_use]
    pub const fn is_releasing(&self) -> bool {
        match self.phase {
            WavePhase::Spawning { spawned } => spawned < self.plan.count,
            WavePhase::Idle | WavePhase::Cleared => false,
        }
    }

    /// Consumes world events to emit wave, spawn and completion commands.
    ///
    /// `live_enemies` is the number of enemies still on the field before the
    /// frames in `events` were simulated.
    pub fn handle(&mut self, events: &[Event], live_enemies: usize, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RunningChanged { running: true } => {
                    if matches!(self.phase, WavePhase::Idle | WavePhase::Cleared) {
                        self.phase = WavePhase::Spawning { spawned: 0 };
                        out.push(Command::BeginWave { plan: self.plan });
                    }
                }
                Event::TimeAdvanced { frame } => self.advance(*frame, live_enemies, out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, frame: u64, live_enemies: usize, out: &mut Vec<Command>) {
        let WavePhase::Spawning { spawned } = self.phase else {
            return;
        };

        if spawned < self.plan.count {
            if self.plan.interval_frames > 0 && frame % self.plan.interval_frames == 0 {
                out.push(Command::SpawnEnemy {
                    category: self.plan.category,
                    wave: self.plan.wave,
                });
                self.phase = WavePhase::Spawning {
                    spawned: spawned + 1,
                };
            }
        } else if live_enemies == 0 {
            debug!(wave = self.plan.wave, "wave field empty");
            out.push(Command::CompleteWave {
                wave: self.plan.wave,
                reward: self.plan.clear_reward(),
            });
            self.phase = WavePhase::Cleared;
            self.plan = plan_wave(self.plan.wave + 1);
        }
    }

    /// Returns the controller to wave one.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Blueprint for one horde enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Rolled category.
    pub category: HordeCategory,
    /// Entry position in world units.
    pub position: Vec2,
    /// Multiplier applied to the category's base hit points.
    pub hit_point_scale: f32,
}

/// Releases survivor enemies on a ring outside the visible area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HordeSpawner {
    base_interval: u64,
    min_interval: u64,
    view: Vec2,
    margin: f32,
}

impl Default for HordeSpawner {
    fn default() -> Self {
        Self::new(60, 10, Vec2::new(800.0, 600.0), 100.0)
    }
}

impl HordeSpawner {
    /// Creates a spawner with explicit cadence and ring geometry.
    #[must_use]
    pub const fn new(base_interval: u64, min_interval: u64, view: Vec2, margin: f32) -> Self {
        Self {
            base_interval,
            min_interval,
            view,
            margin,
        }
    }

    /// Frames between spawns at the provided avatar level.
    #[must_use]
    pub fn interval(&self, level: u32) -> u64 {
        self.base_interval
            .saturating_sub(u64::from(level))
            .max(self.min_interval)
            .max(1)
    }

    /// Distance from the avatar at which enemies appear.
    #[must_use]
    pub fn ring_radius(&self) -> f32 {
        self.view.x.max(self.view.y) / 2.0 + self.margin
    }

    /// Emits a spawn when `frame` lands on the cadence for `level`.
    pub fn poll(
        &self,
        frame: u64,
        level: u32,
        avatar: Vec2,
        dice: &mut dyn Dice,
    ) -> Option<SpawnRequest> {
        if frame % self.interval(level) != 0 {
            return None;
        }

        let angle = dice.range(0.0, TAU);
        let position = avatar + Vec2::new(angle.cos(), angle.sin()) * self.ring_radius();
        let roll = dice.unit();
        let category = if roll > 0.95 {
            HordeCategory::Brute
        } else if roll > 0.8 {
            HordeCategory::Rusher
        } else {
            HordeCategory::Grunt
        };

        Some(SpawnRequest {
            category,
            position,
            hit_point_scale: 1.0 + 0.1 * level as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_arcade_core::ScriptedDice;

    #[test]
    fn wave_plans_follow_divisibility_order() {
        assert_eq!(plan_wave(1).category, LaneCategory::Basic);
        assert_eq!(plan_wave(1).count, 6);
        assert_eq!(plan_wave(2).category, LaneCategory::Swarm);
        assert_eq!(plan_wave(2).count, 14);
        assert_eq!(plan_wave(3).category, LaneCategory::Air);
        assert_eq!(plan_wave(3).interval_frames, 50);
        assert_eq!(plan_wave(5).category, LaneCategory::Tank);
        assert_eq!(plan_wave(5).count, 4);
        assert_eq!(plan_wave(15).category, LaneCategory::Tank);
        assert_eq!(plan_wave(7).count, 15);
    }

    #[test]
    fn horde_interval_shrinks_with_level_down_to_floor() {
        let spawner = HordeSpawner::default();
        assert_eq!(spawner.interval(1), 59);
        assert_eq!(spawner.interval(49), 11);
        assert_eq!(spawner.interval(80), 10);
    }

    #[test]
    fn horde_category_rolls() {
        let spawner = HordeSpawner::default();
        let mut dice = ScriptedDice::new(vec![0.0, 0.97, 0.0, 0.85, 0.0, 0.5]);
        let rolls: Vec<_> = (0..3)
            .filter_map(|_| spawner.poll(59, 1, Vec2::ZERO, &mut dice))
            .map(|request| request.category)
            .collect();
        assert_eq!(
            rolls,
            vec![HordeCategory::Brute, HordeCategory::Rusher, HordeCategory::Grunt]
        );
    }

    #[test]
    fn horde_spawns_on_the_ring() {
        let spawner = HordeSpawner::default();
        let mut dice = ScriptedDice::new(vec![0.25, 0.1]);
        let request = spawner
            .poll(59, 1, Vec2::new(400.0, 300.0), &mut dice)
            .expect("cadence frame");
        let offset = request.position - Vec2::new(400.0, 300.0);
        assert!((offset.length() - 500.0).abs() < 1e-3);
        assert!(offset.y > 499.0, "quarter turn points down the y axis");
        assert!((request.hit_point_scale - 1.1).abs() < 1e-6);
        assert!(spawner.poll(60, 1, Vec2::ZERO, &mut dice).is_none());
    }
}
