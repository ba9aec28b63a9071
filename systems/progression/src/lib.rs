#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Survivor run state machine: experience, level-ups and upgrade choices.
//!
//! The run moves from `Menu` to `Running`, pauses for an upgrade choice each
//! time experience reaches the threshold, and ends in `GameOver` once the
//! avatar runs out of hit points.

pub mod catalog;

pub use catalog::{upgrade, Stat, StatEffect, Upgrade, CATALOG, MIN_FIRE_INTERVAL};

use neon_arcade_core::{Dice, Event, RunState, UpgradeError, UpgradeKind};
use neon_arcade_world::Avatar;
use tracing::info;

/// Tunable constants of the progression controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Multiplier applied to the experience threshold at every level-up.
    pub threshold_growth: f32,
    /// Number of upgrades offered per level-up.
    pub offers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_growth: 1.5,
            offers: 3,
        }
    }
}

/// Run state machine of the survivor game.
#[derive(Clone, Debug)]
pub struct Progression {
    config: Config,
    state: RunState,
    offers: Vec<UpgradeKind>,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Progression {
    /// Creates a controller waiting in the menu.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: RunState::Menu,
            offers: Vec::new(),
        }
    }

    /// Current run state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Reports whether physics, combat and spawning may advance.
    #[must_use]
    pub fn is_simulating(&self) -> bool {
        self.state == RunState::Running
    }

    /// Upgrades on offer while paused for a choice.
    #[must_use]
    pub fn offers(&self) -> &[UpgradeKind] {
        &self.offers
    }

    /// Leaves the menu and starts the run.
    pub fn start(&mut self, out: &mut Vec<Event>) {
        if self.state == RunState::Menu {
            self.state = RunState::Running;
            out.push(Event::RunningChanged { running: true });
        }
    }

    /// Folds one tick's events into experience and checks the end condition.
    ///
    /// Collected pickups add experience; reaching the threshold levels the
    /// avatar up and pauses the run with freshly drawn offers. Running out of
    /// hit points ends the run from any state.
    pub fn handle(
        &mut self,
        events: &[Event],
        avatar: &mut Avatar,
        dice: &mut dyn Dice,
        out: &mut Vec<Event>,
    ) {
        if self.state == RunState::GameOver {
            return;
        }
        for event in events {
            if let Event::PickupCollected { value } = event {
                avatar.experience = avatar.experience.saturating_add(*value);
                self.check_level_up(avatar, dice, out);
            }
        }
        if avatar.vitals.is_depleted() {
            self.state = RunState::GameOver;
            self.offers.clear();
            info!(level = avatar.level, "avatar destroyed");
            out.push(Event::GameOver);
        }
    }

    /// Applies the chosen upgrade and resumes the run.
    ///
    /// Experience carried past the new threshold can trigger the next
    /// level-up immediately.
    pub fn select(
        &mut self,
        kind: UpgradeKind,
        avatar: &mut Avatar,
        dice: &mut dyn Dice,
        out: &mut Vec<Event>,
    ) -> Result<(), UpgradeError> {
        if self.state != RunState::PausedForUpgrade {
            return Err(UpgradeError::NotPaused);
        }
        if !self.offers.contains(&kind) {
            return Err(UpgradeError::NotOffered(kind));
        }

        upgrade(kind).apply(avatar);
        self.offers.clear();
        self.state = RunState::Running;
        info!(upgrade = kind.id(), level = avatar.level, "upgrade applied");
        out.push(Event::UpgradeApplied { upgrade: kind });
        self.check_level_up(avatar, dice, out);
        Ok(())
    }

    /// Returns to the menu.
    pub fn reset(&mut self) {
        self.state = RunState::Menu;
        self.offers.clear();
    }

    fn check_level_up(&mut self, avatar: &mut Avatar, dice: &mut dyn Dice, out: &mut Vec<Event>) {
        if self.state != RunState::Running || avatar.experience < avatar.experience_threshold {
            return;
        }
        avatar.level += 1;
        avatar.experience = 0;
        avatar.experience_threshold =
            (avatar.experience_threshold as f32 * self.config.threshold_growth).floor() as u32;
        self.offers = draw_offers(self.config.offers, dice);
        self.state = RunState::PausedForUpgrade;
        info!(level = avatar.level, "level up");
        out.push(Event::LevelUp {
            level: avatar.level,
            options: self.offers.clone(),
        });
    }
}

/// Draws `count` distinct upgrades with a partial Fisher-Yates shuffle.
pub fn draw_offers(count: usize, dice: &mut dyn Dice) -> Vec<UpgradeKind> {
    let mut pool = UpgradeKind::ALL.to_vec();
    let count = count.min(pool.len());
    for slot in 0..count {
        let pick = slot + dice.index(pool.len() - slot);
        pool.swap(slot, pick);
    }
    pool.truncate(count);
    pool
}
