//! Frame pacing for hosts that drive a [`Simulation`].
//!
//! A [`FrameScheduler`] decides when the next frame happens and how much
//! wall time passed since the previous one. [`FixedStep`] turns that elapsed
//! time into a bounded number of fixed 60 Hz ticks so slow hosts catch up
//! without spiralling.

use std::{
    thread,
    time::{Duration, Instant},
};

use neon_arcade_core::FRAMES_PER_SECOND;

use crate::Simulation;

/// Source of frame callbacks.
pub trait FrameScheduler {
    /// Blocks until the next frame is due and returns the time elapsed since
    /// the previous one, or `None` once the scheduler is exhausted.
    fn request_next_frame(&mut self) -> Option<Duration>;
}

/// Duration of one fixed simulation step.
#[must_use]
pub fn step_duration() -> Duration {
    Duration::from_secs(1) / FRAMES_PER_SECOND
}

/// Scheduler that reports exactly one step per frame without sleeping.
///
/// Headless runs and tests use it to advance a fixed number of frames as fast
/// as the machine allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManualClock {
    remaining: u64,
}

impl ManualClock {
    /// Creates a clock that yields `frames` frames.
    #[must_use]
    pub const fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }

    /// Frames left before the clock is exhausted.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameScheduler for ManualClock {
    fn request_next_frame(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(step_duration())
    }
}

/// Scheduler that sleeps to hold a wall-clock frame rate.
#[derive(Clone, Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    remaining: Option<u64>,
    last: Option<Instant>,
}

impl IntervalScheduler {
    /// Creates a scheduler firing every `interval`, optionally for a bounded
    /// number of frames.
    #[must_use]
    pub const fn new(interval: Duration, frames: Option<u64>) -> Self {
        Self {
            interval,
            remaining: frames,
            last: None,
        }
    }
}

impl FrameScheduler for IntervalScheduler {
    fn request_next_frame(&mut self) -> Option<Duration> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let Some(last) = self.last else {
            self.last = Some(Instant::now());
            return Some(self.interval);
        };

        let deadline = last + self.interval;
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        let now = Instant::now();
        self.last = Some(now);
        Some(now - last)
    }
}

/// Accumulator converting elapsed wall time into fixed steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedStep {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(step_duration(), 5)
    }
}

impl FixedStep {
    /// Creates an accumulator with the provided step and catch-up bound.
    #[must_use]
    pub const fn new(step: Duration, max_steps: u32) -> Self {
        Self {
            step,
            max_steps,
            accumulator: Duration::ZERO,
        }
    }

    /// Adds elapsed time and returns the number of steps now due.
    ///
    /// Time beyond `max_steps` worth of backlog is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}

/// Drives `simulation` from `scheduler` until it is exhausted.
///
/// `on_frame` runs once per frame after the due ticks, so hosts can render
/// the snapshot and feed input for the next frame. Returns the number of
/// ticks executed.
pub fn run_frames<S, F>(
    simulation: &mut S,
    scheduler: &mut dyn FrameScheduler,
    mut on_frame: F,
) -> u64
where
    S: Simulation + ?Sized,
    F: FnMut(&mut S),
{
    let mut step = FixedStep::default();
    let mut ticks = 0;
    while let Some(elapsed) = scheduler.request_next_frame() {
        for _ in 0..step.advance(elapsed) {
            let _ = simulation.tick();
            ticks += 1;
        }
        on_frame(simulation);
    }
    ticks
}
