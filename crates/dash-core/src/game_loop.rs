//! Fixed-timestep accumulator.
//!
//! Frames arrive at whatever rate the host manages; the simulation always
//! advances in [`FIXED_DT`] increments.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

/// Fixed timestep for the world simulation (120Hz).
pub const FIXED_DT: f32 = 1.0 / 120.0;

/// Loop timing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds per simulation step.
    pub fixed_dt: f32,
    /// Longest frame delta accepted; longer pauses are clamped.
    pub max_frame_dt: f32,
    /// Maximum simulation steps per frame.
    pub max_steps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_dt: FIXED_DT,
            max_frame_dt: 0.1,
            max_steps: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixedStepLoop {
    timing: TimingConfig,
    accumulator: f32,
}

impl Default for FixedStepLoop {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}

impl FixedStepLoop {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            accumulator: 0.0,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.timing.fixed_dt
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Drops any time still owed to the simulation.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Feeds a frame delta and runs as many fixed steps as it covers.
    ///
    /// `step_fn` receives the zero-based step index within this frame. Returning
    /// `ControlFlow::Break` stops the frame and discards the remaining time.
    /// Time still owed after the step cap is kept up to `max_frame_dt`.
    /// Returns the number of steps that ran.
    pub fn advance<F>(&mut self, frame_dt: f32, mut step_fn: F) -> u32
    where
        F: FnMut(u32) -> ControlFlow<()>,
    {
        // NaN or negative limits collapse to zero.
        let limit = self.timing.max_frame_dt.max(0.0);
        self.accumulator += frame_dt.max(0.0).min(limit);

        let mut steps = 0;
        while self.accumulator >= self.timing.fixed_dt && steps < self.timing.max_steps {
            let flow = step_fn(steps);
            steps += 1;
            if flow.is_break() {
                self.reset();
                break;
            }
            self.accumulator -= self.timing.fixed_dt;
        }
        self.accumulator = self.accumulator.min(limit);
        steps
    }
}
