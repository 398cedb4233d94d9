//! Simulated time, advanced from wall-clock frame deltas.
//!
//! The clock only tracks how long the pendulum has been swinging. The speed
//! factor is applied to precession alone, so the swing itself always plays at
//! a rate a person can follow.

/// Longest wall-clock step applied in a single tick, in seconds.
///
/// Frames that stall longer than this (a resume after a suspend, a slow
/// terminal) are clamped so the pendulum never jumps.
pub const MAX_WALL_DELTA: f64 = 0.25;

/// Simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationClock {
    /// Seconds of simulated time since the last reset
    simulated_time: f64,
    /// The clamped wall delta applied by the most recent unpaused advance
    last_wall_delta: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `wall_delta` seconds unless `paused`.
    ///
    /// Negative or non-finite deltas count as zero and large ones are
    /// clamped to [`MAX_WALL_DELTA`]. Returns the simulated time after the
    /// step.
    pub fn advance(&mut self, wall_delta: f64, paused: bool) -> f64 {
        if paused {
            return self.simulated_time;
        }
        let delta = if wall_delta.is_finite() {
            wall_delta.clamp(0.0, MAX_WALL_DELTA)
        } else {
            0.0
        };
        self.last_wall_delta = delta;
        self.simulated_time += delta;
        self.simulated_time
    }

    /// Zeroes the simulated time.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    pub fn last_wall_delta(&self) -> f64 {
        self.last_wall_delta
    }
}
