//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::SimError;
use crate::math::FrameMode;
use crate::physics::{
    PendulumConfig, AMPLITUDE, ECCENTRICITY, GRAVITY, MID_LATITUDE, PENDULUM_LENGTH,
};
use crate::state::{SimulationState, DEFAULT_LATITUDE, DEFAULT_SPEED_FACTOR};
use crate::trail::DEFAULT_TRAIL_LENGTH;

/// A console-based Foucault pendulum simulator
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Starting latitude in degrees (-90 to 90, negative is south)
    #[arg(short, long, default_value_t = DEFAULT_LATITUDE, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Precession speed-up factor (100 to 10000)
    #[arg(short, long, default_value_t = DEFAULT_SPEED_FACTOR)]
    pub speed: f64,

    /// Reference frame to draw in
    #[arg(short, long, value_enum, default_value_t = FrameMode::Normal)]
    pub mode: FrameMode,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Swing amplitude in floor units, 0 to 1
    #[arg(long, default_value_t = AMPLITUDE)]
    pub amplitude: f64,

    /// Pendulum length in metres
    #[arg(long, default_value_t = PENDULUM_LENGTH)]
    pub length: f64,

    /// Gravitational acceleration in m/s²
    #[arg(long, default_value_t = GRAVITY)]
    pub gravity: f64,

    /// Minor-to-major axis ratio of the drawn swing (0 to 1)
    #[arg(long, default_value_t = ECCENTRICITY)]
    pub eccentricity: f64,

    /// Latitude used by the mid-latitude preset (key 2)
    #[arg(long, default_value_t = MID_LATITUDE, allow_negative_numbers = true)]
    pub mid_latitude: f64,

    /// Target frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Number of positions kept in the swing trail
    #[arg(long, default_value_t = DEFAULT_TRAIL_LENGTH)]
    pub trail_length: usize,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            latitude: DEFAULT_LATITUDE,
            speed: DEFAULT_SPEED_FACTOR,
            mode: FrameMode::Normal,
            paused: false,
            amplitude: AMPLITUDE,
            length: PENDULUM_LENGTH,
            gravity: GRAVITY,
            eccentricity: ECCENTRICITY,
            mid_latitude: MID_LATITUDE,
            fps: 60,
            trail_length: DEFAULT_TRAIL_LENGTH,
            log_file: None,
        }
    }
}

impl Args {
    pub fn pendulum_config(&self) -> PendulumConfig {
        PendulumConfig {
            gravity: self.gravity,
            length: self.length,
            amplitude: self.amplitude,
            eccentricity: self.eccentricity,
            mid_latitude: self.mid_latitude,
        }
    }

    /// Builds the initial simulation through the same setters the UI uses.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for bad pendulum constants and
    /// [`SimError::InvalidParameter`] for an out-of-range latitude or speed.
    pub fn build_state(&self) -> Result<SimulationState, SimError> {
        let config = self.pendulum_config().validate()?;
        let mut state = SimulationState::new(config);
        state.set_latitude(self.latitude)?;
        state.set_speed_factor(self.speed)?;
        state.set_mode(self.mode);
        if self.paused {
            state.pause();
        }
        Ok(state)
    }

    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parsed_defaults() {
        let parsed = Args::try_parse_from(["foucault"]).unwrap();
        let defaults = Args::default();
        assert_eq!(parsed.latitude, defaults.latitude);
        assert_eq!(parsed.speed, defaults.speed);
        assert_eq!(parsed.mode, defaults.mode);
        assert_eq!(parsed.fps, defaults.fps);
        assert_eq!(parsed.trail_length, defaults.trail_length);
        assert_eq!(parsed.pendulum_config(), PendulumConfig::default());
    }

    #[test]
    fn parses_southern_fixed_paused_run() {
        let args = Args::try_parse_from([
            "foucault", "--latitude", "-33.9", "--speed", "500", "--mode", "fixed", "--paused",
        ])
        .unwrap();
        let state = args.build_state().unwrap();
        assert_eq!(state.latitude(), -33.9);
        assert_eq!(state.speed_factor(), 500.0);
        assert_eq!(state.mode(), FrameMode::Fixed);
        assert!(state.is_paused());
    }

    #[test]
    fn out_of_range_arguments_fail_to_build() {
        let args = Args {
            latitude: 95.0,
            ..Args::default()
        };
        assert!(matches!(
            args.build_state(),
            Err(SimError::InvalidParameter { name: "latitude", .. })
        ));

        let args = Args {
            length: 0.0,
            ..Args::default()
        };
        assert!(matches!(args.build_state(), Err(SimError::InvalidConfig { .. })));

        let args = Args::try_parse_from(["foucault", "--amplitude", "1e30"]).unwrap();
        assert!(matches!(args.build_state(), Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn fps_is_bounded() {
        assert!(Args::try_parse_from(["foucault", "--fps", "0"]).is_err());
        let args = Args::try_parse_from(["foucault", "--fps", "50"]).unwrap();
        assert_eq!(args.frame_budget(), Duration::from_millis(20));
    }
}
