use tracing::{debug, trace, warn};

use crate::clock::SimulationClock;
use crate::error::{check_range, SimError};
use crate::math::{frame_rotation, to_world, FrameMode, LocalPosition, WorldPosition};
use crate::physics::{local_position, precession_angle, LocationPreset, PendulumConfig};

/// Valid latitude range in degrees
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Valid speed factor range
pub const SPEED_FACTOR_RANGE: (f64, f64) = (100.0, 10_000.0);

/// Latitude of the Panthéon in Paris, where Foucault first showed the effect
pub const DEFAULT_LATITUDE: f64 = 48.8566;
/// One simulated hour of precession per real second
pub const DEFAULT_SPEED_FACTOR: f64 = 3600.0;

/// User-controlled simulation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Geographic latitude in degrees
    pub latitude_degrees: f64,
    /// Multiplier applied to the precession rate only
    pub speed_factor: f64,
    /// Reference frame used for drawing
    pub mode: FrameMode,
    /// Simulation paused
    pub paused: bool,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            latitude_degrees: DEFAULT_LATITUDE,
            speed_factor: DEFAULT_SPEED_FACTOR,
            mode: FrameMode::Normal,
            paused: false,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub local_position: LocalPosition,
    pub world_position: WorldPosition,
    /// Cumulative precession angle, unwrapped
    pub precession_angle: f64,
    /// Rotation to apply to the Earth-frame markers
    pub frame_rotation: f64,
    pub simulated_time: f64,
}

/// Simulation state: parameters, pendulum constants and the clock
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    params: SimulationParameters,
    config: PendulumConfig,
    natural_frequency: f64,
    clock: SimulationClock,
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState::new(PendulumConfig::default())
    }
}

impl SimulationState {
    /// Creates a running simulation with default parameters.
    ///
    /// `config` is expected to have passed [`PendulumConfig::validate`].
    pub fn new(config: PendulumConfig) -> Self {
        SimulationState {
            params: SimulationParameters::default(),
            config,
            natural_frequency: config.natural_frequency(),
            clock: SimulationClock::new(),
        }
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn config(&self) -> &PendulumConfig {
        &self.config
    }

    pub fn latitude(&self) -> f64 {
        self.params.latitude_degrees
    }

    pub fn speed_factor(&self) -> f64 {
        self.params.speed_factor
    }

    pub fn mode(&self) -> FrameMode {
        self.params.mode
    }

    pub fn is_paused(&self) -> bool {
        self.params.paused
    }

    pub fn simulated_time(&self) -> f64 {
        self.clock.simulated_time()
    }

    /// Wall-clock step applied by the last unpaused tick, after clamping
    pub fn last_wall_delta(&self) -> f64 {
        self.clock.last_wall_delta()
    }

    pub fn natural_frequency(&self) -> f64 {
        self.natural_frequency
    }

    pub fn pause(&mut self) {
        if !self.params.paused {
            debug!(time = self.simulated_time(), "paused");
            self.params.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.params.paused {
            debug!(time = self.simulated_time(), "resumed");
            self.params.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.params.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Restarts the swing from its initial phase, keeping every parameter
    pub fn reset(&mut self) {
        debug!(
            latitude = self.params.latitude_degrees,
            speed_factor = self.params.speed_factor,
            mode = self.params.mode.label(),
            "reset"
        );
        self.clock.reset();
        self.params.paused = false;
    }

    /// Sets the latitude, rejecting values outside `-90 ..= 90`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] and leaves the state untouched
    /// if `degrees` is non-finite or out of range.
    pub fn set_latitude(&mut self, degrees: f64) -> Result<(), SimError> {
        let (min, max) = LATITUDE_RANGE;
        let degrees = check_range("latitude", degrees, min, max).inspect_err(|err| {
            warn!(%err, "latitude rejected");
        })?;
        debug!(from = self.params.latitude_degrees, to = degrees, "latitude set");
        self.params.latitude_degrees = degrees;
        Ok(())
    }

    /// Sets the speed factor, rejecting values outside `100 ..= 10000`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] and leaves the state untouched
    /// if `factor` is non-finite or out of range.
    pub fn set_speed_factor(&mut self, factor: f64) -> Result<(), SimError> {
        let (min, max) = SPEED_FACTOR_RANGE;
        let factor = check_range("speed factor", factor, min, max).inspect_err(|err| {
            warn!(%err, "speed factor rejected");
        })?;
        debug!(from = self.params.speed_factor, to = factor, "speed factor set");
        self.params.speed_factor = factor;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: FrameMode) {
        if self.params.mode != mode {
            debug!(mode = mode.label(), "frame mode set");
            self.params.mode = mode;
        }
    }

    /// Flips between Normal and Fixed mode without touching the clock
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.params.mode.toggled());
    }

    pub fn apply_preset(&mut self, preset: LocationPreset) {
        let latitude = preset.latitude(&self.config);
        // Presets come from a validated config, so this only fails if the
        // config was never validated.
        if let Err(err) = self.set_latitude(latitude) {
            warn!(?preset, %err, "preset ignored");
        }
    }

    pub fn preset_equator(&mut self) {
        self.apply_preset(LocationPreset::Equator);
    }

    pub fn preset_mid_latitude(&mut self) {
        self.apply_preset(LocationPreset::MidLatitude);
    }

    pub fn preset_pole(&mut self) {
        self.apply_preset(LocationPreset::Pole);
    }

    /// Computes the frame outputs for the current time without advancing
    pub fn snapshot(&self) -> TickOutput {
        let t = self.clock.simulated_time();
        let local = local_position(
            t,
            self.config.amplitude,
            self.natural_frequency,
            self.config.eccentricity,
        );
        let theta = precession_angle(t, self.params.latitude_degrees, self.params.speed_factor);
        TickOutput {
            local_position: local,
            world_position: to_world(local, theta, self.params.mode),
            precession_angle: theta,
            frame_rotation: frame_rotation(theta, self.params.mode),
            simulated_time: t,
        }
    }

    /// Advances the simulation by one frame.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] without advancing the clock if
    /// `wall_delta` is not finite.
    pub fn tick(&mut self, wall_delta: f64) -> Result<TickOutput, SimError> {
        if !wall_delta.is_finite() {
            warn!(wall_delta, "non-finite frame delta rejected");
            return Err(SimError::InvalidParameter {
                name: "wall delta",
                value: wall_delta,
                min: 0.0,
                max: f64::MAX,
            });
        }
        self.clock.advance(wall_delta, self.params.paused);
        let output = self.snapshot();
        trace!(
            time = output.simulated_time,
            theta = output.precession_angle,
            x = output.world_position.x,
            y = output.world_position.y,
            "tick"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::EARTH_ANGULAR_RATE;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn run_for(state: &mut SimulationState, seconds: f64, step: f64) -> TickOutput {
        let steps = (seconds / step).round() as usize;
        let mut output = state.snapshot();
        for _ in 0..steps {
            output = state.tick(step).unwrap();
        }
        output
    }

    #[test]
    fn starts_running_with_defaults() {
        let state = SimulationState::default();
        assert!(!state.is_paused());
        assert_eq!(state.mode(), FrameMode::Normal);
        assert_eq!(state.latitude(), DEFAULT_LATITUDE);
        assert_eq!(state.speed_factor(), DEFAULT_SPEED_FACTOR);
        assert_eq!(state.simulated_time(), 0.0);
    }

    #[test]
    fn pause_is_idempotent() {
        let mut once = SimulationState::default();
        once.tick(0.1).unwrap();
        let mut twice = once.clone();
        once.pause();
        twice.pause();
        twice.pause();
        assert_eq!(once, twice);
        assert!(twice.is_paused());
    }

    #[test]
    fn resume_is_idempotent() {
        let mut state = SimulationState::default();
        let before = state.clone();
        state.resume();
        assert_eq!(state, before);
        state.pause();
        state.resume();
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn paused_ticks_do_not_advance_time() {
        let mut state = SimulationState::default();
        state.tick(0.1).unwrap();
        state.pause();
        let frozen = state.tick(0.2).unwrap();
        assert_relative_eq!(frozen.simulated_time, 0.1);
        state.toggle_pause();
        let moving = state.tick(0.1).unwrap();
        assert_relative_eq!(moving.simulated_time, 0.2);
    }

    #[test]
    fn reset_returns_to_initial_phase() {
        let mut state = SimulationState::default();
        state.set_latitude(30.0).unwrap();
        state.set_speed_factor(500.0).unwrap();
        state.toggle_mode();
        run_for(&mut state, 3.0, 0.05);
        state.pause();

        state.reset();
        let output = state.tick(0.0).unwrap();
        assert_eq!(output.simulated_time, 0.0);
        assert_eq!(
            output.local_position,
            LocalPosition::new(state.config().amplitude, 0.0)
        );
        assert!(!state.is_paused());
        assert_eq!(state.latitude(), 30.0);
        assert_eq!(state.speed_factor(), 500.0);
        assert_eq!(state.mode(), FrameMode::Fixed);
    }

    #[test]
    fn out_of_range_latitude_is_rejected_without_mutation() {
        let mut state = SimulationState::default();
        state.tick(0.1).unwrap();
        let before = state.clone();
        let err = state.set_latitude(91.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "latitude", .. }));
        assert!(state.set_latitude(f64::NAN).is_err());
        assert!(state.set_latitude(-90.5).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn out_of_range_speed_is_rejected_without_mutation() {
        let mut state = SimulationState::default();
        let before = state.clone();
        assert!(state.set_speed_factor(99.0).is_err());
        assert!(state.set_speed_factor(10_001.0).is_err());
        assert!(state.set_speed_factor(f64::INFINITY).is_err());
        assert_eq!(state, before);
        state.set_speed_factor(10_000.0).unwrap();
        assert_eq!(state.speed_factor(), 10_000.0);
    }

    #[test]
    fn non_finite_delta_is_rejected() {
        let mut state = SimulationState::default();
        state.tick(0.1).unwrap();
        let before = state.clone();
        assert!(state.tick(f64::NAN).is_err());
        assert!(state.tick(f64::NEG_INFINITY).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn mid_latitude_scenario_matches_closed_form() {
        let mut state = SimulationState::default();
        state.set_latitude(45.0).unwrap();
        state.set_speed_factor(1000.0).unwrap();
        let output = run_for(&mut state, 10.0, 0.01);
        let expected = EARTH_ANGULAR_RATE * 45.0_f64.to_radians().sin() * 10.0 * 1000.0;
        assert_relative_eq!(output.simulated_time, 10.0, epsilon = 1e-9);
        assert_relative_eq!(output.precession_angle, expected, epsilon = 1e-9);
    }

    #[test]
    fn toggling_mode_keeps_time_and_angle_continuous() {
        let mut state = SimulationState::default();
        let before = run_for(&mut state, 2.0, 0.02);
        state.toggle_mode();
        let at_toggle = state.tick(0.0).unwrap();
        assert_eq!(at_toggle.simulated_time, before.simulated_time);
        assert_eq!(at_toggle.precession_angle, before.precession_angle);

        let next = state.tick(0.02).unwrap();
        let step = next.precession_angle - at_toggle.precession_angle;
        let expected = before.precession_angle / before.simulated_time * 0.02;
        assert_relative_eq!(step, expected, epsilon = 1e-9);
    }

    #[test]
    fn modes_agree_on_relative_angle() {
        let mut state = SimulationState::default();
        let normal = run_for(&mut state, 1.0, 0.05);
        state.toggle_mode();
        let fixed = state.tick(0.0).unwrap();

        // Fixed mode draws the swing unrotated and turns the floor instead
        assert_eq!(fixed.world_position.x, fixed.local_position.x);
        assert_eq!(fixed.world_position.y, fixed.local_position.y);
        assert_eq!(normal.frame_rotation, 0.0);
        assert_abs_diff_eq!(
            fixed.frame_rotation,
            -normal.precession_angle,
            epsilon = 1e-12
        );
    }

    #[test]
    fn presets_set_latitude() {
        let mut state = SimulationState::default();
        state.preset_equator();
        assert_eq!(state.latitude(), 0.0);
        state.preset_mid_latitude();
        assert_eq!(state.latitude(), 45.0);
        state.preset_pole();
        assert_eq!(state.latitude(), 90.0);
    }

    #[test]
    fn equator_never_precesses() {
        let mut state = SimulationState::default();
        state.preset_equator();
        state.set_speed_factor(10_000.0).unwrap();
        let output = run_for(&mut state, 5.0, 0.1);
        assert_eq!(output.precession_angle, 0.0);
    }
}
