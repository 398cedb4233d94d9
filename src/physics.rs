//! Pendulum kinematics and the precession model.
//!
//! Everything here is a pure function of its arguments. The pendulum swing
//! is simple harmonic motion drawn as a narrow ellipse, and the swing plane
//! precesses at `ωe · sin(latitude)`.

use std::f64::consts::TAU;

use crate::error::SimError;
use crate::math::LocalPosition;

/// Length of one sidereal day in seconds
pub const SIDEREAL_DAY: f64 = 86_164.0905;

/// Earth's rotation rate in rad/s: one revolution per sidereal day
pub const EARTH_ANGULAR_RATE: f64 = TAU / SIDEREAL_DAY;

/// Standard gravitational acceleration in m/s²
pub const GRAVITY: f64 = 9.81;

/// Default pendulum length in metres
pub const PENDULUM_LENGTH: f64 = 10.0;

/// Default swing amplitude in floor units
pub const AMPLITUDE: f64 = 1.0;

/// Largest accepted amplitude; the drawn floor has room for a unit swing
pub const MAX_AMPLITUDE: f64 = 1.0;

/// Minor-to-major axis ratio of the drawn swing.
///
/// This is a legibility choice: a pure line would hide the direction of
/// the swing, so the bob traces a thin ellipse instead.
pub const ECCENTRICITY: f64 = 0.3;

/// Latitude used by the mid-latitude preset
pub const MID_LATITUDE: f64 = 45.0;

/// Below this `|sin(latitude)|` the precession period is reported as infinite
const MIN_PRECESSION_SINE: f64 = 0.01;

/// Design constants of the simulated pendulum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumConfig {
    pub gravity: f64,
    pub length: f64,
    pub amplitude: f64,
    pub eccentricity: f64,
    pub mid_latitude: f64,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        PendulumConfig {
            gravity: GRAVITY,
            length: PENDULUM_LENGTH,
            amplitude: AMPLITUDE,
            eccentricity: ECCENTRICITY,
            mid_latitude: MID_LATITUDE,
        }
    }
}

impl PendulumConfig {
    /// Checks that the constants describe a pendulum that can swing.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first bad field.
    pub fn validate(self) -> Result<Self, SimError> {
        let invalid = |reason: &str| SimError::InvalidConfig {
            reason: reason.to_owned(),
        };
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(invalid("gravity must be finite and positive"));
        }
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(invalid("pendulum length must be finite and positive"));
        }
        if !(0.0..=MAX_AMPLITUDE).contains(&self.amplitude) {
            return Err(invalid("amplitude must lie in 0 ..= 1"));
        }
        if !(0.0..=1.0).contains(&self.eccentricity) {
            return Err(invalid("eccentricity must lie in 0 ..= 1"));
        }
        if !(-90.0..=90.0).contains(&self.mid_latitude) {
            return Err(invalid("mid-latitude preset must lie in -90 ..= 90"));
        }
        Ok(self)
    }

    pub fn natural_frequency(&self) -> f64 {
        natural_frequency(self.gravity, self.length)
    }
}

/// Natural angular frequency `ω0 = sqrt(g / L)` in rad/s
pub fn natural_frequency(gravity: f64, length: f64) -> f64 {
    (gravity / length).sqrt()
}

/// Position of the bob in its own swing plane at simulated time `t`
pub fn local_position(
    t: f64,
    amplitude: f64,
    natural_frequency: f64,
    eccentricity: f64,
) -> LocalPosition {
    let (sin_p, cos_p) = (natural_frequency * t).sin_cos();
    LocalPosition {
        x: amplitude * cos_p,
        y: amplitude * eccentricity * sin_p,
    }
}

/// Precession angular velocity `ωp = ωe · sin(latitude)` in rad/s
pub fn angular_velocity(latitude_degrees: f64) -> f64 {
    // sin(0.0) is exactly 0.0, so the equator never drifts
    EARTH_ANGULAR_RATE * latitude_degrees.to_radians().sin()
}

/// Cumulative precession angle in radians, never wrapped
pub fn precession_angle(simulated_time: f64, latitude_degrees: f64, speed_factor: f64) -> f64 {
    angular_velocity(latitude_degrees) * simulated_time * speed_factor
}

/// Hours of accelerated time for the swing plane to turn a full circle.
///
/// Returns `None` close to the equator, where the period is unbounded.
pub fn precession_period_hours(latitude_degrees: f64) -> Option<f64> {
    let sin_lat = latitude_degrees.to_radians().sin().abs();
    if sin_lat < MIN_PRECESSION_SINE {
        None
    } else {
        Some(SIDEREAL_DAY / 3600.0 / sin_lat)
    }
}

/// Apparent sense of precession when seen from above
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSense {
    Clockwise,
    CounterClockwise,
    Stationary,
}

impl RotationSense {
    pub fn for_latitude(latitude_degrees: f64) -> Self {
        if latitude_degrees > 0.0 {
            RotationSense::Clockwise
        } else if latitude_degrees < 0.0 {
            RotationSense::CounterClockwise
        } else {
            RotationSense::Stationary
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RotationSense::Clockwise => "clockwise",
            RotationSense::CounterClockwise => "counter-clockwise",
            RotationSense::Stationary => "none",
        }
    }
}

/// Named latitudes reachable with a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPreset {
    Equator,
    MidLatitude,
    Pole,
}

impl LocationPreset {
    pub fn latitude(self, config: &PendulumConfig) -> f64 {
        match self {
            LocationPreset::Equator => 0.0,
            LocationPreset::MidLatitude => config.mid_latitude,
            LocationPreset::Pole => 90.0,
        }
    }
}
