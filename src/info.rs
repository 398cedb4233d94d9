//! Educational text for the information panel, derived from latitude and mode.

use crossterm::style::Color;

use crate::math::{wrap_angle, FrameMode};
use crate::physics::{angular_velocity, precession_period_hours, RotationSense};

/// Latitudes closer to the equator than this are shown as "equator"
const EQUATOR_BAND: f64 = 5.0;
/// Latitudes closer to a pole than this are shown as "pole"
const POLE_BAND: f64 = 85.0;

/// Broad region the latitude falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Equator,
    MidLatitude,
    Pole,
    /// Fixed mode, where the text explains the frame instead of the place
    FixedFrame,
}

/// Panel contents for the current latitude and mode
#[derive(Debug, Clone, PartialEq)]
pub struct LocationInfo {
    pub region: Region,
    pub name: &'static str,
    pub color: Color,
    pub description: &'static str,
    pub explanation: &'static str,
    pub period: String,
}

impl LocationInfo {
    pub fn new(latitude_degrees: f64, mode: FrameMode) -> Self {
        let region = if mode == FrameMode::Fixed {
            Region::FixedFrame
        } else if latitude_degrees.abs() < EQUATOR_BAND {
            Region::Equator
        } else if latitude_degrees.abs() > POLE_BAND {
            Region::Pole
        } else {
            Region::MidLatitude
        };
        let period = match (region, precession_period_hours(latitude_degrees)) {
            (Region::FixedFrame, _) => "N/A".to_owned(),
            (_, None) => "Infinite".to_owned(),
            (_, Some(hours)) => format!("{hours:.1} hrs"),
        };
        let (name, color, description, explanation) = match region {
            Region::FixedFrame => (
                "FIXED PENDULUM",
                Color::Rgb { r: 168, g: 85, b: 247 },
                "Earth rotates beneath pendulum",
                "Pendulum stays fixed while Earth rotates",
            ),
            Region::Equator => (
                "EQUATOR",
                Color::Rgb { r: 239, g: 68, b: 68 },
                "No visible rotation",
                "Pendulum plane stays aligned with Earth",
            ),
            Region::Pole => (
                "POLE",
                Color::Rgb { r: 34, g: 197, b: 94 },
                "Full rotation visible",
                "Complete 360° rotation in one sidereal day",
            ),
            Region::MidLatitude => (
                "MID-LATITUDE",
                Color::Rgb { r: 234, g: 179, b: 8 },
                "Partial rotation visible",
                "Rotation rate depends on latitude",
            ),
        };
        LocationInfo {
            region,
            name,
            color,
            description,
            explanation,
            period,
        }
    }
}

/// Text lines shown in the information panel
pub fn panel_lines(latitude_degrees: f64, mode: FrameMode, precession_angle: f64) -> Vec<String> {
    let info = LocationInfo::new(latitude_degrees, mode);
    let hemisphere = if latitude_degrees >= 0.0 { 'N' } else { 'S' };
    let mut lines = vec![
        format!("Location: {}", info.name),
        format!("Latitude: {:.1}°{}", latitude_degrees.abs(), hemisphere),
        info.description.to_owned(),
        info.explanation.to_owned(),
        format!("Precession period: {}", info.period),
        format!(
            "Precession: {:.1}°  ({})",
            wrap_angle(precession_angle).to_degrees(),
            RotationSense::for_latitude(latitude_degrees).label()
        ),
        format!("ωp = {:.3e} rad/s", angular_velocity(latitude_degrees)),
    ];
    match info.region {
        Region::Equator => lines.push("No precession at the equator".to_owned()),
        Region::Pole => lines.push("Swing plane turns at Earth's own rate".to_owned()),
        Region::MidLatitude | Region::FixedFrame => {}
    }
    lines
}
