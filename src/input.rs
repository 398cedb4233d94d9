//! Keyboard mapping.
//!
//! Keys become [`Command`]s through a pure lookup, and commands are the only
//! way the front end writes into [`SimulationState`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::state::{SimulationState, LATITUDE_RANGE, SPEED_FACTOR_RANGE};

/// Latitude change per arrow key press, in degrees
pub const LATITUDE_STEP: f64 = 5.0;
/// Speed factor change per arrow key press
pub const SPEED_STEP: f64 = 100.0;

/// An action requested by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    PresetEquator,
    PresetMidLatitude,
    PresetPole,
    ToggleMode,
    TogglePause,
    Reset,
    ToggleInfo,
    ToggleDebug,
    /// Move the latitude by this many degrees, clamped to the valid range
    AdjustLatitude(f64),
    /// Move the speed factor by this amount, clamped to the valid range
    AdjustSpeed(f64),
    Quit,
}

/// Maps a key press to a command
pub fn map_key(event: &KeyEvent) -> Option<Command> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            _ => None,
        };
    }
    match event.code {
        KeyCode::Char('1') => Some(Command::PresetEquator),
        KeyCode::Char('2') => Some(Command::PresetMidLatitude),
        KeyCode::Char('3') => Some(Command::PresetPole),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::ToggleMode),
        KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
        KeyCode::Char('i') | KeyCode::Char('I') => Some(Command::ToggleInfo),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::ToggleDebug),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Left => Some(Command::AdjustLatitude(-LATITUDE_STEP)),
        KeyCode::Right => Some(Command::AdjustLatitude(LATITUDE_STEP)),
        KeyCode::Down => Some(Command::AdjustSpeed(-SPEED_STEP)),
        KeyCode::Up => Some(Command::AdjustSpeed(SPEED_STEP)),
        _ => None,
    }
}

impl Command {
    /// Applies the command's parameter change to the simulation.
    ///
    /// Front-end-only commands (info, debug, quit) leave the state alone.
    /// Returns `true` when the drawn trail no longer matches the new state
    /// and should be cleared.
    pub fn apply(self, state: &mut SimulationState) -> bool {
        match self {
            Command::PresetEquator => {
                state.preset_equator();
                true
            }
            Command::PresetMidLatitude => {
                state.preset_mid_latitude();
                true
            }
            Command::PresetPole => {
                state.preset_pole();
                true
            }
            Command::ToggleMode => {
                state.toggle_mode();
                true
            }
            Command::TogglePause => {
                state.toggle_pause();
                false
            }
            Command::Reset => {
                state.reset();
                true
            }
            Command::AdjustLatitude(delta) => {
                let (min, max) = LATITUDE_RANGE;
                let target = (state.latitude() + delta).clamp(min, max);
                if target == state.latitude() {
                    return false;
                }
                match state.set_latitude(target) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(%err, "latitude change ignored");
                        false
                    }
                }
            }
            Command::AdjustSpeed(delta) => {
                let (min, max) = SPEED_FACTOR_RANGE;
                let target = (state.speed_factor() + delta).clamp(min, max);
                if let Err(err) = state.set_speed_factor(target) {
                    warn!(%err, "speed change ignored");
                }
                // The swing shape does not depend on speed, keep the trail
                false
            }
            Command::ToggleInfo | Command::ToggleDebug | Command::Quit => false,
        }
    }
}
