use std::io::Write;
use std::time::Instant;

use crossterm::event::Event;
use crossterm::style::Color;
use tracing::{debug, info};

use crate::graphics::{lerp_color, Canvas};
use crate::info::{panel_lines, LocationInfo};
use crate::input::{map_key, Command};
use crate::math::{rotate, FrameMode, WorldPosition};
use crate::physics::angular_velocity;
use crate::state::{SimulationState, TickOutput};
use crate::trail::Trail;

/// Floor radius in world units; the default amplitude of 1.0 swings to
/// about three quarters of the floor
const FLOOR_RADIUS: f64 = 1.3;
/// Width of the information panel in columns
const PANEL_WIDTH: usize = 44;
/// Rows reserved for the title bar and the key help line
const CHROME_ROWS: usize = 2;

const FLOOR: Color = Color::Rgb { r: 71, g: 85, b: 105 };
const COMPASS: Color = Color::Rgb { r: 148, g: 163, b: 184 };
const ACCENT: Color = Color::Rgb { r: 234, g: 179, b: 8 };
const PENDULUM: Color = Color::Rgb { r: 239, g: 68, b: 68 };
const PENDULUM_FIXED: Color = Color::Rgb { r: 168, g: 85, b: 247 };
const WIRE: Color = Color::Rgb { r: 203, g: 213, b: 225 };
const TEXT: Color = Color::Rgb { r: 248, g: 250, b: 252 };
const MUTED: Color = Color::Rgb { r: 148, g: 163, b: 184 };
const TRAIL_START: (u8, u8, u8) = (59, 130, 246);
const TRAIL_END: (u8, u8, u8) = (168, 85, 247);

/// What the frame loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Top-down view of the pendulum with floor, compass and panels
pub struct PendulumWidget {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Recent bob positions, Normal mode only
    trail: Trail,
    /// Show the information panel
    show_info: bool,
    /// Show the debug overlay
    debug: bool,
    canvas: Canvas,
}

impl PendulumWidget {
    pub fn new(width: usize, height: usize, trail_length: usize) -> Self {
        PendulumWidget {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            trail: Trail::new(trail_length),
            show_info: true,
            debug: false,
            canvas: Canvas::new(width, height),
        }
    }

    /// Handles a terminal event, writing parameter changes into `state`
    pub fn event(&mut self, event: &Event, state: &mut SimulationState) -> Flow {
        match event {
            Event::Key(key_event) => {
                let Some(command) = map_key(key_event) else {
                    return Flow::Continue;
                };
                debug!(?command, "key command");
                match command {
                    Command::Quit => return Flow::Quit,
                    Command::ToggleInfo => self.show_info = !self.show_info,
                    Command::ToggleDebug => self.debug = !self.debug,
                    _ => {
                        if command.apply(state) {
                            self.trail.clear();
                        }
                    }
                }
            }
            Event::Resize(width, height) => {
                info!(width, height, "terminal resized");
                self.layout(*width as usize, *height as usize);
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Adopts a new terminal size.
    ///
    /// The trail holds world positions and is remapped on every paint, so it
    /// survives a resize.
    pub fn layout(&mut self, width: usize, height: usize) {
        self.canvas.resize(width, height);
    }

    /// Records the bob position for the trail
    pub fn update(&mut self, state: &SimulationState, output: &TickOutput) {
        if state.mode() == FrameMode::Normal && !state.is_paused() {
            self.trail.push(output.world_position.x, output.world_position.y);
        }
    }

    /// Centre and radii (columns, rows) of the floor disc
    fn floor_geometry(&self) -> (f64, f64, f64, f64) {
        let panel = if self.show_info && self.canvas.width() > PANEL_WIDTH * 2 {
            PANEL_WIDTH
        } else {
            0
        };
        let area_width = self.canvas.width().saturating_sub(panel) as f64;
        let area_height = self.canvas.height().saturating_sub(CHROME_ROWS) as f64;
        // Cells are about twice as tall as they are wide
        let ry = ((area_height / 2.0) - 1.0).min(area_width / 4.0 - 1.0).max(1.0);
        let rx = ry * 2.0;
        let cx = area_width / 2.0;
        let cy = 1.0 + area_height / 2.0;
        (cx, cy, rx, ry)
    }

    /// Maps world coordinates to fractional cell coordinates
    fn to_screen(&self, p: WorldPosition) -> (f64, f64) {
        let (cx, cy, rx, ry) = self.floor_geometry();
        (cx + p.x / FLOOR_RADIUS * rx, cy + p.y / FLOOR_RADIUS * ry)
    }

    /// Paints one frame into the off-screen canvas
    pub fn paint(&mut self, state: &SimulationState, output: &TickOutput) {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        self.canvas.clear();
        self.draw_title(state);
        self.draw_floor(output.frame_rotation);
        self.draw_inertial_reference();
        if state.mode() == FrameMode::Normal {
            self.draw_trail();
        }
        self.draw_pendulum(output.world_position, state.mode());
        if self.show_info {
            self.draw_info(state, output);
        }
        self.draw_help();

        if self.debug {
            self.draw_debug(state, output);
        }

        // Display 'PAUSED' if the simulation is paused
        if state.is_paused() {
            let (cx, cy, _, _) = self.floor_geometry();
            let text = "  PAUSED  ";
            let x = cx as isize - text.len() as isize / 2;
            self.canvas.draw_text(x, cy as isize, text, TEXT);
        }
    }

    /// Queues the painted frame to the terminal
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        self.canvas.render(out)
    }

    fn draw_title(&mut self, state: &SimulationState) {
        let params = state.params();
        let title = format!(
            "Foucault Pendulum | lat {:+.1}° | speed x{:.0} | {} frame",
            params.latitude_degrees,
            params.speed_factor,
            params.mode.label()
        );
        self.canvas.draw_text(1, 0, &title, TEXT);
    }

    fn draw_floor(&mut self, frame_rotation: f64) {
        let (cx, cy, rx, ry) = self.floor_geometry();
        for fraction in [0.25, 0.5, 0.75] {
            self.canvas
                .draw_ellipse(cx, cy, rx * fraction, ry * fraction, '.', FLOOR);
        }
        self.canvas.draw_ellipse(cx, cy, rx, ry, 'o', FLOOR);

        // Compass directions in screen orientation, y pointing down
        let directions = [('N', 0.0, -1.0), ('E', 1.0, 0.0), ('S', 0.0, 1.0), ('W', -1.0, 0.0)];
        for (label, dx, dy) in directions {
            let [dx, dy] = rotate(dx, dy, frame_rotation);
            let end_x = cx + dx * rx * 0.85;
            let end_y = cy + dy * ry * 0.85;
            self.canvas.draw_line(cx, cy, end_x, end_y, '·', COMPASS);
            self.canvas.plot_f(end_x, end_y, label, TEXT);
        }
        self.canvas.plot_f(cx, cy, '+', ACCENT);
    }

    fn draw_inertial_reference(&mut self) {
        let (cx, cy, rx, ry) = self.floor_geometry();
        let x = (cx - rx).max(1.0) as isize;
        let y = (cy - ry).max(2.0) as isize;
        self.canvas.draw_text(x, y - 1, "Inertial Frame", ACCENT);
        self.canvas.draw_text(x, y, "━━━━━━━━━▶", ACCENT);
    }

    fn draw_trail(&mut self) {
        if self.trail.is_empty() {
            return;
        }
        let segments: Vec<_> = self.trail.segments().collect();
        for (a, b, age) in segments {
            let (x0, y0) = self.to_screen(WorldPosition::new(a[0], a[1]));
            let (x1, y1) = self.to_screen(WorldPosition::new(b[0], b[1]));
            let ch = if age < 0.5 { '.' } else { '•' };
            self.canvas
                .draw_line(x0, y0, x1, y1, ch, lerp_color(TRAIL_START, TRAIL_END, age));
        }
    }

    fn draw_pendulum(&mut self, bob: WorldPosition, mode: FrameMode) {
        let (cx, cy, _, _) = self.floor_geometry();
        let (bx, by) = self.to_screen(bob);
        // Seen from above, the wire runs from the pivot straight down to the bob
        self.canvas.draw_line(cx, cy, bx, by, '·', WIRE);
        let (ch, color) = match mode {
            FrameMode::Normal => ('O', PENDULUM),
            FrameMode::Fixed => ('@', PENDULUM_FIXED),
        };
        self.canvas.plot_f(bx, by, ch, color);
    }

    fn draw_info(&mut self, state: &SimulationState, output: &TickOutput) {
        if self.canvas.width() <= PANEL_WIDTH * 2 {
            return;
        }
        let x = (self.canvas.width() - PANEL_WIDTH + 1) as isize;
        let info = LocationInfo::new(state.latitude(), state.mode());
        self.canvas.draw_text(x, 2, info.name, info.color);
        let lines = panel_lines(state.latitude(), state.mode(), output.precession_angle);
        for (row, line) in lines.iter().enumerate() {
            self.canvas.draw_text(x, 4 + row as isize, line, TEXT);
        }
        let hours = output.simulated_time * state.speed_factor() / 3600.0;
        self.canvas.draw_text(
            x,
            5 + lines.len() as isize,
            &format!("Earth time elapsed: {hours:.1} hrs"),
            MUTED,
        );
    }

    fn draw_help(&mut self) {
        let help = "[1] Equator [2] Mid-lat [3] Pole  [←/→] Latitude [↑/↓] Speed  \
                    [F] Frame [Space] Pause [R] Reset [I] Info [D] Debug [Q] Quit";
        let y = self.canvas.height() as isize - 1;
        self.canvas.draw_text(1, y, help, MUTED);
    }

    fn draw_debug(&mut self, state: &SimulationState, output: &TickOutput) {
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("FPS: {:.2}", self.fps),
            format!(
                "t: {:.3} s (Δt {:.4} s)",
                output.simulated_time,
                state.last_wall_delta()
            ),
            format!(
                "local: ({:+.3}, {:+.3})",
                output.local_position.x, output.local_position.y
            ),
            format!("θ: {:.6} rad", output.precession_angle),
            format!("ωp: {:.4e} rad/s", angular_velocity(state.latitude())),
            format!(
                "ω0: {:.4} rad/s (L = {} m)",
                state.natural_frequency(),
                state.config().length
            ),
            format!("Trail: {} points", self.trail.len()),
            format!(
                "Size: {}x{}",
                self.canvas.width(),
                self.canvas.height()
            ),
        ];
        for (row, line) in lines.iter().enumerate() {
            self.canvas.draw_text(1, 2 + row as isize, line, MUTED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        assert_eq!(widget.event(&key('q'), &mut state), Flow::Quit);
        assert_eq!(widget.event(&key('1'), &mut state), Flow::Continue);
        assert_eq!(state.latitude(), 0.0);
    }

    #[test]
    fn trail_records_only_in_normal_mode() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        let output = state.tick(0.1).unwrap();
        widget.update(&state, &output);
        assert_eq!(widget.trail.len(), 1);

        widget.event(&key('f'), &mut state);
        assert!(widget.trail.is_empty());
        let output = state.tick(0.1).unwrap();
        widget.update(&state, &output);
        assert!(widget.trail.is_empty());
    }

    #[test]
    fn speed_change_keeps_trail() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        let output = state.tick(0.1).unwrap();
        widget.update(&state, &output);
        let up = Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        widget.event(&up, &mut state);
        assert_eq!(widget.trail.len(), 1);
    }

    #[test]
    fn resize_keeps_trail_and_remaps_it() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        let output = state.tick(0.1).unwrap();
        widget.update(&state, &output);
        let before = widget.to_screen(output.world_position);

        widget.event(&Event::Resize(60, 20), &mut state);
        assert_eq!(widget.trail.len(), 1);
        assert_ne!(widget.to_screen(output.world_position), before);
    }

    #[test]
    fn panel_toggles_are_local() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        let before = state.clone();
        widget.event(&key('i'), &mut state);
        widget.event(&key('d'), &mut state);
        assert!(!widget.show_info);
        assert!(widget.debug);
        assert_eq!(state, before);
    }

    #[test]
    fn paint_draws_bob_and_compass() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        let output = state.tick(0.0).unwrap();
        widget.paint(&state, &output);

        let (bx, by) = widget.to_screen(output.world_position);
        let bob = widget
            .canvas
            .get(bx.round() as usize, by.round() as usize)
            .unwrap();
        assert_eq!(bob.ch, 'O');

        // Normal mode keeps the compass upright
        let (cx, cy, rx, ry) = widget.floor_geometry();
        let north = widget
            .canvas
            .get(cx.round() as usize, (cy - ry * 0.85).round() as usize)
            .unwrap();
        assert_eq!(north.ch, 'N');
        let west = widget
            .canvas
            .get((cx - rx * 0.85).round() as usize, cy.round() as usize)
            .unwrap();
        assert_eq!(west.ch, 'W');
    }

    #[test]
    fn fixed_mode_turns_the_compass() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        state.preset_pole();
        state.set_speed_factor(10_000.0).unwrap();
        state.toggle_mode();
        // Advance until the floor has turned a quarter circle
        let quarter = std::f64::consts::FRAC_PI_2 / (angular_velocity(90.0) * 10_000.0);
        let mut output = state.tick(0.0).unwrap();
        while output.simulated_time < quarter {
            output = state.tick((quarter - output.simulated_time).min(0.25)).unwrap();
        }
        widget.paint(&state, &output);

        // A -90° frame rotation carries north (up) round to the west side
        let (cx, cy, rx, _) = widget.floor_geometry();
        let north = widget
            .canvas
            .get((cx - rx * 0.85).round() as usize, cy.round() as usize)
            .unwrap();
        assert_eq!(north.ch, 'N');
    }

    #[test]
    fn paint_clips_far_trail_points() {
        let mut widget = PendulumWidget::new(120, 40, 10);
        let mut state = SimulationState::default();
        let output = state.tick(0.0).unwrap();
        widget.trail.push(-1e30, 1e30);
        widget.trail.push(1e30, -1e30);
        widget.trail.push(0.0, 0.0);
        widget.paint(&state, &output);

        let (bx, by) = widget.to_screen(output.world_position);
        let bob = widget
            .canvas
            .get(bx.round() as usize, by.round() as usize)
            .unwrap();
        assert_eq!(bob.ch, 'O');
    }

    #[test]
    fn paint_survives_tiny_terminals() {
        let mut widget = PendulumWidget::new(3, 2, 10);
        let mut state = SimulationState::default();
        state.pause();
        let output = state.tick(0.1).unwrap();
        widget.paint(&state, &output);
        widget.layout(0, 0);
        widget.paint(&state, &output);
    }
}
