mod clock;
mod config;
mod error;
mod graphics;
mod info;
mod input;
mod math;
mod physics;
mod state;
mod trail;
mod widget;

use std::fs::File;
use std::io::{self, Write};
use std::panic;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Args;
use crate::error::SimError;
use crate::state::SimulationState;
use crate::widget::{Flow, PendulumWidget};

/// Terminal size used when it cannot be queried
const FALLBACK_SIZE: (usize, usize) = (80, 24);

/// Installs a file logger when `--log-file` is given.
///
/// Stdout belongs to the pendulum view, so without a log file nothing is
/// subscribed and events are dropped.
fn init_logging(args: &Args) -> Result<(), SimError> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| SimError::Logging(err.to_string()))
}

/// Current terminal size as (columns, rows)
fn terminal_size() -> (usize, usize) {
    if let Some(size) = termsize::get() {
        return (size.cols as usize, size.rows as usize);
    }
    terminal::size()
        .map(|(cols, rows)| (cols as usize, rows as usize))
        .unwrap_or(FALLBACK_SIZE)
}

/// Leaves the alternate screen, shows the cursor and drops raw mode
fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}

/// Restores the terminal before the default panic message is printed
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut io::stdout());
        default_hook(panic_info);
    }));
}

/// Runs the frame loop until the user quits
fn run<W: Write>(
    out: &mut W,
    state: &mut SimulationState,
    widget: &mut PendulumWidget,
    frame_budget: Duration,
) -> Result<(), SimError> {
    let mut last_frame = Instant::now();
    loop {
        let frame_start = Instant::now();
        let wall_delta = frame_start.duration_since(last_frame).as_secs_f64();
        last_frame = frame_start;

        let output = state.tick(wall_delta)?;
        widget.update(state, &output);
        widget.paint(state, &output);
        widget.render(out)?;
        out.flush()?;

        // Handle input for the rest of the frame
        let deadline = frame_start + frame_budget;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                break;
            }
            if widget.event(&event::read()?, state) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

/// Main function
fn main() -> Result<(), SimError> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut state = args.build_state()?;
    info!(
        latitude = state.latitude(),
        speed_factor = state.speed_factor(),
        mode = state.mode().label(),
        fps = args.fps,
        "starting simulation"
    );

    let (width, height) = terminal_size();
    let mut widget = PendulumWidget::new(width, height, args.trail_length);

    let mut stdout = io::stdout();
    install_panic_hook();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run(&mut stdout, &mut state, &mut widget, args.frame_budget());

    // Restore the terminal even if the loop failed
    let restored = restore_terminal(&mut stdout);

    if let Err(err) = &result {
        error!(%err, "simulation stopped");
    }
    info!(time = state.simulated_time(), "exiting");
    result?;
    restored?;
    Ok(())
}
