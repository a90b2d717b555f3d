mod graphics;
mod state;
mod widget;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use cycloid::{export, SceneConfig};
use state::{AppState, SceneKind};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;
use widget::{Control, SceneWidget};

/// Console cycloid demo
///
/// Animates a wheel rolling along a line or along the rim of another wheel and
/// traces the curve drawn by a point on its rim.
#[derive(Parser, Debug)]
#[command(name = "cycloid", version, about, long_about = None)]
struct Cli {
    /// Which animation to run
    #[arg(long, value_enum, default_value_t = SceneKind::Circle)]
    scene: SceneKind,

    /// Radius of the rolling wheel (line) or of the track wheel (circle)
    #[arg(long, default_value_t = 50.0)]
    radius: f64,

    /// Radius of the wheel rolling on the track wheel
    #[arg(long, default_value_t = 15.0)]
    child_radius: f64,

    /// Degrees turned per frame
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    speed: f64,

    /// Frames per second of the interactive animation
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Distance the line scene rolls before starting over
    #[arg(long, default_value_t = 300.0)]
    track_length: f64,

    /// Run this many frames without a terminal UI, then exit
    #[arg(long)]
    frames: Option<u64>,

    /// Write the traced curve to this SVG file after a headless run
    #[arg(long, requires = "frames")]
    svg: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with the debug overlay shown
    #[arg(long)]
    debug: bool,
}

/// Main function
fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = SceneConfig::new()
        .with_radius(cli.radius)
        .with_child_radius(cli.child_radius)
        .with_track_length(cli.track_length);
    let mut state =
        AppState::new(cli.scene, config, cli.speed).context("invalid scene geometry")?;
    state.debug = cli.debug;

    match cli.frames {
        Some(frames) => run_headless(&mut state, frames, cli.svg.as_deref()),
        None => run_interactive(&mut state, cli.fps),
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Steps the scene `frames` times and optionally exports the traced curve
fn run_headless(state: &mut AppState, frames: u64, svg: Option<&Path>) -> Result<()> {
    info!(scene = state.scene.name(), frames, "running headless");
    for _ in 0..frames {
        state.tick();
    }

    let scene = &state.scene;
    println!(
        "{}: {} frames since restart, {} path points",
        scene.name(),
        scene.frame(),
        scene.path().len()
    );

    if let Some(path) = svg {
        let document = export::path_to_svg(scene.path(), &scene.wheels());
        export::save(path, &document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(file = %path.display(), "wrote traced curve");
    }
    Ok(())
}

/// Restores the terminal when dropped, including on early returns
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .context("failed to enter alternate screen")?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn run_interactive(state: &mut AppState, fps: u32) -> Result<()> {
    let size = termsize::get()
        .map(|size| (size.cols, size.rows))
        .unwrap_or((80, 24));
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(fps));
    info!(scene = state.scene.name(), fps, ?size, "starting animation");

    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let mut widget = SceneWidget::new(size);

    loop {
        let started = Instant::now();
        state.tick();
        widget.paint(&mut stdout, state)?;
        stdout.flush()?;

        let mut timeout = frame_time.saturating_sub(started.elapsed());
        while event::poll(timeout)? {
            if widget.event(&event::read()?, state) == Control::Quit {
                info!("quit requested");
                return Ok(());
            }
            timeout = Duration::ZERO;
        }
    }
}
