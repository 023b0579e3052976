use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event};
use crossterm::terminal;
use grid_snake::config::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TICK_INTERVAL_MS, FRAME_POLL_INTERVAL_MS,
    GROWTH_PER_FOOD, MIN_TICK_INTERVAL_MS, SessionConfig, TICK_INTERVAL_STEP_MS,
};
use grid_snake::controller::Controller;
use grid_snake::grid::Grid;
use grid_snake::input::{Command, Direction, SwipeTracker, command_for_key};
use grid_snake::renderer::fit_grid;
use grid_snake::score::{FileScoreStore, MemoryScoreStore, ScoreStore};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Playfield width in cells (defaults to the terminal width).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    width: Option<u16>,

    /// Playfield height in cells (defaults to the terminal height).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    height: Option<u16>,

    /// Starting tick interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    tick_ms: u64,

    /// Fastest tick interval the speed ramp may reach.
    #[arg(long, default_value_t = MIN_TICK_INTERVAL_MS)]
    min_tick_ms: u64,

    /// Tick interval reduction per food eaten.
    #[arg(long, default_value_t = TICK_INTERVAL_STEP_MS)]
    tick_step_ms: u64,

    /// Segments gained per food eaten.
    #[arg(long, default_value_t = GROWTH_PER_FOOD)]
    growth: u32,

    /// Heading of a new snake; it waits for the first key press when omitted.
    #[arg(long, value_enum)]
    initial_heading: Option<HeadingArg>,

    /// Start each session paused.
    #[arg(long)]
    start_paused: bool,

    /// Seed for reproducible food and spawn positions.
    #[arg(long)]
    seed: Option<u64>,

    /// High score file (defaults to the platform data directory).
    #[arg(long, conflicts_with = "no_save")]
    score_file: Option<PathBuf>,

    /// Keep the high score in memory only.
    #[arg(long)]
    no_save: bool,

    /// Write logs to this file; filter with RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeadingArg {
    Up,
    Right,
    Down,
    Left,
}

impl From<HeadingArg> for Direction {
    fn from(heading: HeadingArg) -> Self {
        match heading {
            HeadingArg::Up => Self::Up,
            HeadingArg::Right => Self::Right,
            HeadingArg::Down => Self::Down,
            HeadingArg::Left => Self::Left,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    if cli.min_tick_ms > cli.tick_ms {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--min-tick-ms must not exceed --tick-ms",
        ));
    }

    let config = SessionConfig {
        growth_per_food: cli.growth,
        initial_tick_interval_ms: cli.tick_ms,
        min_tick_interval_ms: cli.min_tick_ms,
        tick_interval_step_ms: cli.tick_step_ms,
        initial_heading: cli.initial_heading.map(Direction::from),
        start_paused: cli.start_paused,
    };
    let grid = initial_grid(&cli)?;
    let pinned = (cli.width, cli.height);

    if cli.no_save {
        let controller = build_controller(grid, config, MemoryScoreStore::default(), cli.seed);
        return run(controller, pinned);
    }

    let store = cli
        .score_file
        .clone()
        .map_or_else(FileScoreStore::default, FileScoreStore::new);
    // Surface a broken score file before raw mode swallows stderr.
    if let Err(error) = store.load() {
        eprintln!("warning: {error} ({})", store.path().display());
    }

    run(build_controller(grid, config, store, cli.seed), pinned)
}

fn build_controller<S: ScoreStore>(
    grid: Grid,
    config: SessionConfig,
    store: S,
    seed: Option<u64>,
) -> Controller<S> {
    match seed {
        Some(seed) => Controller::with_seed(grid, config, store, seed),
        None => Controller::new(grid, config, store),
    }
}

/// `pinned` holds the `--width`/`--height` values; resizes only refit the others.
fn run<S: ScoreStore>(
    mut controller: Controller<S>,
    pinned: (Option<u16>, Option<u16>),
) -> io::Result<()> {
    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    let mut swipes = SwipeTracker::default();
    let mut last_tick = Instant::now();

    loop {
        session.draw(&controller.snapshot(), controller.last_event())?;

        if event::poll(Duration::from_millis(FRAME_POLL_INTERVAL_MS))? {
            match event::read()? {
                Event::Key(key) => match command_for_key(key) {
                    Some(Command::Quit) => break,
                    Some(command) => controller.handle(command),
                    None => {}
                },
                Event::Mouse(mouse) => {
                    if let Some(direction) = swipes.on_mouse(mouse) {
                        controller.handle(Command::Turn(direction));
                    }
                }
                Event::Resize(columns, rows) if pinned.0.is_none() || pinned.1.is_none() => {
                    match fit_grid(columns, rows, pinned.0, pinned.1) {
                        Ok(grid) => {
                            controller.resize(grid);
                        }
                        Err(error) => warn!(%error, "terminal too small, keeping playfield"),
                    }
                }
                _ => {}
            }
        }

        // Re-read every frame so a ramped interval applies from the next tick.
        if last_tick.elapsed() >= controller.tick_interval() {
            controller.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Uses explicit dimensions where given and fills the rest from the terminal size.
fn initial_grid(cli: &Cli) -> io::Result<Grid> {
    terminal::size()
        .ok()
        .and_then(|(columns, rows)| fit_grid(columns, rows, cli.width, cli.height).ok())
        .map_or_else(
            || {
                Grid::new(
                    cli.width.unwrap_or(DEFAULT_GRID_WIDTH),
                    cli.height.unwrap_or(DEFAULT_GRID_HEIGHT),
                )
            },
            Ok,
        )
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))
}

/// Logs go to `path` when given; the TUI owns stdout and stderr otherwise.
fn init_tracing(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::options().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
