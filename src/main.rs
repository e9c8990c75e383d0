mod arena;
mod config;
mod food;
mod game;
mod input;
mod segment;
mod snake;
mod sound;
mod term;
mod ticker;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{poll, read, Event};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use game::{Command, GameSession};
use sound::{Speaker, Volume};
use term::TermManager;
use ticker::Ticker;

pub type TermInt = u16;
pub type TermCoords = (u16, u16);
pub type GridInt = i32;
pub type Coords = (GridInt, GridInt);

const INPUT_POLL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "snake-hunt")]
#[command(version, about = "Grid snake for the terminal")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = config::DEFAULT_COLUMNS)]
    columns: GridInt,

    /// Grid height in cells
    #[arg(long, default_value_t = config::DEFAULT_ROWS)]
    rows: GridInt,

    /// Game updates per second
    #[arg(long, default_value_t = config::DEFAULT_TICKS_PER_SEC)]
    tps: u32,

    /// Length of a freshly spawned snake
    #[arg(long, default_value_t = config::INITIAL_SNAKE_LENGTH)]
    initial_length: usize,

    /// Head segments skipped by the self-collision check
    #[arg(long, default_value_t = config::SELF_COLLISION_EXEMPT_SEGMENTS)]
    exempt_segments: usize,

    /// Terminal columns per grid cell
    #[arg(long, default_value_t = config::DEFAULT_CELL_WIDTH)]
    cell_width: u16,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            columns: self.columns,
            rows: self.rows,
            cell_width: self.cell_width,
            ticks_per_sec: self.tps,
            initial_length: self.initial_length,
            exempt_segments: self.exempt_segments,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config();
    config.validate().context("Invalid game settings")?;

    let mut term = TermManager::new(&config, Speaker::new(Volume::Mute))?;
    let result = match term.setup() {
        Ok(()) => play(term, &config),
        Err(e) => Err(e),
    };

    // The game screen has to go away even when the game failed
    term::restore()?;
    result
}

fn play(term: TermManager, config: &GameConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let session = GameSession::new(config, term, StdRng::from_entropy());
    let ticker = Ticker::new(session, rx, config);

    let handle = thread::Builder::new()
        .name("ticker".into())
        .spawn(move || ticker.run())
        .context("Failed to start ticker thread")?;

    let pumped = pump_input(&tx, || handle.is_finished());
    drop(tx);

    let session = handle.join().map_err(|_| anyhow!("ticker thread panicked"))??;
    info!(score = session.score(), "game closed");
    pumped
}

/// Forwards key presses to the ticker until the player quits or the ticker stops.
fn pump_input(tx: &mpsc::Sender<Command>, finished: impl Fn() -> bool) -> Result<()> {
    while !finished() {
        if !poll(INPUT_POLL).context("Failed to poll input")? {
            continue;
        }

        if let Event::Key(key) = read().context("Failed to read input")? {
            if let Some(command) = input::command_for(key) {
                if tx.send(command).is_err() || command == Command::Shutdown {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
