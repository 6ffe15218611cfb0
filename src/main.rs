use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use snake_world::config::{FRAME_INTERVAL_MS, GameConfig, load_config};
use snake_world::error::AppError;
use snake_world::game_loop::FixedStepFrames;
use snake_world::logging::{LogTarget, init_logging};
use snake_world::renderer::TerminalView;
use snake_world::setup::{Session, build_session};
use snake_world::terminal_runtime::{TerminalFrames, TerminalSession, install_panic_hook};
use snake_world::view::TextView;

#[derive(Debug, Parser)]
#[command(version, about = "Snakes on a grid, eliminated on collision")]
struct Cli {
    /// Game config file (JSON). Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Milliseconds between simulation ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Extra wall-avoiding snakes placed at random.
    #[arg(long, default_value_t = 0)]
    bots: usize,

    /// Seed for bot placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run without a terminal UI, printing a text frame per tick.
    #[arg(long)]
    headless: bool,

    /// Ticks to simulate in headless mode.
    #[arg(long, default_value_t = 20, requires = "headless")]
    ticks: u64,

    /// Write logs to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let target = match (&cli.log_file, cli.headless) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Off,
    };
    init_logging(target)?;

    let config = resolve_config(&cli)?;
    let session = build_session(&config, cli.bots, cli.seed)?;

    if cli.headless {
        run_headless(session, config.tick_interval(), cli.ticks);
        return Ok(());
    }

    install_panic_hook();
    run_terminal(session)?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, AppError> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }

    config.validate()?;
    Ok(config)
}

fn run_terminal(session: Session) -> io::Result<()> {
    let Session { mut game, router } = session;

    let terminal = TerminalSession::enter()?;
    game.register_view(Box::new(TerminalView::new(terminal)));

    let mut frames = TerminalFrames::new(router, Duration::from_millis(FRAME_INTERVAL_MS));
    game.run(&mut frames);
    Ok(())
}

fn run_headless(session: Session, tick_interval: Duration, ticks: u64) {
    let Session { mut game, .. } = session;
    game.register_view(Box::new(TextView::new(io::stdout())));

    // The last frame lands just past the final tick's threshold.
    let frame_step = Duration::from_millis(FRAME_INTERVAL_MS);
    let until = tick_interval
        .checked_mul(u32::try_from(ticks).unwrap_or(u32::MAX))
        .map_or(Duration::MAX, |total| total.saturating_add(frame_step));
    let mut frames = FixedStepFrames::new(frame_step, until);
    game.run(&mut frames);
}
