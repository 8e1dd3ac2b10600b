//! Blockfall runner (default binary).
//!
//! `play` drives the board from the keyboard and draws it with the
//! framebuffer renderer. `headless` folds newline-separated commands from
//! stdin and prints the resulting snapshot as JSON.

use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

use blockfall::core::{Board, GameConfig, Lcg};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::Command;

#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about)]
struct Cli {
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity level (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,

    #[arg(long, global = true, help = "Path to a JSON board configuration")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Shape sequence seed (defaults to the clock)")]
    seed: Option<u32>,

    #[arg(
        long,
        global = true,
        help = "Write logs to this file (play mode logs nowhere without it)"
    )]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play in the terminal.
    Play,
    /// Apply commands read from stdin, one per line, and print the snapshot.
    Headless {
        #[arg(long, help = "Print one JSON line per command instead of the final state")]
        every: bool,

        #[arg(long, help = "Pretty-print the final snapshot")]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let headless = matches!(cli.command, Some(Commands::Headless { .. }));
    init_logging(cli.verbose, cli.log_file.as_deref(), headless)?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let seed = cli.seed.unwrap_or_else(clock_seed);
    let board = Board::new(config, seed).context("invalid board configuration")?;
    info!(seed, width = config.width, height = config.height, "board ready");

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => play(board, config.tick_ms),
        Commands::Headless { every, pretty } => headless_run(board, every, pretty),
    }
}

fn init_logging(verbose: u8, log_file: Option<&std::path::Path>, headless: bool) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // The terminal owns stdout while playing, so logs need a file there.
    let writer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if headless => BoxMakeWriter::new(io::stderr),
        None => return Ok(()),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .with(level)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or_default();
    Lcg::hash(nanos)
}

fn play(board: Board, tick_ms: u32) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, board, tick_ms);

    // Always try to restore terminal state.
    let _ = term.exit();
    let board = result?;
    info!(
        score = board.score(),
        high_score = board.high_score(),
        "session ended"
    );
    println!("score {}  high {}", board.score(), board.high_score());
    Ok(())
}

fn run(term: &mut TerminalRenderer, mut board: Board, tick_ms: u32) -> Result<Board> {
    let view = GameView::default();
    let tick_duration = Duration::from_millis(u64::from(tick_ms));
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&board.snapshot(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(board);
                    }
                    if let Some(command) = handle_key_event(key) {
                        debug!(?command, "key command");
                        board = board.apply(command);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            board = board
                .apply(Command::SpawnPiece { shape: None })
                .apply(Command::Tick {
                    elapsed_ms: tick_ms,
                });
        }
    }
}

fn headless_run(board: Board, every: bool, pretty: bool) -> Result<()> {
    let stdin = io::stdin();
    let commands = parse_commands(stdin.lock())?;
    debug!(count = commands.len(), "parsed commands");

    if every {
        let mut board = board;
        for command in commands {
            board = board.apply(command);
            println!("{}", board.snapshot().to_json()?);
        }
        return Ok(());
    }

    let board = blockfall::core::reducer::reduce(board, commands);
    let snapshot = board.snapshot();
    let json = if pretty {
        snapshot.to_json_pretty()?
    } else {
        snapshot.to_json()?
    };
    println!("{json}");
    Ok(())
}

/// One command per line; blank lines and `#` comments are skipped.
fn parse_commands(reader: impl BufRead) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = line
            .parse::<Command>()
            .with_context(|| format!("line {}: {line:?}", index + 1))?;
        commands.push(command);
    }
    Ok(commands)
}
