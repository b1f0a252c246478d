//! Recycle Rush entry point
//!
//! Runs the game in a terminal: lines on stdin become intents and real
//! elapsed time drives the simulation clock.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use rand::Rng;

use recycle_rush::consts::{MAX_STEP_MS, POLL_MS};
use recycle_rush::sim::{self, GameState};
use recycle_rush::ui::{self, Command};
use recycle_rush::Tuning;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the tile shuffle and rush roll (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file overriding the default balance
    #[arg(short, long)]
    tuning: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("Recycle Rush starting (seed {})", seed);

    let mut state = GameState::with_tuning(tuning, seed);
    let input = spawn_input_reader();
    let mut stdout = io::stdout();
    draw(&mut stdout, &state, &[]).context("drawing the home screen")?;

    let mut last = Instant::now();
    loop {
        let received = input.recv_timeout(Duration::from_millis(POLL_MS));

        // Timers that came due before the input arrived fire first
        let before = (state.screen, state.round.time_left, state.is_rush());
        step_clock(&mut state, &mut last);

        let got_line = received.is_ok();
        let mut notes = Vec::new();
        match received {
            Ok(line) => match ui::parse_command(&line) {
                Some(Command::Quit) => break,
                Some(Command::Help) => notes.push(ui::help_text().to_string()),
                Some(Command::Intent(intent)) => sim::apply(&mut state, intent),
                None if line.trim().is_empty() => {}
                None => notes.push(format!("Unrecognized command: {}", line.trim())),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let events = state.drain_events();
        notes.extend(events.iter().filter_map(ui::event_message));
        let after = (state.screen, state.round.time_left, state.is_rush());
        if before != after || !events.is_empty() || !notes.is_empty() || got_line {
            draw(&mut stdout, &state, &notes).context("redrawing the board")?;
        }
    }

    log::info!("Goodbye ({} rounds played)", state.leaderboard.len());
    Ok(())
}

/// Feed real elapsed time into the simulation, keeping sub-millisecond remainders
fn step_clock(state: &mut GameState, last: &mut Instant) {
    let now = Instant::now();
    let elapsed_ms = now.duration_since(*last).as_millis() as u64;
    if elapsed_ms > MAX_STEP_MS {
        log::warn!("Clock stalled for {}ms, advancing {}ms", elapsed_ms, MAX_STEP_MS);
        sim::advance(state, MAX_STEP_MS);
        *last = now;
    } else {
        sim::advance(state, elapsed_ms);
        *last += Duration::from_millis(elapsed_ms);
    }
}

/// Read stdin on a background thread so the countdown keeps running
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn draw(out: &mut impl Write, state: &GameState, notes: &[String]) -> io::Result<()> {
    // Clear screen, cursor home
    write!(out, "\x1b[2J\x1b[H")?;
    write!(out, "{}", ui::render(state))?;
    for note in notes {
        writeln!(out, "{}", note)?;
    }
    write!(out, "> ")?;
    out.flush()
}
