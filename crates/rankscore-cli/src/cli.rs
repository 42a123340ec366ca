use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rankscore_core::game::ports::Clock;
use rankscore_core::game::serialization::GameSnapshot;
use rankscore_core::model::round::Selection;
use rankscore_core::{Command, GameController, Outcome, Seat};
use tracing::debug;

use crate::config::AppConfig;
use crate::console::{ConsoleNotifier, ScoreboardPrinter};
use crate::logging::init_logging;
use crate::session;
use crate::store::{FileStore, SystemClock};
use crate::view;

pub type AppController = GameController<FileStore, SystemClock, ConsoleNotifier>;

/// Score keeper for four-player ranking card games.
#[derive(Debug, Parser)]
#[command(
    name = "rankscore",
    author,
    version,
    about = "Four-seat round score keeper with undo and history"
)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "rankscore.yaml")]
    pub config: PathBuf,

    /// Override the save file location.
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Only print warnings and the views that were asked for.
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Start a new game, wiping all history, and open round 1.
    New {
        /// Player name for a seat, e.g. `--name north=An`. Repeatable.
        #[arg(long = "name", value_name = "SEAT=NAME", value_parser = parse_name)]
        names: Vec<(Seat, String)>,
    },
    /// Open the next round.
    Start,
    /// Give the seat the next free place, or clear it if already placed.
    Select { seat: Seat },
    /// Clear the seat's place; places behind it move up.
    Deselect { seat: Seat },
    /// Replace a seat's score for this round (clamped to -100..=100).
    Override {
        seat: Seat,
        #[arg(allow_negative_numbers = true)]
        points: i32,
    },
    /// Drop all overrides and use the rank points again.
    Autofill,
    /// Show the scores that a commit would record.
    Review,
    /// Record the round.
    Commit {
        /// Score override applied before committing, e.g. `--set east=5`.
        #[arg(long = "set", value_name = "SEAT=POINTS", value_parser = parse_points)]
        overrides: Vec<(Seat, i32)>,
    },
    /// Discard the round in progress.
    Cancel,
    /// Remove the most recently recorded round.
    Undo,
    /// Remove a recorded round by its number.
    Delete { round: u32 },
    /// Erase everything, including player names.
    Reset,
    /// Control the round timer.
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },
    /// Show the round status and standings.
    Show,
    /// List recorded rounds, newest first.
    History {
        /// Print the records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the full saved state as JSON.
    Export,
    /// Read commands from standard input, one per line. Exits 2 if any line
    /// was rejected.
    Session,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum TimerAction {
    Start,
    Pause,
    Reset,
}

fn parse_name(raw: &str) -> Result<(Seat, String), String> {
    let (seat, name) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SEAT=NAME, got '{raw}'"))?;
    let seat = seat.parse::<Seat>().map_err(|err| err.to_string())?;
    Ok((seat, name.trim().to_string()))
}

fn parse_points(raw: &str) -> Result<(Seat, i32), String> {
    let (seat, points) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SEAT=POINTS, got '{raw}'"))?;
    let seat = seat.parse::<Seat>().map_err(|err| err.to_string())?;
    let points = points
        .trim()
        .parse::<i32>()
        .map_err(|err| format!("invalid points '{points}': {err}"))?;
    Ok((seat, points))
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(store) = cli.store {
        config.store.path = store;
    }
    config
        .validate()
        .with_context(|| format!("validating {}", cli.config.display()))?;

    let _logging_guard = init_logging(&config.logging)?;
    debug!(store = %config.store.path.display(), "opening saved game");

    let store = FileStore::new(&config.store.path);
    let mut controller =
        GameController::restore(store, SystemClock, ConsoleNotifier::new(cli.quiet));

    let interactive = matches!(cli.action, Action::Session);
    if !cli.quiet {
        let printer = if interactive {
            ScoreboardPrinter::with_banner()
        } else {
            ScoreboardPrinter::default()
        };
        controller.subscribe(Box::new(printer));
    }

    let succeeded = if interactive {
        session::run(&mut controller, &config, io::stdin().lock())?
    } else {
        execute(&mut controller, &config, cli.action)?
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

/// Runs one action. Returns `false` when the game rejected it; the reason
/// has already been shown through the notifier.
pub fn execute(controller: &mut AppController, config: &AppConfig, action: Action) -> Result<bool> {
    let command = match action {
        Action::New { names } => {
            let mut table = config.seats.clone();
            for (seat, name) in names {
                table[seat] = Some(name);
            }
            Command::NewGame { names: table }
        }
        Action::Start => Command::StartRound,
        Action::Select { seat } => Command::SelectSeat(seat),
        Action::Deselect { seat } => Command::DeselectSeat(seat),
        Action::Override { seat, points } => Command::OverrideScore { seat, points },
        Action::Autofill => Command::AutoFill,
        Action::Commit { overrides } => Command::Commit { overrides },
        Action::Cancel => Command::Cancel,
        Action::Undo => Command::Undo,
        Action::Delete { round } => Command::DeleteRound(round),
        Action::Reset => Command::Reset,
        Action::Timer { action } => match action {
            TimerAction::Start => Command::StartTimer,
            TimerAction::Pause => Command::PauseTimer,
            TimerAction::Reset => Command::ResetTimer,
        },
        Action::Review => {
            print_review(controller);
            return Ok(true);
        }
        Action::Show => {
            let state = controller.state();
            print!("{}", view::status(state, state.elapsed(controller.clock().now())));
            return Ok(true);
        }
        Action::History { json } => {
            let records = controller.state().ledger().records();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(records).context("encoding history")?
                );
            } else {
                print!("{}", view::history(controller.state()));
            }
            return Ok(true);
        }
        Action::Export => {
            println!(
                "{}",
                GameSnapshot::to_json(controller.state()).context("encoding game")?
            );
            return Ok(true);
        }
        Action::Session => {
            println!("Already in a session");
            return Ok(true);
        }
    };

    let Ok(outcome) = controller.dispatch(command) else {
        return Ok(false);
    };

    match outcome {
        Outcome::Selection(Selection::Completed { .. }) => {
            if config.auto_advance_ms > 0 {
                thread::sleep(Duration::from_millis(config.auto_advance_ms));
            }
            print_review(controller);
        }
        Outcome::Selection(_) | Outcome::Deselected { changed: true, .. } => {
            println!("{}", view::selection(controller.state()));
        }
        Outcome::Overridden { .. } | Outcome::AutoFilled => print_review(controller),
        _ => {}
    }
    Ok(true)
}

fn print_review(controller: &AppController) {
    let state = controller.state();
    if state.engine().is_active() {
        print!("{}", view::review(&state.review()));
    } else {
        println!("No round in progress");
    }
}
