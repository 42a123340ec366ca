use crate::error::GameError;
use crate::game::ports::{Clock, GameObserver, Notifier, Severity, SnapshotStore};
use crate::game::serialization::GameSnapshot;
use crate::game::state::GameState;
use crate::game::timer::clock_label;
use crate::model::record::RoundRecord;
use crate::model::round::Selection;
use crate::model::seat::{Seat, SeatTable};
use tracing::{debug, info, warn};

/// Everything a user can ask the game to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewGame { names: SeatTable<Option<String>> },
    StartRound,
    SelectSeat(Seat),
    DeselectSeat(Seat),
    OverrideScore { seat: Seat, points: i32 },
    AutoFill,
    Commit { overrides: Vec<(Seat, i32)> },
    Cancel,
    Undo,
    DeleteRound(u32),
    Reset,
    StartTimer,
    PauseTimer,
    ResetTimer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    GameStarted { round: u32 },
    RoundStarted { round: u32 },
    Selection(Selection),
    Deselected { seat: Seat, changed: bool },
    Overridden { seat: Seat, requested: i32, points: i32 },
    AutoFilled,
    Committed(RoundRecord),
    Cancelled { discarded: bool },
    Undone(RoundRecord),
    Deleted(RoundRecord),
    Reset,
    Timer { running: bool, elapsed: u64 },
}

impl Outcome {
    fn changed_state(&self) -> bool {
        !matches!(
            self,
            Outcome::Deselected { changed: false, .. } | Outcome::Cancelled { discarded: false }
        )
    }

    fn changed_totals(&self) -> bool {
        matches!(
            self,
            Outcome::GameStarted { .. }
                | Outcome::Committed(_)
                | Outcome::Undone(_)
                | Outcome::Deleted(_)
                | Outcome::Reset
        )
    }
}

/// Owns the game state and routes commands to it, persisting after every
/// change and reporting to the notifier and observers.
pub struct GameController<S, C, N> {
    state: GameState,
    store: S,
    clock: C,
    notifier: N,
    observers: Vec<Box<dyn GameObserver>>,
}

impl<S: SnapshotStore, C: Clock, N: Notifier> GameController<S, C, N> {
    pub fn new(state: GameState, store: S, clock: C, notifier: N) -> Self {
        Self {
            state,
            store,
            clock,
            notifier,
            observers: Vec::new(),
        }
    }

    /// Loads the saved game. A missing blob starts a fresh game; an unreadable
    /// or invalid one is reported, discarded and replaced by a fresh game.
    pub fn restore(mut store: S, clock: C, mut notifier: N) -> Self {
        let state = match store.load() {
            Ok(None) => {
                debug!("no saved game; starting fresh");
                GameState::new()
            }
            Ok(Some(blob)) => match GameSnapshot::load(&blob) {
                Ok(state) => {
                    info!(
                        rounds = state.ledger().len(),
                        next_round = state.next_round_number(),
                        "saved game restored"
                    );
                    state
                }
                Err(err) => {
                    warn!(error = %err, "saved game is corrupt; discarding");
                    notifier.show(
                        &format!("Saved game was unreadable and has been discarded ({err})"),
                        Severity::Warning,
                    );
                    if let Err(err) = store.discard() {
                        warn!(error = %err, "failed to discard corrupt save");
                    }
                    GameState::new()
                }
            },
            Err(err) => {
                warn!(error = %err, "saved game could not be loaded");
                notifier.show(
                    &format!("Saved game could not be loaded: {err}"),
                    Severity::Warning,
                );
                GameState::new()
            }
        };
        Self::new(state, store, clock, notifier)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Registers an observer and immediately hands it the current state.
    pub fn subscribe(&mut self, mut observer: Box<dyn GameObserver>) {
        observer.state_restored(&self.state);
        self.observers.push(observer);
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, GameError> {
        debug!(?command, "dispatching");
        match self.apply(command) {
            Ok(outcome) => {
                if outcome.changed_state() {
                    self.persist();
                }
                self.announce(&outcome);
                Ok(outcome)
            }
            Err(err) => {
                debug!(error = %err, "command rejected");
                self.notifier.show(&err.to_string(), Severity::Warning);
                Err(err)
            }
        }
    }

    /// Writes the current state to the store. Failures are reported but the
    /// in-memory state stays authoritative.
    pub fn persist(&mut self) -> bool {
        let result = GameSnapshot::to_vec(&self.state)
            .map_err(Into::into)
            .and_then(|blob| self.store.save(&blob));
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to save game");
                self.notifier.show(
                    &format!("Progress not saved: {err}"),
                    Severity::Warning,
                );
                false
            }
        }
    }

    fn apply(&mut self, command: Command) -> Result<Outcome, GameError> {
        let now = self.clock.now();
        let state = &mut self.state;
        let outcome = match command {
            Command::NewGame { names } => Outcome::GameStarted {
                round: state.new_game(&names, now)?,
            },
            Command::StartRound => Outcome::RoundStarted {
                round: state.start_round(now)?,
            },
            Command::SelectSeat(seat) => Outcome::Selection(state.select_seat(seat)?),
            Command::DeselectSeat(seat) => Outcome::Deselected {
                seat,
                changed: state.deselect_seat(seat),
            },
            Command::OverrideScore { seat, points } => Outcome::Overridden {
                seat,
                requested: points,
                points: state.set_override(seat, points)?,
            },
            Command::AutoFill => {
                state.clear_overrides()?;
                Outcome::AutoFilled
            }
            Command::Commit { overrides } => {
                Outcome::Committed(state.commit_with(&overrides, now)?)
            }
            Command::Cancel => Outcome::Cancelled {
                discarded: state.cancel(now),
            },
            Command::Undo => Outcome::Undone(state.undo_last()?),
            Command::DeleteRound(round) => Outcome::Deleted(state.delete_round(round)?),
            Command::Reset => {
                state.reset();
                Outcome::Reset
            }
            Command::StartTimer => {
                state.start_timer(now);
                Outcome::Timer {
                    running: true,
                    elapsed: state.elapsed(now),
                }
            }
            Command::PauseTimer => {
                state.pause_timer(now);
                Outcome::Timer {
                    running: false,
                    elapsed: state.elapsed(now),
                }
            }
            Command::ResetTimer => {
                state.reset_timer();
                Outcome::Timer {
                    running: false,
                    elapsed: 0,
                }
            }
        };
        Ok(outcome)
    }

    fn announce(&mut self, outcome: &Outcome) {
        if let Some((message, severity)) = self.describe(outcome) {
            self.notifier.show(&message, severity);
        }
        if matches!(outcome, Outcome::GameStarted { .. } | Outcome::Reset) {
            for observer in &mut self.observers {
                observer.state_restored(&self.state);
            }
        }
        if let Outcome::Committed(record) = outcome {
            for observer in &mut self.observers {
                observer.round_committed(record);
            }
        }
        if outcome.changed_totals() {
            let totals = self.state.totals();
            for observer in &mut self.observers {
                observer.totals_changed(&totals);
            }
        }
    }

    fn describe(&self, outcome: &Outcome) -> Option<(String, Severity)> {
        let name = |seat: Seat| self.state.player(seat).name.as_str();
        let notice = match outcome {
            Outcome::GameStarted { .. } => (
                "Game started. Pick 1st, 2nd and 3rd place.".to_string(),
                Severity::Success,
            ),
            Outcome::RoundStarted { round } => {
                (format!("Round {round} started"), Severity::Info)
            }
            Outcome::Selection(Selection::Ranked(assignment)) => (
                format!("{}: {}", assignment.rank, name(assignment.seat)),
                Severity::Success,
            ),
            Outcome::Selection(Selection::Completed { last, .. }) => (
                format!(
                    "All places set ({} is {}). Review and commit the round.",
                    name(last.seat),
                    last.rank
                ),
                Severity::Success,
            ),
            Outcome::Selection(Selection::Deselected(seat))
            | Outcome::Deselected {
                seat,
                changed: true,
            } => (format!("Cleared {}", name(*seat)), Severity::Info),
            Outcome::Deselected { changed: false, .. } => return None,
            Outcome::Overridden {
                seat,
                requested,
                points,
            } if requested != points => (
                format!("{} set to {points} (limited from {requested})", name(*seat)),
                Severity::Info,
            ),
            Outcome::Overridden { seat, points, .. } => {
                (format!("{} set to {points}", name(*seat)), Severity::Info)
            }
            Outcome::AutoFilled => (
                "Scores filled in from ranks".to_string(),
                Severity::Success,
            ),
            Outcome::Committed(record) => (
                format!("Round {} saved", record.round_number),
                Severity::Success,
            ),
            Outcome::Cancelled { discarded: true } => {
                ("Round discarded".to_string(), Severity::Info)
            }
            Outcome::Cancelled { discarded: false } => return None,
            Outcome::Undone(record) => (
                format!("Round {} undone", record.round_number),
                Severity::Info,
            ),
            Outcome::Deleted(record) => (
                format!("Round {} deleted", record.round_number),
                Severity::Info,
            ),
            Outcome::Reset => ("All data cleared".to_string(), Severity::Info),
            Outcome::Timer { running, elapsed } => (
                format!(
                    "Timer {} at {}",
                    if *running { "running" } else { "paused" },
                    clock_label(*elapsed)
                ),
                Severity::Info,
            ),
        };
        Some(notice)
    }
}
