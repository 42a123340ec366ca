use crate::model::round::RoundPhase;
use crate::model::seat::Seat;
use thiserror::Error;

/// Rejections from the round engine and the ledger. None of them leave
/// partial changes behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cannot {operation} while the round is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: RoundPhase,
    },
    #[error("three seats are already ranked; deselect one first")]
    SelectionFull,
    #[error("there is no recorded round to undo")]
    EmptyLedger,
    #[error("round {round} is not in the history")]
    NotFound { round: u32 },
}

/// Failures talking to the snapshot store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("saved game is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("saved game is invalid: {0}")]
    Invalid(#[from] SnapshotError),
}

/// A saved game that parses but cannot describe a reachable game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("round {round} gives {seat} {score} points")]
    ScoreOutOfRange { round: u32, seat: Seat, score: i32 },
    #[error("the total for {seat} does not fit")]
    TotalOverflow { seat: Seat },
}
